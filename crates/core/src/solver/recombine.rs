//! Stacking of per-channel result sequences into color frames

use crate::core_types::{DiffractionPattern, ResultSequence, RgbPattern};
use crate::error::{FresnelError, Result};

/// Stack three single-channel frames into one N×N×3 frame.
///
/// # Errors
///
/// Shape error if the frames differ in size.
pub fn stack_channels(
    red: &DiffractionPattern,
    green: &DiffractionPattern,
    blue: &DiffractionPattern,
) -> Result<RgbPattern> {
    let size = red.size();
    if green.size() != size || blue.size() != size {
        return Err(FresnelError::shape(format!(
            "channel frames differ in size: red {size}, green {}, blue {}",
            green.size(),
            blue.size()
        )));
    }

    let mut data = Vec::with_capacity(size * size * 3);
    for ((&r, &g), &b) in red
        .as_slice()
        .iter()
        .zip(green.as_slice())
        .zip(blue.as_slice())
    {
        data.extend_from_slice(&[r, g, b]);
    }

    Ok(RgbPattern::from_interleaved(size, data))
}

/// Merge three channel sequences index by index
///
/// Element `i` of the result stacks `red[i]`, `green[i]` and `blue[i]` along a
/// trailing channel axis. Distances are taken from the red sequence.
///
/// # Errors
///
/// Shape error if the sequences differ in length or any index pairs frames of
/// different sizes.
pub fn recombine(
    red: &ResultSequence,
    green: &ResultSequence,
    blue: &ResultSequence,
) -> Result<ResultSequence<RgbPattern>> {
    if red.len() != green.len() || red.len() != blue.len() {
        return Err(FresnelError::shape(format!(
            "channel sequences differ in length: red {}, green {}, blue {}",
            red.len(),
            green.len(),
            blue.len()
        )));
    }

    let frames = red
        .frames()
        .iter()
        .zip(green.frames())
        .zip(blue.frames())
        .map(|((r, g), b)| stack_channels(r, g, b))
        .collect::<Result<Vec<_>>>()?;

    ResultSequence::new(red.distances().to_vec(), frames)
}
