//! Min-max rescaling of intensity patterns to [0, 1]

use crate::core_types::DiffractionPattern;

/// Patterns whose value range is narrower than this are treated as flat.
pub const FLAT_RANGE_THRESHOLD: f64 = 1e-12;

/// Rescale a pattern to [0, 1] via `(v - min) / (max - min)`
///
/// A flat pattern (`max - min < 1e-12`) maps to all zeros instead of dividing
/// by a vanishing range. The threshold is absolute: raw patterns with a very
/// small overall magnitude also count as flat.
#[must_use]
pub fn normalize(pattern: &DiffractionPattern) -> DiffractionPattern {
    let Some((lo, hi)) = pattern.min_max() else {
        return pattern.clone();
    };

    let range = hi - lo;
    if range.is_nan() || range < FLAT_RANGE_THRESHOLD {
        return DiffractionPattern::zeros(pattern.size());
    }

    let data = pattern
        .as_slice()
        .iter()
        .map(|&v| ((v - lo) / range).clamp(0.0, 1.0))
        .collect();

    DiffractionPattern::from_raw(pattern.size(), data)
}
