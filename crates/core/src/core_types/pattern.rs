//! Propagation outputs: intensity patterns and ordered result sequences

use crate::error::{FresnelError, Result};

/// Non-negative N×N intensity map, row-major (y * size + x)
///
/// Raw patterns come straight out of the propagator; normalized patterns have
/// every value in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct DiffractionPattern {
    data: Vec<f64>,
    size: usize,
}

impl DiffractionPattern {
    /// Wrap row-major intensity values
    ///
    /// # Errors
    ///
    /// Shape error if `data.len() != size * size`.
    pub fn new(size: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != size * size {
            return Err(FresnelError::shape(format!(
                "pattern data has {} samples, expected {size}x{size} = {}",
                data.len(),
                size * size
            )));
        }
        Ok(Self { data, size })
    }

    pub(crate) fn from_raw(size: usize, data: Vec<f64>) -> Self {
        debug_assert_eq!(data.len(), size * size);
        Self { data, size }
    }

    /// All-zero pattern
    #[must_use]
    pub fn zeros(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Side length N
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Values in row-major order
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Get intensity at column `x`, row `y`
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        assert!(x < self.size && y < self.size, "Coordinates out of bounds");
        self.data[y * self.size + x]
    }

    /// `(min, max)` over all samples, `None` for an empty pattern
    #[must_use]
    pub fn min_max(&self) -> Option<(f64, f64)> {
        let first = *self.data.first()?;
        Some(
            self.data
                .iter()
                .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
        )
    }

    /// Arithmetic mean of all samples
    #[must_use]
    pub fn mean(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.data.iter().sum::<f64>() / self.data.len() as f64
    }

    /// `(x, y)` of the brightest sample (first one on ties)
    #[must_use]
    pub fn argmax(&self) -> Option<(usize, usize)> {
        let (index, _) = self
            .data
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
                Some((_, b)) if b >= v => best,
                _ => Some((i, v)),
            })?;
        Some((index % self.size, index / self.size))
    }
}

/// N×N×3 color frame, row-major with a trailing channel axis
///
/// Sample `(x, y)` occupies `data[(y * size + x) * 3 .. +3]` as `[r, g, b]`.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbPattern {
    data: Vec<f64>,
    size: usize,
}

impl RgbPattern {
    pub(crate) fn from_interleaved(size: usize, data: Vec<f64>) -> Self {
        debug_assert_eq!(data.len(), size * size * 3);
        Self { data, size }
    }

    /// Side length N
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Array shape `(N, N, 3)`
    #[must_use]
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.size, self.size, 3)
    }

    /// Interleaved values
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// `[r, g, b]` at column `x`, row `y`
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> [f64; 3] {
        assert!(x < self.size && y < self.size, "Coordinates out of bounds");
        let base = (y * self.size + x) * 3;
        [self.data[base], self.data[base + 1], self.data[base + 2]]
    }
}

/// Frames indexed in the same order as the distances that produced them
///
/// `frames[i]` always belongs to `distances[i]`, whatever order the underlying
/// tasks finished in.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSequence<P = DiffractionPattern> {
    distances: Vec<f64>,
    frames: Vec<P>,
}

impl<P> ResultSequence<P> {
    /// Pair distances with frames
    ///
    /// # Errors
    ///
    /// Shape error if the two vectors differ in length.
    pub fn new(distances: Vec<f64>, frames: Vec<P>) -> Result<Self> {
        if distances.len() != frames.len() {
            return Err(FresnelError::shape(format!(
                "{} distances but {} frames",
                distances.len(),
                frames.len()
            )));
        }
        Ok(Self { distances, frames })
    }

    /// Number of frames
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True if the sequence holds no frames
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Distances in request order
    #[must_use]
    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    /// Frames in request order
    #[must_use]
    pub fn frames(&self) -> &[P] {
        &self.frames
    }

    /// `(distance, frame)` at position `index`
    #[must_use]
    pub fn get(&self, index: usize) -> Option<(f64, &P)> {
        Some((*self.distances.get(index)?, self.frames.get(index)?))
    }

    /// Iterate `(distance, frame)` pairs in request order
    pub fn iter(&self) -> impl Iterator<Item = (f64, &P)> + '_ {
        self.distances.iter().copied().zip(self.frames.iter())
    }

    /// Position of the frame computed for `distance`, if present
    #[must_use]
    pub fn index_of(&self, distance: f64) -> Option<usize> {
        self.distances.iter().position(|&d| d == distance)
    }
}
