//! Input planes: decoded rasters and square optical fields
//!
//! A [`Raster`] is whatever an image decoder hands over (any width and height,
//! one real value per pixel). Propagation only works on square apertures, so a
//! raster is cropped to its centered square before it becomes an
//! [`OpticalField`].

use crate::error::{FresnelError, Result};
use rustc_hash::FxHasher;
use std::hash::Hasher;

/// Real-valued image plane of arbitrary shape, row-major (y * width + x)
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    data: Vec<f64>,
    width: usize,
    height: usize,
}

impl Raster {
    /// Wrap decoded pixel values
    ///
    /// # Errors
    ///
    /// Returns a shape error if `data.len() != width * height` or either side is zero.
    pub fn new(width: usize, height: usize, data: Vec<f64>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(FresnelError::shape(format!(
                "raster must be non-empty, got {width}x{height}"
            )));
        }
        if data.len() != width * height {
            return Err(FresnelError::shape(format!(
                "raster data has {} samples, expected {width}x{height} = {}",
                data.len(),
                width * height
            )));
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Build a raster from 8-bit pixel values, mapping 0..=255 onto [0, 1]
    ///
    /// # Errors
    ///
    /// Same as [`Raster::new`].
    pub fn from_u8(width: usize, height: usize, pixels: &[u8]) -> Result<Self> {
        let data = pixels.iter().map(|&p| f64::from(p) / 255.0).collect();
        Self::new(width, height, data)
    }

    /// Raster width in pixels
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Raster height in pixels
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel values in row-major order
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

/// Square N×N real-valued optical field, row-major (y * size + x)
///
/// Values are conventionally in [0, 1]. Squareness is enforced at
/// construction, so every field handed to the propagator is valid by type.
#[derive(Debug, Clone, PartialEq)]
pub struct OpticalField {
    data: Vec<f64>,
    size: usize,
}

impl OpticalField {
    /// Create a field from row-major samples
    ///
    /// # Errors
    ///
    /// - Shape error if `size == 0` or `data.len() != size * size`
    /// - Domain error if any sample is NaN or infinite
    pub fn new(size: usize, data: Vec<f64>) -> Result<Self> {
        if size == 0 {
            return Err(FresnelError::shape("field must be at least 1x1"));
        }
        if data.len() != size * size {
            return Err(FresnelError::shape(format!(
                "field data has {} samples, expected {size}x{size} = {}",
                data.len(),
                size * size
            )));
        }
        if let Some(bad) = data.iter().find(|v| !v.is_finite()) {
            return Err(FresnelError::domain("field sample", *bad, "must be finite"));
        }
        Ok(Self { data, size })
    }

    /// Create a field from nested rows
    ///
    /// # Errors
    ///
    /// Shape error if the rows are ragged or the matrix is not square.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let height = rows.len();
        for (y, row) in rows.iter().enumerate() {
            if row.len() != height {
                return Err(FresnelError::shape(format!(
                    "field must be square: row {y} has {} columns but there are {height} rows",
                    row.len()
                )));
            }
        }
        Self::new(height, rows.concat())
    }

    /// Create a field with every sample set to `value`
    ///
    /// # Errors
    ///
    /// Same as [`OpticalField::new`].
    pub fn uniform(size: usize, value: f64) -> Result<Self> {
        Self::new(size, vec![value; size * size])
    }

    /// Take the centered min(width, height) square of a raster
    ///
    /// The crop starts at `((width - s) / 2, (height - s) / 2)` with integer
    /// division, so for odd margins the extra pixel is dropped on the far side.
    #[must_use]
    pub fn crop_center(raster: &Raster) -> Self {
        let size = raster.width.min(raster.height);
        let top = (raster.height - size) / 2;
        let left = (raster.width - size) / 2;

        let mut data = Vec::with_capacity(size * size);
        for y in top..top + size {
            let start = y * raster.width + left;
            data.extend_from_slice(&raster.data[start..start + size]);
        }

        Self { data, size }
    }

    /// Side length N
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Samples in row-major order
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Get sample at column `x`, row `y`
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        assert!(x < self.size && y < self.size, "Coordinates out of bounds");
        self.data[y * self.size + x]
    }

    /// Hash of the size and the exact bit pattern of every sample
    ///
    /// Two fields with the same fingerprint are treated as the same source by
    /// the result store.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.write_hash(&mut hasher);
        hasher.finish()
    }

    fn write_hash(&self, hasher: &mut FxHasher) {
        hasher.write_usize(self.size);
        for v in &self.data {
            hasher.write_u64(v.to_bits());
        }
    }
}

/// Three equally sized channel planes of a color source
#[derive(Debug, Clone, PartialEq)]
pub struct RgbField {
    red: OpticalField,
    green: OpticalField,
    blue: OpticalField,
}

impl RgbField {
    /// Group three channel fields
    ///
    /// # Errors
    ///
    /// Shape error if the three fields differ in size.
    pub fn new(red: OpticalField, green: OpticalField, blue: OpticalField) -> Result<Self> {
        if red.size != green.size || red.size != blue.size {
            return Err(FresnelError::shape(format!(
                "channel fields must share one size, got red {0}x{0}, green {1}x{1}, blue {2}x{2}",
                red.size, green.size, blue.size
            )));
        }
        Ok(Self { red, green, blue })
    }

    /// Crop three decoded channel rasters to their centered squares
    ///
    /// # Errors
    ///
    /// Shape error if the rasters do not share one shape.
    pub fn from_raster_channels(red: &Raster, green: &Raster, blue: &Raster) -> Result<Self> {
        let shape = (red.width, red.height);
        if (green.width, green.height) != shape || (blue.width, blue.height) != shape {
            return Err(FresnelError::shape("channel rasters must share one shape"));
        }
        Self::new(
            OpticalField::crop_center(red),
            OpticalField::crop_center(green),
            OpticalField::crop_center(blue),
        )
    }

    /// Side length N shared by all channels
    #[must_use]
    pub fn size(&self) -> usize {
        self.red.size
    }

    /// Red plane
    #[must_use]
    pub fn red(&self) -> &OpticalField {
        &self.red
    }

    /// Green plane
    #[must_use]
    pub fn green(&self) -> &OpticalField {
        &self.green
    }

    /// Blue plane
    #[must_use]
    pub fn blue(&self) -> &OpticalField {
        &self.blue
    }

    /// Consume into `[red, green, blue]`
    #[must_use]
    pub fn into_channels(self) -> [OpticalField; 3] {
        [self.red, self.green, self.blue]
    }

    /// Combined hash of all three planes
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.red.write_hash(&mut hasher);
        self.green.write_hash(&mut hasher);
        self.blue.write_hash(&mut hasher);
        hasher.finish()
    }
}

/// A propagation source: one luminance plane or three color planes
#[derive(Debug, Clone, PartialEq)]
pub enum SourceImage {
    /// Grayscale source, propagated at the green wavelength
    Grayscale(OpticalField),
    /// Color source, one propagation per channel
    Rgb(RgbField),
}

impl SourceImage {
    /// Side length N of the source
    #[must_use]
    pub fn size(&self) -> usize {
        match self {
            Self::Grayscale(field) => field.size(),
            Self::Rgb(rgb) => rgb.size(),
        }
    }

    /// Identity of the source pixels for cache keys
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        match self {
            Self::Grayscale(field) => field.fingerprint(),
            Self::Rgb(rgb) => rgb.fingerprint(),
        }
    }
}
