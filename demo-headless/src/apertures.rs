//! Synthetic source apertures on an N×N grid

use clap::ValueEnum;
use fresnel_core::{OpticalField, Result, RgbField, SourceImage};

/// Built-in source shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ApertureKind {
    /// Centered square, side N/4
    Square,
    /// Centered disk, radius N/8
    Circle,
    /// Single vertical slit
    Slit,
    /// Two vertical slits N/8 apart
    DoubleSlit,
    /// Vertical bars with period N/16 inside a centered N/2 window
    Grating,
    /// Square, circle and slit in the red, green and blue channels
    Rgb,
}

impl ApertureKind {
    /// Build the source image for a grid of side `size`
    pub fn build(self, size: usize) -> Result<SourceImage> {
        let gray = |mask: fn(usize, usize, usize) -> bool| mask_field(size, mask);

        Ok(match self {
            Self::Square => SourceImage::Grayscale(gray(square)?),
            Self::Circle => SourceImage::Grayscale(gray(circle)?),
            Self::Slit => SourceImage::Grayscale(gray(slit)?),
            Self::DoubleSlit => SourceImage::Grayscale(gray(double_slit)?),
            Self::Grating => SourceImage::Grayscale(gray(grating)?),
            Self::Rgb => {
                SourceImage::Rgb(RgbField::new(gray(square)?, gray(circle)?, gray(slit)?)?)
            }
        })
    }
}

fn mask_field(size: usize, mask: fn(usize, usize, usize) -> bool) -> Result<OpticalField> {
    let data = (0..size * size)
        .map(|i| if mask(size, i % size, i / size) { 1.0 } else { 0.0 })
        .collect();
    OpticalField::new(size, data)
}

/// Signed offset of `k` from the grid center N/2
fn offset(size: usize, k: usize) -> f64 {
    k as f64 - (size / 2) as f64
}

fn square(size: usize, x: usize, y: usize) -> bool {
    let half = (size / 8) as f64;
    offset(size, x).abs() < half && offset(size, y).abs() < half
}

fn circle(size: usize, x: usize, y: usize) -> bool {
    let (dx, dy) = (offset(size, x), offset(size, y));
    let radius = (size / 8) as f64;
    dx * dx + dy * dy <= radius * radius
}

fn slit_width(size: usize) -> f64 {
    (size / 32).max(1) as f64
}

fn slit(size: usize, x: usize, y: usize) -> bool {
    offset(size, x).abs() < slit_width(size) && offset(size, y).abs() < (size / 4) as f64
}

fn double_slit(size: usize, x: usize, y: usize) -> bool {
    let separation = (size / 16) as f64;
    let dx = offset(size, x).abs() - separation;
    dx.abs() < slit_width(size) / 2.0 + 0.5 && offset(size, y).abs() < (size / 4) as f64
}

fn grating(size: usize, x: usize, y: usize) -> bool {
    let period = (size / 16).max(2);
    let window = (size / 4) as f64;
    offset(size, x).abs() < window && offset(size, y).abs() < window && x % period < period / 2
}
