//! Centered sample coordinates and the quadratic phase screens built on them

use num_complex::Complex64;
use std::f64::consts::PI;

/// Centered index vectors for an N×N grid
///
/// Sample `k` sits at coordinate `k - N/2`, evaluated in real arithmetic, so
/// the coordinates run over [-N/2, N/2). For odd N they are half-integers.
/// The same vector serves both axes (n along rows, m along columns).
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateGrid {
    coords: Vec<f64>,
}

impl CoordinateGrid {
    /// Build the coordinates for side length `size`
    #[must_use]
    pub fn new(size: usize) -> Self {
        let half = size as f64 / 2.0;
        Self {
            coords: (0..size).map(|k| k as f64 - half).collect(),
        }
    }

    /// Side length N
    #[must_use]
    pub fn size(&self) -> usize {
        self.coords.len()
    }

    /// 1-D centered coordinates
    #[must_use]
    pub fn coords(&self) -> &[f64] {
        &self.coords
    }

    /// n² + m² for column `x`, row `y`
    #[inline]
    #[must_use]
    pub fn radius_sq(&self, x: usize, y: usize) -> f64 {
        self.coords[x] * self.coords[x] + self.coords[y] * self.coords[y]
    }

    /// Quadratic phase screen exp(iπ·a·(n² + m²)/N), row-major
    ///
    /// Every lens, kernel and conversion factor of the Lohmann system is one of
    /// these with a different `a`.
    #[must_use]
    pub fn chirp(&self, a: f64) -> Vec<Complex64> {
        let n = self.size();
        let scale = PI * a / n as f64;

        let mut screen = Vec::with_capacity(n * n);
        for y in 0..n {
            for x in 0..n {
                screen.push(Complex64::cis(scale * self.radius_sq(x, y)));
            }
        }
        screen
    }
}

/// Multiply `data` by `screen` element by element.
pub(crate) fn elementwise_multiply(data: &mut [Complex64], screen: &[Complex64]) {
    debug_assert_eq!(data.len(), screen.len());

    data.iter_mut().zip(screen).for_each(|(x, k)| {
        *x *= k;
    });
}
