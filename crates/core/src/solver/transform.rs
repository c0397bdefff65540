//! Centered 2-D discrete Fourier transforms
//!
//! The propagator works on fields whose origin is the array center. A centered
//! transform moves the origin to the corner (`ifftshift`), transforms, and moves
//! it back (`fftshift`). The 2-D transform is separable: all rows are
//! transformed, the matrix is transposed, rows again, transposed back.
//!
//! Scaling follows the usual convention: the forward transform is unscaled and
//! the inverse carries 1/N², so `inverse(forward(x)) == x` and
//! `Σ|forward(x)|² == N² · Σ|x|²` (Parseval).

use num_complex::Complex64;
use rayon::prelude::*;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// Planned forward and inverse centered transforms for one side length
pub struct CenteredFft2 {
    size: usize,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
}

impl CenteredFft2 {
    /// Plan transforms for N×N data
    #[must_use]
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::<f64>::new();
        Self {
            size,
            forward: planner.plan_fft_forward(size),
            inverse: planner.plan_fft_inverse(size),
        }
    }

    /// Side length N
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// fftshift(fft2(ifftshift(data))), in place
    ///
    /// # Panics
    ///
    /// Panics if `data.len()` is not N².
    pub fn forward(&self, data: &mut [Complex64]) {
        assert_eq!(data.len(), self.size * self.size, "data must be N×N");

        ifftshift(data, self.size);
        fft2(data, self.size, self.forward.as_ref());
        fftshift(data, self.size);
    }

    /// fftshift(ifft2(ifftshift(data))), in place, including the 1/N² factor
    ///
    /// # Panics
    ///
    /// Panics if `data.len()` is not N².
    pub fn inverse(&self, data: &mut [Complex64]) {
        assert_eq!(data.len(), self.size * self.size, "data must be N×N");

        ifftshift(data, self.size);
        fft2(data, self.size, self.inverse.as_ref());

        let scale = ((self.size * self.size) as f64).recip();
        data.par_iter_mut().for_each(|x| *x *= scale);

        fftshift(data, self.size);
    }
}

fn fft2(data: &mut [Complex64], size: usize, fft: &dyn Fft<f64>) {
    data.par_chunks_exact_mut(size).for_each(|row| fft.process(row));
    transpose(data, size);
    data.par_chunks_exact_mut(size).for_each(|row| fft.process(row));
    transpose(data, size);
}

fn transpose<T>(buffer: &mut [T], width: usize) {
    for y in 0..width {
        for x in y + 1..width {
            buffer.swap(y * width + x, x * width + y);
        }
    }
}

/// Move the zero-frequency sample from the corner to the center.
///
/// Output sample k takes input sample (k - N/2) mod N along each axis.
pub fn fftshift<T>(data: &mut [T], width: usize) {
    let shift = width / 2;

    // Rows first, then within each row.
    data.rotate_right(shift * width);
    data.chunks_exact_mut(width)
        .for_each(|row| row.rotate_right(shift));
}

/// Inverse of [`fftshift`]; identical to it for even N.
pub fn ifftshift<T>(data: &mut [T], width: usize) {
    let shift = width / 2;

    data.rotate_left(shift * width);
    data.chunks_exact_mut(width)
        .for_each(|row| row.rotate_left(shift));
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::Rng;

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    #[test]
    fn test_fftshift_even() {
        let mut data: Vec<u32> = (0..16).collect();
        fftshift(&mut data, 4);
        assert_eq!(
            data,
            vec![10, 11, 8, 9, 14, 15, 12, 13, 2, 3, 0, 1, 6, 7, 4, 5]
        );
    }

    #[test]
    fn test_shift_round_trip_odd() {
        let original: Vec<u32> = (0..25).collect();
        let mut data = original.clone();

        fftshift(&mut data, 5);
        // Corner sample lands at the center (2, 2)
        assert_eq!(data[2 * 5 + 2], 0);

        ifftshift(&mut data, 5);
        assert_eq!(data, original);
    }

    #[test]
    fn test_centered_impulse_gives_flat_spectrum() {
        let fft = CenteredFft2::new(4);
        let mut data = vec![c(0.0); 16];
        // Center of a centered grid is (2, 2)
        data[2 * 4 + 2] = c(1.0);

        fft.forward(&mut data);

        for x in &data {
            assert_relative_eq!(x.re, 1.0, epsilon = 1e-12);
            assert_relative_eq!(x.im, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_constant_concentrates_at_center() {
        let fft = CenteredFft2::new(4);
        let mut data = vec![c(1.0); 16];

        fft.forward(&mut data);

        assert_relative_eq!(data[2 * 4 + 2].re, 16.0, epsilon = 1e-12);
        let rest: f64 = data
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != 10)
            .map(|(_, x)| x.norm())
            .sum();
        assert!(rest < 1e-12);
    }

    #[test]
    #[should_panic(expected = "data must be N×N")]
    fn test_forward_rejects_mismatched_length() {
        CenteredFft2::new(4).forward(&mut [c(1.0); 15]);
    }

    #[test]
    #[should_panic(expected = "data must be N×N")]
    fn test_inverse_rejects_mismatched_length() {
        CenteredFft2::new(4).inverse(&mut [c(1.0); 20]);
    }

    #[test]
    fn test_inverse_round_trip() {
        let mut rng = rand::rng();
        for size in [4, 5, 8] {
            let fft = CenteredFft2::new(size);
            let original: Vec<Complex64> = (0..size * size)
                .map(|_| Complex64::new(rng.random(), rng.random()))
                .collect();

            let mut data = original.clone();
            fft.forward(&mut data);
            fft.inverse(&mut data);

            for (a, b) in data.iter().zip(&original) {
                assert_relative_eq!(a.re, b.re, epsilon = 1e-12);
                assert_relative_eq!(a.im, b.im, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_parseval() {
        let mut rng = rand::rng();
        let size = 8;
        let fft = CenteredFft2::new(size);
        let mut data: Vec<Complex64> = (0..size * size)
            .map(|_| Complex64::new(rng.random(), rng.random()))
            .collect();

        let energy_before: f64 = data.iter().map(Complex64::norm_sqr).sum();
        fft.forward(&mut data);
        let energy_after: f64 = data.iter().map(Complex64::norm_sqr).sum();

        assert_relative_eq!(
            energy_after,
            (size * size) as f64 * energy_before,
            max_relative = 1e-12
        );
    }
}
