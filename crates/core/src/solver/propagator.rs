//! Fresnel propagation through a Lohmann type-II fractional Fourier transform
//!
//! The Fresnel integral over a distance z is evaluated exactly (no paraxial
//! resampling) as a lens–propagation–lens system:
//!
//! 1. f1 = D²/(λN), φ = arctan(z / f1)
//! 2. multiply by the lens chirp L = exp(-iπ(n²+m²)/N · tan(φ/2))
//! 3. centered forward DFT
//! 4. multiply by the kernel transform K = exp(-iπ(n²+m²)/N · sin φ)
//! 5. centered inverse DFT
//! 6. multiply by L again
//! 7. multiply by the Lohmann-to-Fresnel factor cos φ · exp(iπ tan φ (n²+m²)/N)
//! 8. intensity |·|²
//!
//! The Fresnel amplitude constant exp(i2πc)/(ic), c = D²/(λ²N)·sin φ, is the
//! same for every sample. It only matters when absolute intensities are needed,
//! so it is applied on request ([`AmplitudeConstant::Retain`]).

use super::grid::{elementwise_multiply, CoordinateGrid};
use super::transform::CenteredFft2;
use crate::core_types::{DiffractionPattern, Meters, OpticalField, PhysicalParameters};
use crate::error::{FresnelError, Result};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// φ is treated as π/2 once cos φ drops to this value.
pub const COS_PHI_FLOOR: f64 = 1e-12;

/// Whether the spatially constant Fresnel amplitude factor is applied
///
/// Min-max normalization cancels any global factor, so both modes give the
/// same normalized frames as long as the raw range stays above the flat-field
/// threshold. Raw intensities differ: only `Retain` yields absolute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmplitudeConstant {
    /// Relative intensities only (default)
    #[default]
    Omit,
    /// Multiply by exp(i2πc)/(ic) for absolute intensities
    Retain,
}

/// Single-field, single-distance, single-wavelength propagator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Propagator {
    amplitude: AmplitudeConstant,
}

impl Propagator {
    /// Create a propagator with the given amplitude mode
    #[must_use]
    pub const fn new(amplitude: AmplitudeConstant) -> Self {
        Self { amplitude }
    }

    /// Amplitude mode in use
    #[must_use]
    pub const fn amplitude(&self) -> AmplitudeConstant {
        self.amplitude
    }

    /// Propagate `field` and return the raw intensity pattern
    ///
    /// z = 0 short-circuits to |field|²: the system is the identity there and
    /// the amplitude constant is singular.
    ///
    /// # Errors
    ///
    /// Numeric singularity if φ is indistinguishable from π/2, the amplitude
    /// constant cannot be evaluated, or any output sample is non-finite.
    pub fn propagate(
        &self,
        field: &OpticalField,
        params: &PhysicalParameters,
    ) -> Result<DiffractionPattern> {
        let size = field.size();
        let z = *params.distance();
        let angle = params.fractional_angle(size);

        if angle.is_identity() {
            return Ok(intensity_of_field(field));
        }

        let phi = angle.radians();
        let (sin_phi, cos_phi) = phi.sin_cos();
        if cos_phi <= COS_PHI_FLOOR {
            return Err(FresnelError::singularity(
                z,
                format!(
                    "fractional angle {phi} rad is at pi/2 (f1 = {} m)",
                    angle.sampling()
                ),
            ));
        }

        let grid = CoordinateGrid::new(size);
        let lens = grid.chirp(-(phi / 2.0).tan());

        // First lens
        let mut out: Vec<Complex64> = field
            .as_slice()
            .iter()
            .zip(&lens)
            .map(|(&f, &l)| l * f)
            .collect();

        // Free-space propagation in the fractional domain
        let fft = CenteredFft2::new(size);
        fft.forward(&mut out);
        elementwise_multiply(&mut out, &grid.chirp(-sin_phi));
        fft.inverse(&mut out);

        if self.amplitude == AmplitudeConstant::Retain {
            let constant = amplitude_constant(params, size, sin_phi)?;
            out.iter_mut().for_each(|x| *x *= constant);
        }

        // Second lens
        elementwise_multiply(&mut out, &lens);

        // Lohmann to Fresnel
        let conversion = grid.chirp(phi.tan());
        out.iter_mut()
            .zip(&conversion)
            .for_each(|(x, c)| *x *= c * cos_phi);

        let intensity: Vec<f64> = out.iter().map(Complex64::norm_sqr).collect();
        if let Some(bad) = intensity.iter().position(|v| !v.is_finite()) {
            return Err(FresnelError::singularity(
                z,
                format!("non-finite intensity at sample {bad}"),
            ));
        }

        Ok(DiffractionPattern::from_raw(size, intensity))
    }
}

/// exp(i2πc) / (ic) with c = D²/(λ²N) · sin φ
fn amplitude_constant(params: &PhysicalParameters, size: usize, sin_phi: f64) -> Result<Complex64> {
    let aperture = *params.aperture();
    let wavelength = *params.wavelength();
    let c = aperture * aperture / (wavelength * wavelength * size as f64) * sin_phi;

    if !c.is_normal() {
        return Err(FresnelError::singularity(
            *params.distance(),
            format!("amplitude constant denominator is {c}"),
        ));
    }

    let constant = Complex64::cis(TAU * c) / Complex64::new(0.0, c);
    if !(constant.re.is_finite() && constant.im.is_finite()) {
        return Err(FresnelError::singularity(
            *params.distance(),
            "amplitude constant overflowed",
        ));
    }
    Ok(constant)
}

fn intensity_of_field(field: &OpticalField) -> DiffractionPattern {
    let data = field.as_slice().iter().map(|v| v * v).collect();
    DiffractionPattern::from_raw(field.size(), data)
}

/// Propagate `field` over `distance` with the default (relative) amplitude mode
///
/// # Errors
///
/// Domain error for invalid parameters, otherwise see [`Propagator::propagate`].
pub fn propagate(
    field: &OpticalField,
    distance: Meters,
    aperture: Meters,
    wavelength: Meters,
) -> Result<DiffractionPattern> {
    let params = PhysicalParameters::new(aperture, wavelength, distance)?;
    Propagator::default().propagate(field, &params)
}
