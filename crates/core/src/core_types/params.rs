//! Physical parameters of a propagation and the distance sweep

use super::units::Meters;
use crate::error::{FresnelError, Result};
use serde::{Deserialize, Serialize};

/// Aperture size, wavelength and distance of a single propagation
///
/// Invariants (checked by [`PhysicalParameters::new`]):
/// - `aperture > 0`, `wavelength > 0`, `distance >= 0`
/// - all three finite
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalParameters {
    aperture: Meters,
    wavelength: Meters,
    distance: Meters,
}

impl PhysicalParameters {
    /// Validate and group the parameters of one propagation
    ///
    /// # Errors
    ///
    /// Domain error if any invariant is violated.
    pub fn new(aperture: Meters, wavelength: Meters, distance: Meters) -> Result<Self> {
        validate_aperture(aperture)?;
        validate_wavelength(wavelength)?;
        if !distance.is_finite() || *distance < 0.0 {
            return Err(FresnelError::domain(
                "distance",
                *distance,
                "must be finite and non-negative",
            ));
        }
        Ok(Self {
            aperture,
            wavelength,
            distance,
        })
    }

    /// Physical side length D of the square input
    #[must_use]
    pub fn aperture(&self) -> Meters {
        self.aperture
    }

    /// Wavelength λ
    #[must_use]
    pub fn wavelength(&self) -> Meters {
        self.wavelength
    }

    /// Propagation distance z
    #[must_use]
    pub fn distance(&self) -> Meters {
        self.distance
    }

    /// Fractional angle for an N×N sampling of this aperture
    #[must_use]
    pub fn fractional_angle(&self, size: usize) -> FractionalAngle {
        FractionalAngle::new(self, size)
    }
}

/// Reject non-finite or non-positive aperture sizes.
pub(crate) fn validate_aperture(aperture: Meters) -> Result<()> {
    if !aperture.is_finite() || *aperture <= 0.0 {
        return Err(FresnelError::domain(
            "aperture",
            *aperture,
            "must be finite and positive",
        ));
    }
    Ok(())
}

/// Reject non-finite or non-positive wavelengths.
pub(crate) fn validate_wavelength(wavelength: Meters) -> Result<()> {
    if !wavelength.is_finite() || *wavelength <= 0.0 {
        return Err(FresnelError::domain(
            "wavelength",
            *wavelength,
            "must be finite and positive",
        ));
    }
    Ok(())
}

/// Fractional rotation angle φ = arctan(z / f1) with f1 = D² / (λN)
///
/// φ lies in [0, π/2) for z >= 0, and φ = 0 exactly when z = 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FractionalAngle {
    phi: f64,
    sampling: f64,
}

impl FractionalAngle {
    fn new(params: &PhysicalParameters, size: usize) -> Self {
        let sampling = fresnel_sampling(params.aperture, params.wavelength, size);
        Self {
            phi: (*params.distance / sampling).atan(),
            sampling,
        }
    }

    /// φ in radians
    #[must_use]
    pub fn radians(&self) -> f64 {
        self.phi
    }

    /// Fresnel sampling parameter f1 in meters
    #[must_use]
    pub fn sampling(&self) -> f64 {
        self.sampling
    }

    /// True for the no-propagation case z = 0
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.phi == 0.0
    }
}

/// Fresnel sampling parameter f1 = D² / (λN)
#[must_use]
pub fn fresnel_sampling(aperture: Meters, wavelength: Meters, size: usize) -> f64 {
    *aperture * *aperture / (*wavelength * size as f64)
}

/// Upper bound on the number of distances in one sweep
pub const MAX_DISTANCE_SAMPLES: usize = 100_000;

/// Evenly spaced sweep of propagation distances, both endpoints included
///
/// The number of samples is `round((z_max - z_min) / z_step) + 1`, rounding
/// halves to even; the actual spacing is stretched or shrunk slightly so that
/// `z_max` is hit exactly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceRange {
    /// First distance in meters
    pub z_min: f64,
    /// Last distance in meters
    pub z_max: f64,
    /// Requested spacing in meters
    pub z_step: f64,
}

impl Default for DistanceRange {
    fn default() -> Self {
        Self {
            z_min: 0.1,
            z_max: 1.0,
            z_step: 0.1,
        }
    }
}

impl DistanceRange {
    /// Create and validate a sweep
    ///
    /// # Errors
    ///
    /// See [`DistanceRange::validate`].
    pub fn new(z_min: f64, z_max: f64, z_step: f64) -> Result<Self> {
        let range = Self {
            z_min,
            z_max,
            z_step,
        };
        range.validate()?;
        Ok(range)
    }

    /// Check that the sweep is well formed
    ///
    /// # Errors
    ///
    /// Domain error unless all values are finite, `z_min >= 0`,
    /// `z_max >= z_min`, `z_step > 0` and the sweep has at most
    /// [`MAX_DISTANCE_SAMPLES`] distances.
    pub fn validate(&self) -> Result<()> {
        if !self.z_min.is_finite() || self.z_min < 0.0 {
            return Err(FresnelError::domain(
                "z_min",
                self.z_min,
                "must be finite and non-negative",
            ));
        }
        if !self.z_max.is_finite() || self.z_max < self.z_min {
            return Err(FresnelError::domain(
                "z_max",
                self.z_max,
                "must be finite and not below z_min",
            ));
        }
        if !self.z_step.is_finite() || self.z_step <= 0.0 {
            return Err(FresnelError::domain(
                "z_step",
                self.z_step,
                "must be finite and positive",
            ));
        }
        let intervals = self.intervals();
        if !intervals.is_finite() || intervals >= MAX_DISTANCE_SAMPLES as f64 {
            return Err(FresnelError::domain(
                "z_step",
                self.z_step,
                &format!("must give at most {MAX_DISTANCE_SAMPLES} distances"),
            ));
        }
        Ok(())
    }

    fn intervals(&self) -> f64 {
        ((self.z_max - self.z_min) / self.z_step).round_ties_even()
    }

    /// Number of distances in the sweep
    ///
    /// Never exceeds [`MAX_DISTANCE_SAMPLES`], even for a range that fails
    /// [`DistanceRange::validate`].
    #[must_use]
    pub fn count(&self) -> usize {
        let intervals = self.intervals();
        if intervals.is_nan() || intervals <= 0.0 {
            return 1;
        }
        intervals.min((MAX_DISTANCE_SAMPLES - 1) as f64) as usize + 1
    }

    /// The distances, in increasing order
    #[must_use]
    pub fn distances(&self) -> Vec<f64> {
        let count = self.count();
        if count == 1 {
            return vec![self.z_min];
        }

        let spacing = (self.z_max - self.z_min) / (count - 1) as f64;
        (0..count)
            .map(|i| {
                if i == count - 1 {
                    self.z_max
                } else {
                    self.z_min + i as f64 * spacing
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn meters(v: f64) -> Meters {
        Meters::new(v)
    }

    #[test]
    fn test_parameters_domain_checks() {
        let ok = PhysicalParameters::new(meters(1e-2), meters(530e-9), meters(0.5));
        assert!(ok.is_ok());

        for (d, l, z, name) in [
            (0.0, 530e-9, 0.5, "aperture"),
            (-1e-2, 530e-9, 0.5, "aperture"),
            (1e-2, 0.0, 0.5, "wavelength"),
            (1e-2, 530e-9, -0.1, "distance"),
            (1e-2, 530e-9, f64::INFINITY, "distance"),
        ] {
            match PhysicalParameters::new(meters(d), meters(l), meters(z)) {
                Err(FresnelError::Domain { name: got, .. }) => assert_eq!(got, name),
                other => panic!("expected domain error for {name}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_fresnel_sampling() {
        // D = 1 cm, λ = 530 nm, N = 4 → f1 = 1e-4 / 2.12e-6
        let f1 = fresnel_sampling(meters(1e-2), meters(530e-9), 4);
        assert_relative_eq!(f1, 47.16981132075472, max_relative = 1e-12);
    }

    #[test]
    fn test_fractional_angle() {
        let params = PhysicalParameters::new(meters(1e-2), meters(530e-9), meters(0.5)).unwrap();
        let angle = params.fractional_angle(4);
        assert_relative_eq!(angle.radians(), 0.010599603021429031, max_relative = 1e-12);
        assert!(!angle.is_identity());

        let at_zero = PhysicalParameters::new(meters(1e-2), meters(530e-9), meters(0.0)).unwrap();
        assert!(at_zero.fractional_angle(4).is_identity());
    }

    #[test]
    fn test_distance_range_default_sweep() {
        let distances = DistanceRange::default().distances();
        assert_eq!(distances.len(), 10);
        assert_eq!(distances[0], 0.1);
        assert_eq!(distances[9], 1.0);
        assert_relative_eq!(distances[4], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_distance_range_rounds_count() {
        // (1.0 - 0.1) / 0.25 = 3.6 → 4 intervals → 5 samples
        let range = DistanceRange::new(0.1, 1.0, 0.25).unwrap();
        let distances = range.distances();
        assert_eq!(distances.len(), 5);
        assert_relative_eq!(distances[1], 0.325, epsilon = 1e-12);
        assert_eq!(distances[4], 1.0);
    }

    #[test]
    fn test_distance_range_rounds_halves_to_even() {
        // 1.25 / 0.5 = 2.5 → 2 intervals
        let range = DistanceRange::new(0.5, 1.75, 0.5).unwrap();
        assert_eq!(range.count(), 3);
        let distances = range.distances();
        assert_relative_eq!(distances[1], 1.125, epsilon = 1e-12);
        assert_eq!(distances[2], 1.75);

        // 0.25 / 0.5 = 0.5 → 0 intervals
        let range = DistanceRange::new(0.0, 0.25, 0.5).unwrap();
        assert_eq!(range.distances(), vec![0.0]);
    }

    #[test]
    fn test_distance_range_caps_sample_count() {
        let err = DistanceRange::new(0.0, 1.0, 1e-300).unwrap_err();
        assert!(matches!(err, FresnelError::Domain { name: "z_step", .. }));
        assert!(DistanceRange::new(0.0, 1.0, 1.0 / MAX_DISTANCE_SAMPLES as f64).is_err());
        assert_eq!(
            DistanceRange::new(0.0, 1.0, 1.0 / (MAX_DISTANCE_SAMPLES - 1) as f64)
                .unwrap()
                .count(),
            MAX_DISTANCE_SAMPLES
        );

        // Unvalidated ranges still give a bounded count
        let unchecked = DistanceRange {
            z_min: 0.0,
            z_max: 1.0,
            z_step: 1e-300,
        };
        assert_eq!(unchecked.count(), MAX_DISTANCE_SAMPLES);
    }

    #[test]
    fn test_distance_range_single_value() {
        let range = DistanceRange::new(0.3, 0.3, 0.1).unwrap();
        assert_eq!(range.distances(), vec![0.3]);
    }

    #[test]
    fn test_distance_range_validation() {
        assert!(DistanceRange::new(-0.1, 1.0, 0.1).is_err());
        assert!(DistanceRange::new(1.0, 0.5, 0.1).is_err());
        assert!(DistanceRange::new(0.1, 1.0, 0.0).is_err());
        assert!(DistanceRange::new(0.1, f64::NAN, 0.1).is_err());
    }
}
