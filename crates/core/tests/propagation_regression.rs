//! Numeric regression and conservation checks for the Fresnel propagator
mod common;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use fresnel_core::core_types::{Meters, OpticalField, PhysicalParameters};
use fresnel_core::solver::transform::CenteredFft2;
use fresnel_core::{normalize, propagate, AmplitudeConstant, FresnelError, Propagator};
use num_complex::Complex64;

const APERTURE: Meters = Meters::new(1e-2);
const GREEN: Meters = Meters::new(530e-9);

/// Raw |U|² for a 4×4 field of ones at z = 0.5 m, D = 1 cm, λ = 530 nm.
const ONES_4X4_RAW: [f64; 16] = [
    9.993334465074203e-01,
    9.997490140788186e-01,
    9.996105699644418e-01,
    9.997490140788186e-01,
    9.997490140788183e-01,
    1.000164754461811e+00,
    1.000026252776176e+00,
    1.000164754461811e+00,
    9.996105699644418e-01,
    1.000026252776176e+00,
    9.998877702700972e-01,
    1.000026252776176e+00,
    9.997490140788181e-01,
    1.000164754461811e+00,
    1.000026252776175e+00,
    1.000164754461811e+00,
];

const ONES_4X4_NORMALIZED: [f64; 16] = [
    0.0,
    0.4998960604228758,
    0.3333583608308873,
    0.4998960604228758,
    0.4998960604226087,
    1.0,
    0.8333930465793369,
    1.0,
    0.3333583608308873,
    0.8333930465793369,
    0.6668091647012114,
    0.8333930465793369,
    0.4998960604223416,
    1.0,
    0.8333930465782685,
    1.0,
];

/// Same sweep with the absolute amplitude factor, scaled by 1/c².
const ONES_4X4_RETAINED: [f64; 16] = [
    1.122977224040895e-12,
    1.123444208228566e-12,
    1.123288634943402e-12,
    1.123444208228566e-12,
    1.123444208228566e-12,
    1.123911386609161e-12,
    1.123755748629663e-12,
    1.123911386609161e-12,
    1.123288634943402e-12,
    1.123755748629663e-12,
    1.123600132202737e-12,
    1.123755748629663e-12,
    1.123444208228565e-12,
    1.123911386609162e-12,
    1.123755748629663e-12,
    1.123911386609162e-12,
];

#[test]
fn test_uniform_4x4_matches_reference() {
    let field = OpticalField::uniform(4, 1.0).unwrap();
    let raw = propagate(&field, Meters::new(0.5), APERTURE, GREEN).unwrap();

    for (got, want) in raw.as_slice().iter().zip(ONES_4X4_RAW) {
        assert_relative_eq!(*got, want, max_relative = 1e-9);
    }

    let frame = normalize(&raw);
    for (got, want) in frame.as_slice().iter().zip(ONES_4X4_NORMALIZED) {
        assert_abs_diff_eq!(*got, want, epsilon = 1e-6);
    }
    assert!(matches!(frame.argmax(), Some((1 | 3, 1 | 3))));
}

#[test]
fn test_uniform_4x4_retained_amplitude() {
    let field = OpticalField::uniform(4, 1.0).unwrap();
    let params = PhysicalParameters::new(APERTURE, GREEN, Meters::new(0.5)).unwrap();
    let raw = Propagator::new(AmplitudeConstant::Retain)
        .propagate(&field, &params)
        .unwrap();

    for (got, want) in raw.as_slice().iter().zip(ONES_4X4_RETAINED) {
        assert_relative_eq!(*got, want, max_relative = 1e-8);
    }

    // The absolute range (~1e-15) is below the flat-field threshold.
    let frame = normalize(&raw);
    assert!(frame.as_slice().iter().all(|&v| v == 0.0));
}

#[test]
fn test_zero_distance_is_identity_for_odd_and_even_sizes() {
    for size in [5, 8] {
        let field = common::random_field(size);
        let raw = propagate(&field, Meters::new(0.0), APERTURE, GREEN).unwrap();

        for (out, input) in raw.as_slice().iter().zip(field.as_slice()) {
            assert_eq!(*out, input * input);
        }
    }
}

#[test]
fn test_near_field_approaches_source() {
    let field = common::square_aperture(32, 12);
    let raw = propagate(&field, Meters::new(1e-6), APERTURE, GREEN).unwrap();

    for (out, input) in raw.as_slice().iter().zip(field.as_slice()) {
        assert_abs_diff_eq!(*out, input * input, epsilon = 1e-3);
    }
}

#[test]
fn test_energy_scales_with_cos_squared() {
    let field = common::random_field(16);
    let input_energy: f64 = field.as_slice().iter().map(|v| v * v).sum();

    for z in [0.05, 0.5, 5.0] {
        let params = PhysicalParameters::new(APERTURE, GREEN, Meters::new(z)).unwrap();
        let cos_phi = params.fractional_angle(16).radians().cos();
        let raw = Propagator::default().propagate(&field, &params).unwrap();

        let output_energy: f64 = raw.as_slice().iter().sum();
        assert_relative_eq!(
            output_energy,
            cos_phi * cos_phi * input_energy,
            max_relative = 1e-9
        );
    }
}

#[test]
fn test_centered_transform_parseval() {
    let field = common::random_field(12);
    let mut data: Vec<Complex64> = field
        .as_slice()
        .iter()
        .map(|&v| Complex64::new(v, 0.0))
        .collect();
    let spatial: f64 = data.iter().map(Complex64::norm_sqr).sum();

    let fft = CenteredFft2::new(12);
    fft.forward(&mut data);
    let spectral: f64 = data.iter().map(Complex64::norm_sqr).sum();
    assert_relative_eq!(spectral, spatial * 144.0, max_relative = 1e-10);

    fft.inverse(&mut data);
    for (back, original) in data.iter().zip(field.as_slice()) {
        assert_abs_diff_eq!(back.re, *original, epsilon = 1e-12);
        assert_abs_diff_eq!(back.im, 0.0, epsilon = 1e-12);
    }
}

#[test]
fn test_output_is_point_symmetric_for_symmetric_source() {
    // Square of half-width 3 around the grid center at index 8
    let rows: Vec<Vec<f64>> = (0..16)
        .map(|y: usize| {
            (0..16)
                .map(|x: usize| {
                    if x.abs_diff(8) <= 3 && y.abs_diff(8) <= 3 {
                        1.0
                    } else {
                        0.0
                    }
                })
                .collect()
        })
        .collect();
    let field = OpticalField::from_rows(&rows).unwrap();
    let frame = normalize(&propagate(&field, Meters::new(0.8), APERTURE, GREEN).unwrap());

    // Coordinates run from -N/2 to N/2 - 1, so the mirror of index k is N - k.
    for y in 1..16 {
        for x in 1..16 {
            assert_abs_diff_eq!(frame.get(x, y), frame.get(16 - x, 16 - y), epsilon = 1e-9);
        }
    }
}

#[test]
fn test_invalid_parameters_are_domain_errors() {
    let field = OpticalField::uniform(4, 1.0).unwrap();

    let err = propagate(&field, Meters::new(-0.1), APERTURE, GREEN).unwrap_err();
    assert!(matches!(err, FresnelError::Domain { name: "distance", .. }));

    let err = propagate(&field, Meters::new(0.1), Meters::new(0.0), GREEN).unwrap_err();
    assert!(matches!(err, FresnelError::Domain { name: "aperture", .. }));

    let err = propagate(&field, Meters::new(0.1), APERTURE, Meters::new(f64::NAN)).unwrap_err();
    assert!(matches!(err, FresnelError::Domain { name: "wavelength", .. }));
}
