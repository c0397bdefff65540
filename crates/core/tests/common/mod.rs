//! Shared setup for integration tests

use fresnel_core::OpticalField;
use rand::Rng;

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// Square field of uniform random samples in [0, 1)
#[allow(dead_code)]
pub fn random_field(size: usize) -> OpticalField {
    let mut rng = rand::rng();
    let data = (0..size * size).map(|_| rng.random::<f64>()).collect();
    OpticalField::new(size, data).unwrap()
}

/// Centered square aperture of side `side` pixels
#[allow(dead_code)]
pub fn square_aperture(size: usize, side: usize) -> OpticalField {
    let start = (size - side) / 2;
    let mut data = vec![0.0; size * size];
    for y in start..start + side {
        for x in start..start + side {
            data[y * size + x] = 1.0;
        }
    }
    OpticalField::new(size, data).unwrap()
}
