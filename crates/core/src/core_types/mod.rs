//! Core types and utilities

pub mod channel;
pub mod field;
pub mod params;
pub mod pattern;
pub mod units;

pub use channel::{Channel, BLUE_WAVELENGTH, GREEN_WAVELENGTH, RED_WAVELENGTH};
pub use field::{OpticalField, Raster, RgbField, SourceImage};
pub use params::{
    fresnel_sampling, DistanceRange, FractionalAngle, PhysicalParameters, MAX_DISTANCE_SAMPLES,
};
pub use pattern::{DiffractionPattern, ResultSequence, RgbPattern};
pub use units::*;
