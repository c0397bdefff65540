//! Single-field propagation and per-frame post-processing
//!
//! Everything in this module is a pure function of its inputs: no shared
//! state, no I/O. The batch layer fans these out over a worker pool.
//!
//! # Example
//!
//! ```rust
//! use fresnel_core::core_types::{Meters, OpticalField};
//! use fresnel_core::solver::{normalize, propagate};
//!
//! let field = OpticalField::uniform(8, 1.0).unwrap();
//! let raw = propagate(&field, Meters::new(0.5), Meters::new(1e-2), Meters::new(530e-9)).unwrap();
//! let frame = normalize(&raw);
//! assert!(frame.as_slice().iter().all(|v| (0.0..=1.0).contains(v)));
//! ```

mod grid;
mod normalize;
pub mod profiler;
mod propagator;
mod recombine;
pub mod transform;

// Re-exports
pub use grid::CoordinateGrid;
pub use normalize::{normalize, FLAT_RANGE_THRESHOLD};
pub use profiler::ProfilerScope;
pub use propagator::{propagate, AmplitudeConstant, Propagator, COS_PHI_FLOOR};
pub use recombine::{recombine, stack_channels};
pub use transform::CenteredFft2;
