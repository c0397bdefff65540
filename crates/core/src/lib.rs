//! Fresnel Diffraction Core Library
//!
//! Computes how a coherent light field diffracts as it travels a distance z
//! from a square aperture. Propagation uses Lohmann's type-II fractional
//! Fourier transform formulation of the Fresnel integral: a lens chirp, a
//! centered 2-D FFT, a kernel chirp, an inverse FFT and a second lens chirp,
//! all on an N×N grid.
//!
//! ## Pipeline
//!
//! - [`solver`]: single-field propagation, min-max normalization and RGB stacking
//! - [`batch`]: distance sweeps over a bounded worker pool with ordered gather,
//!   fail-fast errors, progress reporting and cancellation
//! - [`config`]: serializable sweep parameters
//!
//! ```rust
//! use fresnel_core::{
//!     BatchOrchestrator, CancelToken, ExecutionMode, Meters, OpticalField, AmplitudeConstant,
//! };
//!
//! let field = OpticalField::uniform(16, 1.0).unwrap();
//! let orchestrator =
//!     BatchOrchestrator::new(ExecutionMode::Sequential, AmplitudeConstant::Omit).unwrap();
//! let frames = orchestrator
//!     .run_grayscale(field, &[0.1, 0.5], Meters::new(1e-2), &mut |_| {}, &CancelToken::new())
//!     .unwrap();
//! assert_eq!(frames.len(), 2);
//! ```

// Core types and utilities
pub mod core_types;
pub mod error;

// Numerics and execution
pub mod batch;
pub mod config;
pub mod solver;

// Re-export core types
pub use core_types::{
    Channel, DiffractionPattern, DistanceRange, Meters, OpticalField, PhysicalParameters,
    ResultSequence, RgbField, RgbPattern, SourceImage,
};
pub use error::{FresnelError, Result};

// Re-export execution types
pub use batch::{
    BatchKey, BatchOrchestrator, BatchRequest, CancelToken, ChannelSet, Computation, Evaluator,
    ExecutionMode, FresnelEvaluator, Progress, PropagationTask, ResultStore,
};
pub use config::SimulationConfig;
pub use solver::{normalize, propagate, recombine, AmplitudeConstant, Propagator};
