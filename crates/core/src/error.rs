//! Error types for field propagation and batch execution
//!
//! Every fallible operation in this crate returns [`Result`], whose error side is
//! [`FresnelError`]. Shape and domain problems are detected before any numeric
//! work starts; numeric singularities are reported instead of leaking NaN pixels.

use crate::core_types::Channel;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, FresnelError>;

/// Failure taxonomy shared by the propagator, the orchestrator and the recombiner.
#[derive(Debug, Error)]
pub enum FresnelError {
    /// Non-square field, wrong data length, or mismatched channel shapes.
    #[error("shape error: {0}")]
    Shape(String),

    /// A physical parameter or sample value outside its valid domain.
    #[error("parameter '{name}' out of domain: {message}")]
    Domain {
        /// Name of the offending parameter (e.g. `"aperture"`, `"distance"`)
        name: &'static str,
        /// Description of the violated constraint
        message: String,
    },

    /// The fractional angle reached π/2, the amplitude constant is singular,
    /// or the propagated field contains non-finite values.
    #[error("numeric singularity at z = {distance} m: {message}")]
    NumericSingularity {
        /// Propagation distance in meters
        distance: f64,
        /// What went wrong
        message: String,
    },

    /// One task of a batch failed; the whole batch was discarded.
    #[error("batch aborted at index {index} (z = {distance} m, {channel} channel): {source}")]
    Batch {
        /// Position of the failing distance in the request
        index: usize,
        /// Failing distance in meters
        distance: f64,
        /// Channel the batch was computing
        channel: Channel,
        /// Underlying task error
        source: Box<FresnelError>,
    },

    /// A worker panicked while evaluating a task.
    #[error("worker panicked: {0}")]
    WorkerPanic(String),

    /// The caller cancelled the batch before it completed.
    #[error("batch cancelled")]
    Cancelled,

    /// The bounded worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

impl FresnelError {
    /// Create a shape error with a custom message.
    pub fn shape(message: impl Into<String>) -> Self {
        Self::Shape(message.into())
    }

    /// Create a domain error for a parameter value.
    ///
    /// # Arguments
    /// * `name` - The parameter name (e.g. `"aperture"`, `"wavelength"`)
    /// * `value` - The rejected value
    /// * `constraint` - Description of the constraint (e.g. `"must be positive"`)
    pub fn domain(name: &'static str, value: f64, constraint: &str) -> Self {
        Self::Domain {
            name,
            message: format!("{constraint}, got {value}"),
        }
    }

    /// Create a numeric singularity error for a given distance.
    pub fn singularity(distance: f64, message: impl Into<String>) -> Self {
        Self::NumericSingularity {
            distance,
            message: message.into(),
        }
    }

    /// Innermost error, unwrapping any batch context.
    pub fn root_cause(&self) -> &FresnelError {
        match self {
            Self::Batch { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
