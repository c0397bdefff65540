//! Typed work items and the evaluator seam
//!
//! Every unit of batch work is a [`PropagationTask`]: one shared source field,
//! one distance, one wavelength, one aperture size. Workers hand tasks to an
//! [`Evaluator`] with a fixed signature, so the orchestrator never deals with
//! loosely typed callables.

use crate::core_types::{DiffractionPattern, Meters, OpticalField, PhysicalParameters};
use crate::error::Result;
use crate::solver::{AmplitudeConstant, Propagator};
use std::sync::Arc;

/// One propagation to perform
#[derive(Debug, Clone)]
pub struct PropagationTask {
    /// Source field, shared read-only between all tasks of a batch
    pub field: Arc<OpticalField>,
    /// Propagation distance z
    pub distance: Meters,
    /// Wavelength λ
    pub wavelength: Meters,
    /// Aperture size D
    pub aperture: Meters,
}

impl PropagationTask {
    /// Validated physical parameters of this task
    ///
    /// # Errors
    ///
    /// Domain error if the distance, wavelength or aperture is out of range.
    pub fn parameters(&self) -> Result<PhysicalParameters> {
        PhysicalParameters::new(self.aperture, self.wavelength, self.distance)
    }
}

/// Backend-agnostic interface for evaluating one task
///
/// Implementations must be pure with respect to the task: the same task always
/// yields the same raw pattern, and no state is shared between calls. The
/// orchestrator normalizes whatever the evaluator returns.
pub trait Evaluator: Send + Sync {
    /// Compute the raw (un-normalized) intensity pattern for `task`
    ///
    /// # Errors
    ///
    /// Any error aborts the batch the task belongs to.
    fn evaluate(&self, task: &PropagationTask) -> Result<DiffractionPattern>;
}

/// Production evaluator running the Lohmann FrFT propagator
#[derive(Debug, Clone, Copy, Default)]
pub struct FresnelEvaluator {
    propagator: Propagator,
}

impl FresnelEvaluator {
    /// Create an evaluator with the given amplitude mode
    #[must_use]
    pub const fn new(amplitude: AmplitudeConstant) -> Self {
        Self {
            propagator: Propagator::new(amplitude),
        }
    }

    /// Amplitude mode of the wrapped propagator
    #[must_use]
    pub const fn amplitude(&self) -> AmplitudeConstant {
        self.propagator.amplitude()
    }
}

impl Evaluator for FresnelEvaluator {
    fn evaluate(&self, task: &PropagationTask) -> Result<DiffractionPattern> {
        let params = task.parameters()?;
        self.propagator.propagate(&task.field, &params)
    }
}
