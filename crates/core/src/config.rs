//! Run configuration
//!
//! [`SimulationConfig`] bundles every parameter of a sweep except the source
//! image itself. Missing fields in a serialized config fall back to the
//! defaults below, so a partial JSON file is enough:
//!
//! ```
//! use fresnel_core::config::SimulationConfig;
//!
//! let config: SimulationConfig = serde_json::from_str(r#"{ "aperture": 0.02 }"#).unwrap();
//! assert_eq!(*config.aperture, 0.02);
//! assert_eq!(config.range.distances().len(), 10);
//! ```

use crate::batch::{BatchKey, BatchOrchestrator, ExecutionMode};
use crate::core_types::params::validate_aperture;
use crate::core_types::{DistanceRange, Meters, SourceImage};
use crate::error::Result;
use crate::solver::AmplitudeConstant;
use serde::{Deserialize, Serialize};

/// Default aperture size D in meters
pub const DEFAULT_APERTURE: Meters = Meters::new(1e-2);

/// Parameters of one distance sweep
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Physical side length D of the source plane
    pub aperture: Meters,
    /// Distances to propagate to
    pub range: DistanceRange,
    /// Whether raw intensities carry the absolute Fresnel amplitude factor
    pub amplitude: AmplitudeConstant,
    /// Sequential or pooled execution
    pub execution: ExecutionMode,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            aperture: DEFAULT_APERTURE,
            range: DistanceRange::default(),
            amplitude: AmplitudeConstant::default(),
            execution: ExecutionMode::default(),
        }
    }
}

impl SimulationConfig {
    /// Reject an invalid aperture or distance range before anything is dispatched
    ///
    /// # Errors
    ///
    /// Domain error naming the offending field.
    pub fn validate(&self) -> Result<()> {
        validate_aperture(self.aperture)?;
        self.range.validate()
    }

    /// Build the production orchestrator described by this config
    ///
    /// # Errors
    ///
    /// Domain error from [`SimulationConfig::validate`], or a pool error.
    pub fn orchestrator(&self) -> Result<BatchOrchestrator> {
        self.validate()?;
        BatchOrchestrator::new(self.execution, self.amplitude)
    }

    /// Store key for sweeping `source` with this config
    pub fn batch_key(&self, source: &SourceImage) -> BatchKey {
        BatchKey::new(source, self.aperture, &self.range, self.amplitude)
    }
}
