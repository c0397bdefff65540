//! Single-slot store for the latest successful sweep

use super::channels::Computation;
use crate::core_types::{DistanceRange, Meters, SourceImage};
use crate::error::Result;
use crate::solver::AmplitudeConstant;
use tracing::debug;

/// Everything a computation depends on
///
/// Floats are kept as raw bits so that keys compare exactly and can be hashed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BatchKey {
    field_fingerprint: u64,
    aperture: u64,
    range: [u64; 3],
    amplitude: AmplitudeConstant,
}

impl BatchKey {
    /// Key for sweeping `source` over `range` with aperture D and the given amplitude mode
    pub fn new(
        source: &SourceImage,
        aperture: Meters,
        range: &DistanceRange,
        amplitude: AmplitudeConstant,
    ) -> Self {
        Self {
            field_fingerprint: source.fingerprint(),
            aperture: aperture.value().to_bits(),
            range: [
                range.z_min.to_bits(),
                range.z_max.to_bits(),
                range.z_step.to_bits(),
            ],
            amplitude,
        }
    }
}

/// Holds at most one [`Computation`] together with the key it was computed for
#[derive(Debug, Default)]
pub struct ResultStore {
    entry: Option<(BatchKey, Computation)>,
}

impl ResultStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored computation if it was produced for `key`
    ///
    /// A stored entry for any other key is stale and gets dropped.
    pub fn lookup(&mut self, key: &BatchKey) -> Option<&Computation> {
        if self.entry.as_ref().is_some_and(|(stored, _)| stored != key) {
            debug!("Discarding stale sweep result");
            self.entry = None;
        }
        self.entry.as_ref().map(|(_, computation)| computation)
    }

    /// Replace the stored entry
    pub fn publish(&mut self, key: BatchKey, computation: Computation) {
        debug!(frames = computation.len(), "Publishing sweep result");
        self.entry = Some((key, computation));
    }

    /// Return the entry for `key`, running `compute` and publishing its result on a miss
    ///
    /// A failed computation leaves the store untouched.
    ///
    /// # Errors
    ///
    /// Whatever `compute` returns.
    pub fn get_or_compute<F>(&mut self, key: BatchKey, compute: F) -> Result<&Computation>
    where
        F: FnOnce() -> Result<Computation>,
    {
        let entry = match self.entry.take() {
            Some(entry) if entry.0 == key => entry,
            previous => match compute() {
                Ok(computation) => {
                    debug!(frames = computation.len(), "Publishing sweep result");
                    (key, computation)
                }
                Err(e) => {
                    self.entry = previous;
                    return Err(e);
                }
            },
        };
        let (_, computation) = self.entry.insert(entry);
        Ok(computation)
    }

    /// Drop the stored entry, whatever its key
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// Key of the stored entry, if any
    pub fn current_key(&self) -> Option<&BatchKey> {
        self.entry.as_ref().map(|(key, _)| key)
    }

    /// Stored computation, if any, without checking its key
    pub fn current(&self) -> Option<&Computation> {
        self.entry.as_ref().map(|(_, computation)| computation)
    }
}
