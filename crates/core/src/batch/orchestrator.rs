//! Fan-out of one distance sweep over a bounded worker pool
//!
//! A batch evaluates `normalize(propagate(field, distances[i], D, λ))` for every
//! `i`. The gather step tags each result with its request index, so
//! `result[i]` belongs to `distances[i]` no matter which worker finished first.
//!
//! Guarantees:
//! - **Ordering**: results are placed by index, never by completion order
//! - **Fail-fast**: the first task error aborts the batch; no partial sequence
//!   is returned and queued tasks of the same batch are skipped
//! - **Progress**: reported on the caller's thread as tasks finish, so the
//!   completed count is strictly increasing
//! - **Cancellation**: a [`CancelToken`] abandons an in-flight batch; the
//!   gather returns [`FresnelError::Cancelled`] without waiting for running
//!   tasks

use super::task::{Evaluator, FresnelEvaluator, PropagationTask};
use crate::core_types::params::{validate_aperture, validate_wavelength};
use crate::core_types::{Channel, DiffractionPattern, Meters, OpticalField, ResultSequence};
use crate::error::{FresnelError, Result};
use crate::solver::{normalize, AmplitudeConstant, ProfilerScope};
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// How often a blocked gather re-checks its cancel token.
const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Where batch tasks run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExecutionMode {
    /// One task after another on the caller's thread
    Sequential,
    /// Bounded rayon pool; `threads == 0` uses one worker per logical CPU
    Pooled {
        /// Worker count
        threads: usize,
    },
}

impl Default for ExecutionMode {
    fn default() -> Self {
        Self::Pooled { threads: 0 }
    }
}

/// Shared cancellation flag
///
/// Clones observe the same flag. Once set it stays set.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Fresh, un-cancelled token
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of every batch watching this token
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether cancellation was requested
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Completion status of a running batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Channel the batch is computing
    pub channel: Channel,
    /// Tasks finished so far
    pub completed: usize,
    /// Tasks in the batch
    pub total: usize,
}

impl Progress {
    /// Completed fraction in [0, 1]
    #[must_use]
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

/// One distance sweep of one field at one wavelength
#[derive(Debug, Clone)]
pub struct BatchRequest {
    /// Source field
    pub field: Arc<OpticalField>,
    /// Distances in the order results must come back
    pub distances: Vec<f64>,
    /// Aperture size D
    pub aperture: Meters,
    /// Wavelength λ
    pub wavelength: Meters,
    /// Channel label used in progress reports and errors
    pub channel: Channel,
}

impl BatchRequest {
    /// Sweep `field` over `distances` at the wavelength of `channel`
    pub fn new(
        field: impl Into<Arc<OpticalField>>,
        distances: Vec<f64>,
        aperture: Meters,
        channel: Channel,
    ) -> Self {
        Self {
            field: field.into(),
            distances,
            aperture,
            wavelength: channel.wavelength(),
            channel,
        }
    }

    /// Override the channel's default wavelength
    pub fn with_wavelength(mut self, wavelength: Meters) -> Self {
        self.wavelength = wavelength;
        self
    }

    fn task(&self, index: usize) -> PropagationTask {
        PropagationTask {
            field: Arc::clone(&self.field),
            distance: Meters::new(self.distances[index]),
            wavelength: self.wavelength,
            aperture: self.aperture,
        }
    }

    fn failure(&self, index: usize, source: FresnelError) -> FresnelError {
        FresnelError::Batch {
            index,
            distance: self.distances[index],
            channel: self.channel,
            source: Box::new(source),
        }
    }
}

/// Runs batches of propagation tasks and gathers them in request order
pub struct BatchOrchestrator<E = FresnelEvaluator> {
    evaluator: Arc<E>,
    pool: Option<ThreadPool>,
}

impl BatchOrchestrator<FresnelEvaluator> {
    /// Orchestrator backed by the Fresnel propagator
    ///
    /// # Errors
    ///
    /// Returns a pool error if the worker pool cannot be created.
    pub fn new(mode: ExecutionMode, amplitude: AmplitudeConstant) -> Result<Self> {
        Self::with_evaluator(FresnelEvaluator::new(amplitude), mode)
    }
}

impl<E: Evaluator + 'static> BatchOrchestrator<E> {
    /// Orchestrator backed by a custom evaluator
    ///
    /// # Errors
    ///
    /// Returns a pool error if the worker pool cannot be created.
    pub fn with_evaluator(evaluator: E, mode: ExecutionMode) -> Result<Self> {
        let pool = match mode {
            ExecutionMode::Sequential => None,
            ExecutionMode::Pooled { threads } => Some(
                ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("fresnel-worker-{i}"))
                    .build()?,
            ),
        };

        Ok(Self {
            evaluator: Arc::new(evaluator),
            pool,
        })
    }

    /// The evaluator tasks are handed to
    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Number of workers (1 for sequential execution)
    pub fn worker_count(&self) -> usize {
        self.pool.as_ref().map_or(1, ThreadPool::current_num_threads)
    }

    /// Run a batch without progress reporting or cancellation
    ///
    /// # Errors
    ///
    /// See [`BatchOrchestrator::run_batch_with`].
    pub fn run_batch(&self, request: &BatchRequest) -> Result<ResultSequence> {
        self.run_batch_with(request, &mut |_| {}, &CancelToken::new())
    }

    /// Run a batch, reporting progress and honoring `cancel`
    ///
    /// # Errors
    ///
    /// - Domain error if the aperture or wavelength is invalid (before dispatch)
    /// - [`FresnelError::Batch`] wrapping the first task error
    /// - [`FresnelError::Cancelled`] if `cancel` fires before completion
    pub fn run_batch_with(
        &self,
        request: &BatchRequest,
        progress: &mut dyn FnMut(Progress),
        cancel: &CancelToken,
    ) -> Result<ResultSequence> {
        validate_aperture(request.aperture)?;
        validate_wavelength(request.wavelength)?;

        let total = request.distances.len();
        info!(
            channel = %request.channel,
            tasks = total,
            workers = self.worker_count(),
            size = request.field.size(),
            "Starting propagation batch"
        );
        let _scope = ProfilerScope::new("batch").with_items(total);

        let outcome = match &self.pool {
            Some(pool) => self.gather_pooled(pool, request, progress, cancel),
            None => self.gather_sequential(request, progress, cancel),
        };

        match outcome {
            Ok(frames) => {
                info!(channel = %request.channel, tasks = total, "Batch complete");
                ResultSequence::new(request.distances.clone(), frames)
            }
            Err(FresnelError::Cancelled) => {
                warn!(channel = %request.channel, "Batch cancelled");
                Err(FresnelError::Cancelled)
            }
            Err(e) => {
                warn!(channel = %request.channel, "Batch aborted: {e}");
                Err(e)
            }
        }
    }

    fn gather_sequential(
        &self,
        request: &BatchRequest,
        progress: &mut dyn FnMut(Progress),
        cancel: &CancelToken,
    ) -> Result<Vec<DiffractionPattern>> {
        let total = request.distances.len();
        let mut frames = Vec::with_capacity(total);

        for index in 0..total {
            if cancel.is_cancelled() {
                return Err(FresnelError::Cancelled);
            }

            let frame = evaluate_guarded(self.evaluator.as_ref(), &request.task(index))
                .map_err(|e| request.failure(index, e))?;
            frames.push(frame);

            debug!(index, distance = request.distances[index], "Task finished");
            progress(Progress {
                channel: request.channel,
                completed: index + 1,
                total,
            });
        }

        Ok(frames)
    }

    fn gather_pooled(
        &self,
        pool: &ThreadPool,
        request: &BatchRequest,
        progress: &mut dyn FnMut(Progress),
        cancel: &CancelToken,
    ) -> Result<Vec<DiffractionPattern>> {
        let total = request.distances.len();
        let halt = CancelToken::new();
        let (tx, rx) = mpsc::channel::<(usize, Result<DiffractionPattern>)>();

        for index in 0..total {
            let task = request.task(index);
            let tx = tx.clone();
            let evaluator = Arc::clone(&self.evaluator);
            let halt = halt.clone();
            let cancel = cancel.clone();

            pool.spawn(move || {
                if halt.is_cancelled() || cancel.is_cancelled() {
                    return;
                }
                let outcome = evaluate_guarded(evaluator.as_ref(), &task);
                // The receiver is gone once the batch has failed or been cancelled.
                let _ = tx.send((index, outcome));
            });
        }
        drop(tx);

        let mut slots: Vec<Option<DiffractionPattern>> = (0..total).map(|_| None).collect();
        let mut completed = 0;

        while completed < total {
            if cancel.is_cancelled() {
                halt.cancel();
                return Err(FresnelError::Cancelled);
            }

            match rx.recv_timeout(CANCEL_POLL_INTERVAL) {
                Ok((index, Ok(frame))) => {
                    slots[index] = Some(frame);
                    completed += 1;

                    debug!(index, distance = request.distances[index], "Task finished");
                    progress(Progress {
                        channel: request.channel,
                        completed,
                        total,
                    });
                }
                Ok((index, Err(source))) => {
                    halt.cancel();
                    return Err(request.failure(index, source));
                }
                Err(RecvTimeoutError::Timeout) => {}
                // Every remaining task skipped itself, which only happens on cancel.
                Err(RecvTimeoutError::Disconnected) => return Err(FresnelError::Cancelled),
            }
        }

        slots
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or(FresnelError::Cancelled)
    }
}

/// Evaluate and normalize one task, turning a panic into an error
fn evaluate_guarded<E: Evaluator + ?Sized>(
    evaluator: &E,
    task: &PropagationTask,
) -> Result<DiffractionPattern> {
    catch_unwind(AssertUnwindSafe(|| evaluator.evaluate(task)))
        .unwrap_or_else(|payload| Err(panic_to_error(&*payload)))
        .map(|raw| normalize(&raw))
}

fn panic_to_error(payload: &(dyn std::any::Any + Send)) -> FresnelError {
    let message = payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string());
    FresnelError::WorkerPanic(message)
}
