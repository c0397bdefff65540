//! Batch execution of distance sweeps
//!
//! A sweep over N distances is split into N independent [`PropagationTask`]s
//! that run on a bounded worker pool. Results are gathered back in request
//! order, normalized, and, for color sources, stacked into RGB frames.

mod channels;
mod orchestrator;
mod store;
mod task;

// Re-exports
pub use channels::{ChannelSet, Computation};
pub use orchestrator::{BatchOrchestrator, BatchRequest, CancelToken, ExecutionMode, Progress};
pub use store::{BatchKey, ResultStore};
pub use task::{Evaluator, FresnelEvaluator, PropagationTask};
