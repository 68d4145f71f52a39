//! Benchmark Executor
//!
//! Runs an arrangement plan and collects results into a result tree.
//!
//! ## Pipeline Overview
//!
//! ```text
//! BenchmarkElement (built per run)
//!       │
//!       ▼
//! ┌─────────────┐
//! │ arrangement │  Order (element, run) steps
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │  execution  │  Lifecycle hooks, probes, failure isolation
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ statistics  │  Summary stats per series (parallel)
//! └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`execution`] - Lifecycle state machine
//! - [`control`] - Lifecycle observer and abort handle
//! - [`statistics`] - Parallel statistics computation
//! - [`listener`] - Log-backed streaming listener

mod control;
mod execution;
mod listener;
mod statistics;

pub use control::{AbortHandle, LifecycleObserver};
pub(crate) use execution::Executor;
pub use execution::ExecutionSummary;
pub use listener::TracingListener;
pub use statistics::{MethodStatistics, compute_statistics};
