#![warn(missing_docs)]
//! # Meterbench
//!
//! Micro-benchmark harness built around declared lifecycle roles.
//!
//! - **Explicit declaration**: a class lists its methods and their roles
//!   (class setup, first-run setup, per-run setup, benchmark, teardowns) in a
//!   method table, validated once when it is added
//! - **Failure isolation**: errors and panics in any hook or benchmark are
//!   recorded where they happened and the run carries on
//! - **Pluggable probes**: wall clock, cycle counter, user-driven counters or
//!   your own [`Probe`]
//! - **Arrangements**: declaration order, run-by-run interleaving, or a seeded
//!   shuffle
//! - **Exact statistics**: sums and square sums merge exactly, missing samples
//!   are stored but never aggregated
//!
//! ## Quick Start
//!
//! ```
//! use meterbench::prelude::*;
//!
//! #[derive(Default)]
//! struct Parse {
//!     input: String,
//! }
//!
//! impl Parse {
//!     fn prepare(&mut self) -> HookResult {
//!         self.input = "1,2,3,4,5,6,7,8".repeat(16);
//!         Ok(())
//!     }
//!
//!     fn parse(&mut self) -> HookResult {
//!         let total: u64 = self
//!             .input
//!             .split(',')
//!             .map(|s| s.parse::<u64>())
//!             .sum::<Result<u64, _>>()?;
//!         std::hint::black_box(total);
//!         Ok(())
//!     }
//! }
//!
//! impl BenchClass for Parse {
//!     fn describe(t: &mut MethodTable<Self>) {
//!         t.constructor(Self::default);
//!         t.hook(Role::BeforeFirstRun, "prepare", Self::prepare);
//!         t.bench("parse", Self::parse).runs(20);
//!     }
//! }
//!
//! let mut bench = Benchmark::default();
//! bench.register_probe(TimeProbe::new(TimeUnit::Microseconds));
//! bench.add_class::<Parse>()?;
//!
//! let result = bench.run()?;
//! assert_eq!(result.outcome(), RunOutcome::Completed);
//! assert_eq!(result.aggregate("time").count(), 20);
//! # Ok::<(), meterbench::BenchError>(())
//! ```

// Re-export core types
pub use meterbench_core::{
    BenchClass, BenchDecl, BenchmarkElement, CauseKind, ClassInfo, ClassLayout, Counter,
    CountingProbe, CycleProbe, DiscoveredClass, ElementId, FailureCause, FailureRecord,
    FailureScope, HAS_CYCLE_COUNTER, HookError, HookResult, HookSet, MethodDecl, MethodFn,
    MethodId, MethodTable, Origin, Probe, ProbeInfo, Role, TimeProbe, TimeUnit, ValidationError,
    build_elements, discover, guarded, pin_to_cpu, validate,
};

// Re-export result tree
pub use meterbench_result::{
    BenchmarkResult, ClassResult, MethodResult, ResultListener, ResultVisitor, RunMeta,
    RunOutcome, SampleSeries, generate_json_report,
};

// Re-export runner
pub use meterbench_runner::{
    AbortHandle, Arrangement, ArrangementKind, ArrangementPlan, BenchConfig, BenchError,
    Benchmark, ExecutionSummary, LifecycleObserver, MethodStatistics, PlanStep, TracingListener,
    build_plan, compute_statistics, init_logging, resolve_runs,
};

// Re-export stats
pub use meterbench_stats::{
    Aggregate, ConfidenceInterval, Percentiles, Sample, SummaryStatistics, compute_percentile,
    compute_percentiles, compute_summary,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Arrangement, BenchClass, BenchConfig, Benchmark, HookResult, MethodTable, Role,
        RunOutcome, Sample, TimeProbe, TimeUnit,
    };
}
