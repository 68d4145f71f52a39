#![warn(missing_docs)]
//! Meterbench Runner Library
//!
//! Coordinates a benchmark run: register probes and classes on a
//! [`Benchmark`], pick an [`Arrangement`], and get a result tree back.
//!
//! # Example
//!
//! ```
//! use meterbench_core::{BenchClass, HookResult, MethodTable, TimeProbe};
//! use meterbench_runner::{Arrangement, Benchmark};
//!
//! #[derive(Default)]
//! struct Sorting {
//!     data: Vec<u32>,
//! }
//!
//! impl Sorting {
//!     fn fill(&mut self) -> HookResult {
//!         self.data = (0..256).rev().collect();
//!         Ok(())
//!     }
//!
//!     fn sort(&mut self) -> HookResult {
//!         self.data.sort_unstable();
//!         Ok(())
//!     }
//! }
//!
//! impl BenchClass for Sorting {
//!     fn describe(t: &mut MethodTable<Self>) {
//!         t.constructor(Self::default);
//!         t.hook(meterbench_core::Role::BeforeEachRun, "fill", Self::fill);
//!         t.bench("sort", Self::sort).runs(10);
//!     }
//! }
//!
//! let mut bench = Benchmark::default();
//! bench.register_probe(TimeProbe::default());
//! bench.add_class::<Sorting>()?;
//! let result = bench.run_with(1.0, Arrangement::NoArrangement)?;
//! assert_eq!(result.aggregate("time").count(), 10);
//! # Ok::<(), meterbench_runner::BenchError>(())
//! ```

mod arrangement;
mod benchmark;
mod config;
mod error;
mod executor;
mod registry;

pub use arrangement::{
    Arrangement, ArrangementKind, ArrangementPlan, PlanStep, build_plan, resolve_runs,
};
pub use benchmark::Benchmark;
pub use config::*;
pub use error::BenchError;
pub use executor::{
    AbortHandle, ExecutionSummary, LifecycleObserver, MethodStatistics, TracingListener,
    compute_statistics,
};

/// Install a `tracing` subscriber printing to stderr.
///
/// `RUST_LOG` wins when set; otherwise meterbench logs at `info`, or `debug`
/// when `verbose`. Does nothing if a global subscriber is already installed.
pub fn init_logging(verbose: bool) {
    let default = if verbose {
        "meterbench=debug"
    } else {
        "meterbench=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
