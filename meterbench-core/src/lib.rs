#![warn(missing_docs)]
//! Meterbench Core - Benchmark Model
//!
//! This crate describes what gets benchmarked and how it is measured:
//! - `BenchClass` and `MethodTable` for declaring methods and lifecycle roles
//! - Discovery and structural validation into cached `ClassLayout`s
//! - `BenchmarkElement`s, the unit of arrangement and execution
//! - Measurement probes (wall clock, cycle counter, tick counter)
//! - Failure records with panic isolation

mod class;
mod discovery;
mod element;
mod error;
mod failure;
mod measure;
mod probe;
mod role;

pub use class::{BenchClass, HookError, HookResult, MethodDecl, MethodFn, MethodTable};
pub use discovery::{DiscoveredClass, discover, validate};
pub use element::{
    BenchDecl, BenchmarkElement, ClassInfo, ClassLayout, ElementId, HookSet, MethodId, Origin,
    build_elements,
};
pub use error::ValidationError;
pub use failure::{CauseKind, FailureCause, FailureRecord, guarded};
/// Whether this platform provides a hardware cycle counter (x86_64 RDTSCP or AArch64 CNTVCT_EL0).
/// When `false`, [`CycleProbe`] records missing samples and only wall-clock time is available.
pub use measure::HAS_CYCLE_COUNTER;
pub use measure::pin_to_cpu;
pub use probe::{CountingProbe, Counter, CycleProbe, Probe, ProbeInfo, TimeProbe, TimeUnit};
pub use role::{FailureScope, Role};

pub use meterbench_stats::Sample;
