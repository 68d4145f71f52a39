#![warn(missing_docs)]
//! Meterbench Result - Result Tree
//!
//! Hierarchical storage of everything a run produced:
//! - `BenchmarkResult` → `ClassResult` → `MethodResult` → per-probe series
//! - Failure placement by lifecycle role
//! - Exact per-level aggregation and tree merging
//! - Visitor traversal and streaming listeners for output collaborators
//! - JSON (machine-readable)

mod json;
mod meta;
mod tree;
mod visitor;

pub use json::{SCHEMA, SCHEMA_VERSION, generate_json_report};
pub use meta::RunMeta;
pub use tree::{BenchmarkResult, ClassResult, MethodResult, RunOutcome, SampleSeries};
pub use visitor::{ResultListener, ResultVisitor};
