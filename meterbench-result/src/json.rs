//! JSON Output

use crate::tree::BenchmarkResult;
use serde::Serialize;

/// Schema identifier written next to every serialized tree
pub const SCHEMA: &str = "meterbench/result";

/// Schema version of [`generate_json_report`] output
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize)]
struct Document<'a> {
    schema: &'static str,
    version: u32,
    #[serde(flatten)]
    result: &'a BenchmarkResult,
}

/// Render a result tree as prettified JSON.
///
/// Missing samples are written as `null`.
pub fn generate_json_report(result: &BenchmarkResult) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&Document {
        schema: SCHEMA,
        version: SCHEMA_VERSION,
        result,
    })
}
