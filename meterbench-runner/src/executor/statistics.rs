//! Statistics Computation
//!
//! Parallel computation of summary statistics for a finished result tree.
//!
//! Uses Rayon to parallelize across (method, probe) series. The run is over
//! by the time this is called, so the tree is only read.

use meterbench_core::{MethodId, ProbeInfo};
use meterbench_result::BenchmarkResult;
use meterbench_stats::{Percentiles, SummaryStatistics, compute_percentiles, compute_summary};
use rayon::prelude::*;
use serde::Serialize;

/// Statistics of one probe on one method
#[derive(Debug, Clone, Serialize)]
pub struct MethodStatistics {
    /// Measured method
    pub method: MethodId,
    /// Probe of the series
    pub probe: ProbeInfo,
    /// Summary over present values
    pub summary: SummaryStatistics,
    /// Percentiles over present values
    pub percentiles: Percentiles,
}

/// Compute statistics for every series in the tree (parallelized with Rayon)
///
/// Returned in tree order. Series without any present value are skipped.
pub fn compute_statistics(result: &BenchmarkResult) -> Vec<MethodStatistics> {
    let series: Vec<_> = result
        .classes()
        .iter()
        .flat_map(|c| c.methods())
        .flat_map(|m| m.series().iter().map(move |s| (m.method(), s)))
        .collect();

    series
        .par_iter() // Parallel iteration
        .filter(|(_, s)| s.samples.iter().any(|sample| !sample.is_missing()))
        .map(|&(method, s)| MethodStatistics {
            method: *method,
            probe: s.probe.clone(),
            summary: compute_summary(&s.samples),
            percentiles: compute_percentiles(&s.samples),
        })
        .collect()
}
