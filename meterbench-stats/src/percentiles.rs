//! Percentile Computation
//!
//! Order statistics over the present values of a sample sequence.
//! Missing samples are skipped, exactly as in the running aggregates.

use crate::sample::Sample;
use serde::{Deserialize, Serialize};

/// Quartiles and upper tail of a sample sequence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Percentiles {
    /// 25th percentile
    pub p25: f64,
    /// 50th percentile (median)
    pub p50: f64,
    /// 75th percentile
    pub p75: f64,
    /// 90th percentile
    pub p90: f64,
    /// 99th percentile
    pub p99: f64,
}

fn sorted_values(samples: &[Sample]) -> Vec<f64> {
    let mut values: Vec<f64> = samples.iter().filter_map(|s| s.value()).collect();
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    values
}

fn interpolate(sorted: &[f64], percentile: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let rank = (percentile / 100.0).clamp(0.0, 1.0) * (n - 1) as f64;
            let lower_idx = rank.floor() as usize;
            let upper_idx = (lower_idx + 1).min(n - 1);
            let fraction = rank - lower_idx as f64;
            sorted[lower_idx] + fraction * (sorted[upper_idx] - sorted[lower_idx])
        }
    }
}

/// Compute a single percentile (0-100) with linear interpolation between
/// nearest ranks. Returns 0.0 when no value is present.
///
/// ```
/// use meterbench_stats::{Sample, compute_percentile};
/// let samples = [Sample::Value(1.0), Sample::Missing, Sample::Value(3.0)];
/// assert_eq!(compute_percentile(&samples, 50.0), 2.0);
/// ```
pub fn compute_percentile(samples: &[Sample], percentile: f64) -> f64 {
    interpolate(&sorted_values(samples), percentile)
}

/// Compute all standard percentiles with a single sort
pub fn compute_percentiles(samples: &[Sample]) -> Percentiles {
    let sorted = sorted_values(samples);
    Percentiles {
        p25: interpolate(&sorted, 25.0),
        p50: interpolate(&sorted, 50.0),
        p75: interpolate(&sorted, 75.0),
        p90: interpolate(&sorted, 90.0),
        p99: interpolate(&sorted, 99.0),
    }
}
