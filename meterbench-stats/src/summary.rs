//! Summary Statistics
//!
//! One-shot view of a sample sequence. Sums, moments and extremes come from
//! the running [`Aggregate`]; the median needs the full sequence.

use crate::aggregate::{Aggregate, ConfidenceInterval};
use crate::percentiles::compute_percentile;
use crate::sample::Sample;
use serde::{Deserialize, Serialize};

/// Comprehensive summary statistics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    /// Sum of present values
    pub sum: f64,
    /// Sum of squared present values
    pub square_sum: f64,

    /// Arithmetic mean
    pub mean: f64,
    /// 50th percentile
    pub median: f64,
    /// Population standard deviation
    pub std_dev: f64,

    /// Smallest present value
    pub min: f64,
    /// Largest present value
    pub max: f64,

    /// 95% confidence interval of the mean
    pub conf95: ConfidenceInterval,
    /// 99% confidence interval of the mean
    pub conf99: ConfidenceInterval,

    /// Present (non-missing) values
    pub result_count: usize,
    /// All stored samples, missing ones included
    pub raw_count: usize,
    /// Stored missing samples
    pub missing_count: usize,
}

impl From<&Aggregate> for SummaryStatistics {
    /// Summary without a median (set to the mean), for merged aggregates
    /// whose raw samples are no longer at hand.
    fn from(agg: &Aggregate) -> Self {
        Self {
            sum: agg.sum(),
            square_sum: agg.square_sum(),
            mean: agg.mean(),
            median: agg.mean(),
            std_dev: agg.std_dev(),
            min: agg.min(),
            max: agg.max(),
            conf95: agg.conf95(),
            conf99: agg.conf99(),
            result_count: agg.count(),
            raw_count: agg.raw_count(),
            missing_count: agg.missing_count(),
        }
    }
}

/// Compute summary statistics for a sample sequence
pub fn compute_summary(samples: &[Sample]) -> SummaryStatistics {
    let agg = Aggregate::from_samples(samples);
    SummaryStatistics {
        median: compute_percentile(samples, 50.0),
        ..SummaryStatistics::from(&agg)
    }
}

impl SummaryStatistics {
    /// Coefficient of variation in percent
    pub fn coefficient_of_variation(&self) -> f64 {
        if self.mean == 0.0 {
            0.0
        } else {
            (self.std_dev / self.mean) * 100.0
        }
    }

    /// Whether the distribution looks stable (CV below threshold)
    pub fn is_stable(&self, cv_threshold: f64) -> bool {
        self.coefficient_of_variation() < cv_threshold
    }
}
