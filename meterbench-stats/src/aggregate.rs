//! Running Aggregates
//!
//! Sum, square sum and count are the only state; every derived statistic is
//! recomputed from them. Two aggregates over disjoint sample sets combine by
//! adding the sums, which keeps combination exact and associative instead of
//! averaging already-derived values.

use crate::sample::Sample;
use crate::{Z_95, Z_99};
use serde::{Deserialize, Serialize};

/// Confidence interval bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    /// Lower bound
    pub lower: f64,
    /// Upper bound
    pub upper: f64,
    /// Confidence level (e.g. 0.95)
    pub level: f64,
}

/// Running aggregate over a sample sequence.
///
/// Missing samples only bump `raw_count`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Aggregate {
    sum: f64,
    square_sum: f64,
    count: usize,
    raw_count: usize,
    min: Option<f64>,
    max: Option<f64>,
}

impl Aggregate {
    /// Empty aggregate
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregate a whole sequence
    pub fn from_samples(samples: &[Sample]) -> Self {
        samples.iter().copied().collect()
    }

    /// Add one sample
    #[inline]
    pub fn push(&mut self, sample: Sample) {
        self.raw_count += 1;

        let Sample::Value(v) = sample else {
            return;
        };

        self.sum += v;
        self.square_sum += v * v;
        self.count += 1;
        self.min = Some(self.min.map_or(v, |m| m.min(v)));
        self.max = Some(self.max.map_or(v, |m| m.max(v)));
    }

    /// Combine with an aggregate over a disjoint sample set
    pub fn merge(&self, other: &Aggregate) -> Aggregate {
        let pick = |a: Option<f64>, b: Option<f64>, f: fn(f64, f64) -> f64| match (a, b) {
            (Some(x), Some(y)) => Some(f(x, y)),
            (x, None) => x,
            (None, y) => y,
        };

        Aggregate {
            sum: self.sum + other.sum,
            square_sum: self.square_sum + other.square_sum,
            count: self.count + other.count,
            raw_count: self.raw_count + other.raw_count,
            min: pick(self.min, other.min, f64::min),
            max: pick(self.max, other.max, f64::max),
        }
    }

    /// Sum of present values
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Sum of squares of present values
    pub fn square_sum(&self) -> f64 {
        self.square_sum
    }

    /// Number of present (non-missing) values
    pub fn count(&self) -> usize {
        self.count
    }

    /// Number of recorded samples including missing ones
    pub fn raw_count(&self) -> usize {
        self.raw_count
    }

    /// Number of missing samples
    pub fn missing_count(&self) -> usize {
        self.raw_count - self.count
    }

    /// Arithmetic mean, 0.0 when nothing was measured
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }

    /// Population variance: `square_sum / count - mean²`
    pub fn variance(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let mean = self.mean();
        // Cancellation can push an all-equal series slightly below zero.
        (self.square_sum / self.count as f64 - mean * mean).max(0.0)
    }

    /// Population standard deviation
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Smallest present value, 0.0 when empty
    pub fn min(&self) -> f64 {
        self.min.unwrap_or(0.0)
    }

    /// Largest present value, 0.0 when empty
    pub fn max(&self) -> f64 {
        self.max.unwrap_or(0.0)
    }

    /// `mean ± z · stddev / √count`
    pub fn confidence(&self, z: f64, level: f64) -> ConfidenceInterval {
        if self.count == 0 {
            return ConfidenceInterval {
                lower: 0.0,
                upper: 0.0,
                level,
            };
        }
        let mean = self.mean();
        let half_width = z * (self.std_dev() / (self.count as f64).sqrt());
        ConfidenceInterval {
            lower: mean - half_width,
            upper: mean + half_width,
            level,
        }
    }

    /// 95% confidence interval of the mean
    pub fn conf95(&self) -> ConfidenceInterval {
        self.confidence(Z_95, 0.95)
    }

    /// 99% confidence interval of the mean
    pub fn conf99(&self) -> ConfidenceInterval {
        self.confidence(Z_99, 0.99)
    }
}

impl FromIterator<Sample> for Aggregate {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        let mut agg = Aggregate::new();
        agg.extend(iter);
        agg
    }
}

impl Extend<Sample> for Aggregate {
    fn extend<I: IntoIterator<Item = Sample>>(&mut self, iter: I) {
        for sample in iter {
            self.push(sample);
        }
    }
}
