#![warn(missing_docs)]
//! Meterbench Statistical Engine
//!
//! Aggregates probe samples into derived statistics:
//! - Explicit "missing sample" variant instead of a numeric sentinel
//! - Running sums (sum, square sum, count) that combine exactly
//! - Mean, population standard deviation, min/max
//! - Normal-approximation confidence intervals (95% and 99%)
//! - Percentiles over present values

mod aggregate;
mod percentiles;
mod sample;
mod summary;

pub use aggregate::{Aggregate, ConfidenceInterval};
pub use percentiles::{Percentiles, compute_percentile, compute_percentiles};
pub use sample::Sample;
pub use summary::{SummaryStatistics, compute_summary};

/// z-score for a two-sided 95% confidence interval
pub const Z_95: f64 = 1.96;

/// z-score for a two-sided 99% confidence interval
pub const Z_99: f64 = 2.576;
