//! Run metadata

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How and when a result tree was produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMeta {
    /// Crate version that produced the run
    pub version: String,
    /// Start of the run
    pub timestamp: DateTime<Utc>,
    /// Arrangement label (`none`, `sequential`, `random`)
    pub arrangement: String,
    /// Multiplier applied to every run count
    pub run_scale: f64,
    /// Seed of a random arrangement, including one drawn for the run
    pub seed: Option<u64>,
    /// Steps in the arrangement plan
    pub planned_steps: usize,
    /// Steps that reached a live class; steps of classes whose setup failed
    /// and steps dropped by an abort are not counted
    pub executed_steps: usize,
    /// Wall-clock duration of the whole run
    pub duration_ms: f64,
    /// Stopped early through an abort handle
    pub aborted: bool,
}
