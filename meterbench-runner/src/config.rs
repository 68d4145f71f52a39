//! Configuration loading from meterbench.toml
//!
//! Meterbench configuration can be specified in a `meterbench.toml` file in the project root.
//! The configuration is automatically discovered by walking up from the current directory.

use crate::arrangement::{Arrangement, ArrangementKind};
use meterbench_core::TimeUnit;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name looked up by [`BenchConfig::discover`]
pub const CONFIG_FILE: &str = "meterbench.toml";

/// Meterbench configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BenchConfig {
    /// Runner configuration
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Built-in probes registered by `register_configured_probes`
    #[serde(default)]
    pub probes: ProbesConfig,
    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

/// Runner configuration for benchmark execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Runs of a benchmarked method that declares no count of its own
    #[serde(default = "default_runs")]
    pub default_runs: usize,
    /// Multiplier applied to every run count
    #[serde(default = "default_run_scale")]
    pub run_scale: f64,
    /// Arrangement strategy: "none", "sequential" or "random"
    #[serde(default)]
    pub arrangement: ArrangementKind,
    /// Seed for the random arrangement
    #[serde(default)]
    pub seed: Option<u64>,
    /// Regex on `Class#method`; only matching methods run
    #[serde(default)]
    pub filter: Option<String>,
    /// Pin the measuring thread to this CPU core
    #[serde(default)]
    pub pin_cpu: Option<usize>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            default_runs: default_runs(),
            run_scale: default_run_scale(),
            arrangement: ArrangementKind::default(),
            seed: None,
            filter: None,
            pin_cpu: None,
        }
    }
}

impl RunnerConfig {
    /// Arrangement described by `arrangement` and `seed`
    pub fn arrangement(&self) -> Arrangement {
        Arrangement::from_kind(self.arrangement, self.seed)
    }
}

fn default_runs() -> usize {
    1000
}
fn default_run_scale() -> f64 {
    1.0
}

/// Built-in probe selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbesConfig {
    /// Wall-clock time probe
    #[serde(default = "default_time")]
    pub time: bool,
    /// Unit of the time probe
    #[serde(default)]
    pub time_unit: TimeUnit,
    /// CPU cycle probe
    #[serde(default)]
    pub cycles: bool,
}

impl Default for ProbesConfig {
    fn default() -> Self {
        Self {
            time: default_time(),
            time_unit: TimeUnit::default(),
            cycles: false,
        }
    }
}

fn default_time() -> bool {
    true
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log every lifecycle transition
    #[serde(default)]
    pub verbose: bool,
}

impl BenchConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join(CONFIG_FILE);
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(config) => Some(config),
                    Err(e) => {
                        tracing::warn!(path = %config_path.display(), "ignoring config: {e:#}");
                        None
                    }
                };
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# Meterbench Configuration

[runner]
# Runs of a benchmarked method without its own run count
default_runs = 1000
# Multiplier applied to every run count (rounded, at least one run)
run_scale = 1.0
# Arrangement: "none", "sequential" or "random"
arrangement = "none"
# Seed for the random arrangement (uncomment to enable)
# seed = 42
# Only run methods whose Class#method id matches (uncomment to enable)
# filter = "^Parser#"
# Pin the measuring thread to a CPU core (uncomment to enable)
# pin_cpu = 0

[probes]
# Wall-clock time per invocation
time = true
# Unit: nanoseconds, microseconds, milliseconds or seconds
time_unit = "nanoseconds"
# CPU cycles per invocation
cycles = false

[log]
# Log every lifecycle transition
verbose = false
"#
        .to_string()
    }
}
