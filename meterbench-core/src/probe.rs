//! Measurement Probes
//!
//! A probe is started right before a benchmarked invocation and read right
//! after it returns. Probes never block and are assumed infallible: a probe
//! that cannot produce a number reports [`Sample::Missing`], anything worse
//! is a programming error.

use crate::measure::{HAS_CYCLE_COUNTER, read_cycles};
use meterbench_stats::Sample;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity and unit of a probe.
///
/// Two probes with the same name are the same probe as far as the
/// coordinator and the result tree are concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProbeInfo {
    /// Unique probe name
    pub name: String,
    /// Short unit label (e.g. "ms")
    pub unit: String,
    /// Long unit description (e.g. "milliseconds")
    pub unit_description: String,
}

impl ProbeInfo {
    /// Describe a probe
    pub fn new(
        name: impl Into<String>,
        unit: impl Into<String>,
        unit_description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
            unit_description: unit_description.into(),
        }
    }
}

impl std::fmt::Display for ProbeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.name, self.unit)
    }
}

/// A pluggable measurement source.
pub trait Probe {
    /// Name and unit
    fn info(&self) -> &ProbeInfo;

    /// Reset the accumulator; called immediately before the invocation.
    fn start(&mut self);

    /// Read the value accumulated since [`Probe::start`]; called immediately
    /// after a successful invocation, exactly once.
    fn record(&mut self) -> Sample;
}

/// Time unit for [`TimeProbe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    /// Nanoseconds
    #[default]
    Nanoseconds,
    /// Microseconds
    Microseconds,
    /// Milliseconds
    Milliseconds,
    /// Seconds
    Seconds,
}

impl TimeUnit {
    fn label(self) -> (&'static str, &'static str) {
        match self {
            TimeUnit::Nanoseconds => ("ns", "nanoseconds"),
            TimeUnit::Microseconds => ("us", "microseconds"),
            TimeUnit::Milliseconds => ("ms", "milliseconds"),
            TimeUnit::Seconds => ("s", "seconds"),
        }
    }

    fn from_nanos(self, nanos: u128) -> f64 {
        let nanos = nanos as f64;
        match self {
            TimeUnit::Nanoseconds => nanos,
            TimeUnit::Microseconds => nanos / 1_000.0,
            TimeUnit::Milliseconds => nanos / 1_000_000.0,
            TimeUnit::Seconds => nanos / 1_000_000_000.0,
        }
    }
}

/// Wall-clock time of one invocation
#[derive(Debug)]
pub struct TimeProbe {
    info: ProbeInfo,
    unit: TimeUnit,
    start: Option<std::time::Instant>,
}

impl TimeProbe {
    /// Wall-clock probe named "time" in the given unit
    pub fn new(unit: TimeUnit) -> Self {
        let (short, long) = unit.label();
        Self {
            info: ProbeInfo::new("time", short, long),
            unit,
            start: None,
        }
    }
}

impl Default for TimeProbe {
    fn default() -> Self {
        Self::new(TimeUnit::default())
    }
}

impl Probe for TimeProbe {
    fn info(&self) -> &ProbeInfo {
        &self.info
    }

    #[inline(always)]
    fn start(&mut self) {
        self.start = Some(std::time::Instant::now());
    }

    #[inline(always)]
    fn record(&mut self) -> Sample {
        match self.start.take() {
            Some(start) => Sample::Value(self.unit.from_nanos(start.elapsed().as_nanos())),
            None => Sample::Missing,
        }
    }
}

/// CPU cycles of one invocation.
///
/// Records [`Sample::Missing`] on platforms without a cycle counter.
#[derive(Debug)]
pub struct CycleProbe {
    info: ProbeInfo,
    cycles_start: u64,
}

impl CycleProbe {
    /// Cycle probe named "cycles"
    pub fn new() -> Self {
        Self {
            info: ProbeInfo::new("cycles", "cyc", "cpu cycles"),
            cycles_start: 0,
        }
    }
}

impl Default for CycleProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl Probe for CycleProbe {
    fn info(&self) -> &ProbeInfo {
        &self.info
    }

    #[inline(always)]
    fn start(&mut self) {
        self.cycles_start = read_cycles();
    }

    #[inline(always)]
    fn record(&mut self) -> Sample {
        if !HAS_CYCLE_COUNTER {
            return Sample::Missing;
        }
        Sample::Value(read_cycles().saturating_sub(self.cycles_start) as f64)
    }
}

/// Shared tick counter driven by benchmark code
#[derive(Debug, Clone, Default)]
pub struct Counter(Arc<AtomicU64>);

impl Counter {
    /// Count one event
    #[inline]
    pub fn tick(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    /// Count `n` events
    #[inline]
    pub fn add(&self, n: u64) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }

    /// Total ticks so far
    pub fn value(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Number of [`Counter`] ticks during one invocation
#[derive(Debug)]
pub struct CountingProbe {
    info: ProbeInfo,
    counter: Counter,
    baseline: u64,
}

impl CountingProbe {
    /// Create a probe and the counter that feeds it
    pub fn new(name: impl Into<String>) -> (Self, Counter) {
        let counter = Counter::default();
        let probe = Self {
            info: ProbeInfo::new(name, "ticks", "counted events"),
            counter: counter.clone(),
            baseline: 0,
        };
        (probe, counter)
    }
}

impl Probe for CountingProbe {
    fn info(&self) -> &ProbeInfo {
        &self.info
    }

    fn start(&mut self) {
        self.baseline = self.counter.value();
    }

    fn record(&mut self) -> Sample {
        Sample::Value(self.counter.value().saturating_sub(self.baseline) as f64)
    }
}
