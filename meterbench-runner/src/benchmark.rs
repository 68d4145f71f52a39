//! Benchmark Coordinator
//!
//! Entry point of a run: probes and classes are registered here, validated
//! eagerly, and turned into a fresh arrangement plan every time `run` is
//! called.

use crate::arrangement::{Arrangement, build_plan};
use crate::config::BenchConfig;
use crate::error::BenchError;
use crate::executor::{AbortHandle, Executor, LifecycleObserver};
use crate::registry::{ClassSlot, ErasedClass};
use fxhash::FxHashMap;
use meterbench_core::{
    BenchClass, CycleProbe, Origin, Probe, TimeProbe, build_elements, discover, pin_to_cpu,
};
use meterbench_result::{BenchmarkResult, ResultListener, RunMeta};
use std::any::TypeId;
use std::time::Instant;

/// Top-level coordinator
pub struct Benchmark {
    config: BenchConfig,
    probes: Vec<Box<dyn Probe>>,
    classes: Vec<Box<dyn ErasedClass>>,
    origins: FxHashMap<TypeId, Origin>,
    listeners: Vec<Box<dyn ResultListener>>,
    observer: Option<Box<dyn LifecycleObserver>>,
    abort: AbortHandle,
}

impl Default for Benchmark {
    fn default() -> Self {
        Self::new(BenchConfig::default())
    }
}

impl Benchmark {
    /// Coordinator without probes or classes
    pub fn new(config: BenchConfig) -> Self {
        Self {
            config,
            probes: Vec::new(),
            classes: Vec::new(),
            origins: FxHashMap::default(),
            listeners: Vec::new(),
            observer: None,
            abort: AbortHandle::default(),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Register a probe. Probes are identified by name; registering a name
    /// twice keeps the first probe and returns false.
    pub fn register_probe(&mut self, probe: impl Probe + 'static) -> bool {
        let name = &probe.info().name;
        if self.probes.iter().any(|p| &p.info().name == name) {
            tracing::debug!(probe = %name, "probe already registered");
            return false;
        }
        tracing::debug!(probe = %probe.info(), "registered probe");
        self.probes.push(Box::new(probe));
        true
    }

    /// Register the built-in probes selected in the `[probes]` table
    pub fn register_configured_probes(&mut self) {
        let probes = self.config.probes.clone();
        if probes.time {
            self.register_probe(TimeProbe::new(probes.time_unit));
        }
        if probes.cycles {
            self.register_probe(CycleProbe::new());
        }
    }

    /// Add a class by reference; a fresh instance is constructed for every run.
    ///
    /// Returns false when the class declares no benchmarked method and is
    /// therefore excluded. Adding the same class again is a no-op.
    pub fn add_class<T: BenchClass>(&mut self) -> Result<bool, BenchError> {
        let Some(class) = discover::<T>(Origin::Class)? else {
            return Ok(false);
        };
        let name = class.layout().info.name;

        match self.origins.get(&TypeId::of::<T>()) {
            Some(Origin::Class) => return Ok(true),
            Some(Origin::Object) => return Err(BenchError::AmbiguousRegistration { class: name }),
            None => {}
        }

        tracing::debug!(class = name, benches = class.layout().benches.len(), "added class");
        self.origins.insert(TypeId::of::<T>(), Origin::Class);
        self.classes.push(Box::new(ClassSlot::by_class(class)));
        Ok(true)
    }

    /// Add a live object. The coordinator owns it for its whole lifetime.
    ///
    /// Returns false when the class declares no benchmarked method and is
    /// therefore excluded. Only one object per class can be added, and not
    /// alongside the class itself.
    pub fn add_object<T: BenchClass>(&mut self, object: T) -> Result<bool, BenchError> {
        let Some(class) = discover::<T>(Origin::Object)? else {
            return Ok(false);
        };
        let name = class.layout().info.name;

        if self.origins.contains_key(&TypeId::of::<T>()) {
            return Err(BenchError::AmbiguousRegistration { class: name });
        }

        tracing::debug!(class = name, benches = class.layout().benches.len(), "added object");
        self.origins.insert(TypeId::of::<T>(), Origin::Object);
        self.classes.push(Box::new(ClassSlot::by_object(class, object)));
        Ok(true)
    }

    /// Stream results to `listener` while running
    pub fn add_listener(&mut self, listener: impl ResultListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Watch every lifecycle invocation
    pub fn set_observer(&mut self, observer: impl LifecycleObserver + 'static) {
        self.observer = Some(Box::new(observer));
    }

    /// Handle for stopping a run between steps, from any thread
    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    /// Run with the configured scale and arrangement
    pub fn run(&mut self) -> Result<BenchmarkResult, BenchError> {
        let scale = self.config.runner.run_scale;
        let arrangement = self.config.runner.arrangement();
        self.run_with(scale, arrangement)
    }

    /// Run every added class.
    ///
    /// Hook and benchmark failures end up in the returned tree; only
    /// invalid arguments are reported as errors.
    pub fn run_with(
        &mut self,
        scale: f64,
        arrangement: Arrangement,
    ) -> Result<BenchmarkResult, BenchError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(BenchError::InvalidRunScale(scale));
        }
        let filter = self
            .config
            .runner
            .filter
            .as_deref()
            .map(regex::Regex::new)
            .transpose()?;

        self.abort.reset();
        if let Some(cpu) = self.config.runner.pin_cpu {
            if let Err(e) = pin_to_cpu(cpu) {
                tracing::warn!(cpu, "could not pin thread: {e}");
            }
        }

        let elements = build_elements(
            self.classes.iter().map(|c| c.layout()).enumerate(),
            self.config.runner.default_runs,
        );
        let plan = build_plan(&elements, scale, arrangement, filter.as_ref());
        let arrangement = plan.arrangement();

        tracing::info!(
            classes = self.classes.len(),
            elements = elements.len(),
            steps = plan.len(),
            probes = self.probes.len(),
            %arrangement,
            "starting benchmark run"
        );

        let timestamp = chrono::Utc::now();
        let start = Instant::now();
        let (mut result, summary) = Executor::new(
            &mut self.classes,
            &mut self.probes,
            &mut self.listeners,
            &mut self.observer,
            &self.abort,
        )
        .execute(&elements, plan);
        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

        tracing::info!(
            executed = summary.executed,
            skipped = summary.skipped,
            failures = result.all_failures().count(),
            duration_ms,
            "benchmark run finished"
        );

        result.set_meta(RunMeta {
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp,
            arrangement: arrangement.label().to_string(),
            run_scale: scale,
            seed: arrangement.seed(),
            planned_steps: summary.planned,
            executed_steps: summary.executed,
            duration_ms,
            aborted: summary.aborted,
        });
        Ok(result)
    }
}
