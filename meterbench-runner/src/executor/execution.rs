//! Benchmark Execution
//!
//! Drives the per-class lifecycle over an arrangement plan:
//!
//! ```text
//! ClassSetup → FirstRunSetup → [PerRunSetup → Invoke → PerRunTeardown]×N → LastRunTeardown → ClassTeardown
//! ```
//!
//! A class is opened lazily at its first planned step and closed right after
//! its last one, so interleaving arrangements keep several classes open at
//! once. Every declared method runs under `catch_unwind`; errors and panics
//! become failure records and never stop the run.
//!
//! ## Failure isolation
//!
//! - class setup: class disabled, no probes registered, failure at the root
//! - first-run or per-run setup: this run's invocation and per-run teardown
//!   are skipped, later runs try again
//! - invocation: no samples for this run, per-run teardown still runs
//! - teardowns: recorded, earlier samples are kept

use super::control::{AbortHandle, LifecycleObserver};
use crate::arrangement::ArrangementPlan;
use crate::registry::ErasedClass;
use meterbench_core::{
    BenchmarkElement, FailureRecord, MethodId, Probe, ProbeInfo, Role, Sample, guarded,
};
use meterbench_result::{BenchmarkResult, ResultListener};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Pending,
    Open,
    Disabled,
    Closed,
}

#[derive(Debug, Clone, Copy)]
struct ClassRun {
    phase: Phase,
    remaining: usize,
}

/// What the engine did with a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionSummary {
    /// Steps in the plan
    pub planned: usize,
    /// Steps that reached a live class
    pub executed: usize,
    /// Steps dropped because their class failed setup
    pub skipped: usize,
    /// The run stopped early on request
    pub aborted: bool,
}

/// Single-threaded lifecycle engine for one run
pub(crate) struct Executor<'a> {
    classes: &'a mut [Box<dyn ErasedClass>],
    probes: &'a mut [Box<dyn Probe>],
    listeners: &'a mut [Box<dyn ResultListener>],
    observer: &'a mut Option<Box<dyn LifecycleObserver>>,
    abort: &'a AbortHandle,
    probe_infos: Vec<ProbeInfo>,
    runs: Vec<ClassRun>,
    result: BenchmarkResult,
}

impl<'a> Executor<'a> {
    pub(crate) fn new(
        classes: &'a mut [Box<dyn ErasedClass>],
        probes: &'a mut [Box<dyn Probe>],
        listeners: &'a mut [Box<dyn ResultListener>],
        observer: &'a mut Option<Box<dyn LifecycleObserver>>,
        abort: &'a AbortHandle,
    ) -> Self {
        let probe_infos = probes.iter().map(|p| p.info().clone()).collect();
        let runs = vec![
            ClassRun {
                phase: Phase::Pending,
                remaining: 0,
            };
            classes.len()
        ];

        Self {
            classes,
            probes,
            listeners,
            observer,
            abort,
            probe_infos,
            runs,
            result: BenchmarkResult::new(),
        }
    }

    /// Execute every step of `plan` over `elements`
    pub(crate) fn execute(
        mut self,
        elements: &[BenchmarkElement],
        plan: ArrangementPlan,
    ) -> (BenchmarkResult, ExecutionSummary) {
        for step in plan.steps() {
            self.runs[elements[step.element.0].slot].remaining += 1;
        }

        let mut summary = ExecutionSummary {
            planned: plan.len(),
            executed: 0,
            skipped: 0,
            aborted: false,
        };

        for step in plan {
            if self.abort.is_aborted() {
                tracing::info!(
                    executed = summary.executed,
                    planned = summary.planned,
                    "abort requested, stopping"
                );
                summary.aborted = true;
                break;
            }

            let element = &elements[step.element.0];
            let slot = element.slot;

            let mut ready = true;
            if self.runs[slot].phase == Phase::Pending {
                ready = self.open_class(slot);
            }
            if self.runs[slot].phase != Phase::Open {
                summary.skipped += 1;
                continue;
            }

            tracing::trace!(method = %element.method, run = step.run, "step");
            if ready {
                self.run_once(element);
            }
            summary.executed += 1;

            self.runs[slot].remaining -= 1;
            if self.runs[slot].remaining == 0 {
                self.close_class(slot);
            }
        }

        for slot in 0..self.runs.len() {
            if self.runs[slot].phase == Phase::Open {
                self.close_class(slot);
            }
        }

        (self.result, summary)
    }

    /// ClassSetup and FirstRunSetup. Returns false when the first run must
    /// be skipped.
    fn open_class(&mut self, slot: usize) -> bool {
        let layout = self.classes[slot].layout();
        let info = layout.info;
        let hooks = layout.hooks;
        tracing::debug!(class = info.name, "class setup");

        let classes = &mut *self.classes;
        if let Err(cause) = guarded(|| classes[slot].open()) {
            self.fail(FailureRecord::new(Role::BeforeBenchClass, info.constructor(), cause));
            self.runs[slot].phase = Phase::Disabled;
            return false;
        }

        if let Some(hook) = hooks.before_bench_class {
            if !self.call(slot, Role::BeforeBenchClass, hook) {
                tracing::warn!(class = info.name, "class setup failed, class disabled");
                self.classes[slot].release();
                self.runs[slot].phase = Phase::Disabled;
                return false;
            }
        }

        self.result.register_class(&info, &self.probe_infos);
        self.runs[slot].phase = Phase::Open;

        match hooks.before_first_run {
            Some(hook) => self.call(slot, Role::BeforeFirstRun, hook),
            None => true,
        }
    }

    /// LastRunTeardown and ClassTeardown
    fn close_class(&mut self, slot: usize) {
        let hooks = self.classes[slot].layout().hooks;
        tracing::debug!(class = self.classes[slot].layout().info.name, "class teardown");

        if let Some(hook) = hooks.after_last_run {
            self.call(slot, Role::AfterLastRun, hook);
        }
        if let Some(hook) = hooks.after_bench_class {
            self.call(slot, Role::AfterBenchClass, hook);
        }

        self.classes[slot].release();
        self.runs[slot].phase = Phase::Closed;
    }

    /// PerRunSetup → Invoke → PerRunTeardown
    fn run_once(&mut self, element: &BenchmarkElement) {
        let slot = element.slot;

        if let Some(hook) = element.hooks.before_each_run {
            if !self.call(slot, Role::BeforeEachRun, hook) {
                return;
            }
        }

        self.notify(Role::Bench, &element.method);
        let classes = &mut *self.classes;
        let probes = &mut *self.probes;
        let method = element.method;

        for probe in probes.iter_mut() {
            probe.start();
        }
        let outcome = guarded(|| classes[slot].call(&method));

        match outcome {
            Ok(()) => {
                // every probe is read before any sample leaves the engine
                let samples: Vec<Sample> = probes.iter_mut().map(|p| p.record()).collect();
                for (probe, sample) in probes.iter().zip(samples) {
                    let info = probe.info();
                    for listener in self.listeners.iter_mut() {
                        listener.on_sample(&method, info, sample);
                    }
                    self.result.add_data(&method, info, sample);
                }
            }
            Err(cause) => self.fail(FailureRecord::new(Role::Bench, method, cause)),
        }

        if let Some(hook) = element.hooks.after_each_run {
            self.call(slot, Role::AfterEachRun, hook);
        }
    }

    /// Invoke a hook; on failure record it and return false
    fn call(&mut self, slot: usize, role: Role, method: MethodId) -> bool {
        self.notify(role, &method);
        tracing::debug!(%method, %role, "invoke");

        let classes = &mut *self.classes;
        match guarded(|| classes[slot].call(&method)) {
            Ok(()) => true,
            Err(cause) => {
                self.fail(FailureRecord::new(role, method, cause));
                false
            }
        }
    }

    fn notify(&mut self, role: Role, method: &MethodId) {
        if let Some(observer) = self.observer.as_mut() {
            observer.on_hook(role, method);
        }
    }

    fn fail(&mut self, failure: FailureRecord) {
        tracing::warn!(%failure, "isolated failure");
        for listener in self.listeners.iter_mut() {
            listener.on_failure(&failure);
        }
        self.result.add_failure(failure);
    }
}
