//! Integration tests for Meterbench
//!
//! These tests verify the end-to-end behavior of the benchmarking system:
//! lifecycle call counts, failure isolation, arrangements and the result
//! tree handed to output collaborators.

use meterbench::{
    AbortHandle, Arrangement, BenchClass, BenchConfig, Benchmark, BenchmarkResult, CauseKind,
    ClassResult, CountingProbe, HookResult, MethodId, MethodTable, Probe, ProbeInfo,
    ResultListener, ResultVisitor, Role, RunOutcome, Sample, TimeProbe, compute_statistics,
    generate_json_report,
};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

const RUNS: usize = 5;

type CallLog = Rc<RefCell<Vec<(Role, &'static str)>>>;

/// Record every lifecycle invocation as (role, method name)
fn record_calls(bench: &mut Benchmark) -> CallLog {
    let log = CallLog::default();
    let sink = log.clone();
    bench.set_observer(move |role: Role, method: &MethodId| {
        sink.borrow_mut().push((role, method.name));
    });
    log
}

fn count(log: &CallLog, role: Role) -> usize {
    log.borrow().iter().filter(|(r, _)| *r == role).count()
}

fn bench_order(log: &CallLog) -> Vec<&'static str> {
    log.borrow()
        .iter()
        .filter(|(r, _)| *r == Role::Bench)
        .map(|(_, name)| *name)
        .collect()
}

fn time_bench() -> Benchmark {
    let mut bench = Benchmark::default();
    bench.register_probe(TimeProbe::default());
    bench
}

// ============================================================================
// Fixtures
// ============================================================================

#[derive(Default)]
struct NormalCompleteBench;

impl NormalCompleteBench {
    fn noop(&mut self) -> HookResult {
        Ok(())
    }

    fn bench(&mut self) -> HookResult {
        std::hint::black_box((0..64u64).sum::<u64>());
        Ok(())
    }
}

impl BenchClass for NormalCompleteBench {
    fn describe(t: &mut MethodTable<Self>) {
        t.constructor(Self::default);
        t.default_runs(RUNS);
        t.hook(Role::BeforeBenchClass, "before_class", Self::noop);
        t.hook(Role::BeforeFirstRun, "before_first_run", Self::noop);
        t.hook(Role::BeforeEachRun, "before_each_run", Self::noop);
        t.bench("bench", Self::bench);
        t.hook(Role::AfterEachRun, "after_each_run", Self::noop);
        t.hook(Role::AfterLastRun, "after_last_run", Self::noop);
        t.hook(Role::AfterBenchClass, "after_class", Self::noop);
    }
}

#[derive(Default)]
struct SetupFails;

impl SetupFails {
    fn refuse(&mut self) -> HookResult {
        Err("fixture unavailable".into())
    }

    fn noop(&mut self) -> HookResult {
        Ok(())
    }
}

impl BenchClass for SetupFails {
    fn describe(t: &mut MethodTable<Self>) {
        t.constructor(Self::default);
        t.default_runs(RUNS);
        t.hook(Role::BeforeBenchClass, "connect", Self::refuse);
        t.bench("first", Self::noop);
        t.bench("second", Self::noop);
        t.bench("third", Self::noop);
        t.hook(Role::AfterBenchClass, "disconnect", Self::noop);
    }
}

#[derive(Default)]
struct AlwaysThrows;

impl AlwaysThrows {
    fn fail(&mut self) -> HookResult {
        Err("always".into())
    }

    fn noop(&mut self) -> HookResult {
        Ok(())
    }
}

impl BenchClass for AlwaysThrows {
    fn describe(t: &mut MethodTable<Self>) {
        t.constructor(Self::default);
        t.default_runs(RUNS);
        t.bench("fail", Self::fail);
        t.hook(Role::AfterEachRun, "cleanup", Self::noop);
    }
}

#[derive(Default)]
struct Panics;

impl Panics {
    fn explode(&mut self) -> HookResult {
        let v: Vec<u8> = Vec::new();
        std::hint::black_box(v[3]);
        Ok(())
    }
}

impl BenchClass for Panics {
    fn describe(t: &mut MethodTable<Self>) {
        t.constructor(Self::default);
        t.bench("explode", Self::explode).runs(2);
    }
}

#[derive(Default)]
struct ThreeMethods;

impl ThreeMethods {
    fn noop(&mut self) -> HookResult {
        Ok(())
    }
}

impl BenchClass for ThreeMethods {
    fn describe(t: &mut MethodTable<Self>) {
        t.constructor(Self::default);
        t.default_runs(10);
        t.hook(Role::BeforeFirstRun, "warm", Self::noop);
        t.bench("a", Self::noop);
        t.bench("b", Self::noop);
        t.bench("c", Self::noop);
        t.hook(Role::AfterLastRun, "cool", Self::noop);
    }
}

/// Per-run setup fails on every second call
#[derive(Default)]
struct FlakySetup {
    setups: usize,
}

impl FlakySetup {
    fn setup(&mut self) -> HookResult {
        self.setups += 1;
        if self.setups % 2 == 0 {
            return Err(format!("setup #{} failed", self.setups).into());
        }
        Ok(())
    }

    fn noop(&mut self) -> HookResult {
        Ok(())
    }
}

impl BenchClass for FlakySetup {
    fn describe(t: &mut MethodTable<Self>) {
        t.constructor(Self::default);
        t.hook(Role::BeforeEachRun, "setup", Self::setup);
        t.bench("work", Self::noop).runs(6);
        t.hook(Role::AfterEachRun, "teardown", Self::noop);
    }
}

#[derive(Default)]
struct TeardownFails;

impl TeardownFails {
    fn noop(&mut self) -> HookResult {
        Ok(())
    }

    fn fail(&mut self) -> HookResult {
        Err("teardown".into())
    }
}

impl BenchClass for TeardownFails {
    fn describe(t: &mut MethodTable<Self>) {
        t.constructor(Self::default);
        t.bench("work", Self::noop).runs(RUNS);
        t.hook(Role::AfterEachRun, "teardown", Self::fail);
    }
}

#[derive(Default)]
struct FirstRunFails;

impl FirstRunFails {
    fn noop(&mut self) -> HookResult {
        Ok(())
    }

    fn fail(&mut self) -> HookResult {
        Err("warmup".into())
    }
}

impl BenchClass for FirstRunFails {
    fn describe(t: &mut MethodTable<Self>) {
        t.constructor(Self::default);
        t.hook(Role::BeforeFirstRun, "warmup", Self::fail);
        t.bench("work", Self::noop).runs(RUNS);
        t.hook(Role::AfterLastRun, "report", Self::noop);
    }
}

/// Fails in the given end-of-class hook
#[derive(Default)]
struct LateFailure<const CLASS_TEARDOWN: bool>;

impl<const CLASS_TEARDOWN: bool> LateFailure<CLASS_TEARDOWN> {
    fn noop(&mut self) -> HookResult {
        Ok(())
    }

    fn fail(&mut self) -> HookResult {
        Err("late".into())
    }
}

impl<const CLASS_TEARDOWN: bool> BenchClass for LateFailure<CLASS_TEARDOWN> {
    fn describe(t: &mut MethodTable<Self>) {
        t.constructor(Self::default);
        t.bench("work", Self::noop).runs(RUNS);
        if CLASS_TEARDOWN {
            t.hook(Role::AfterBenchClass, "shutdown", Self::fail);
        } else {
            t.hook(Role::AfterLastRun, "summarize", Self::fail);
        }
    }
}

struct ConstructorPanics;

impl ConstructorPanics {
    fn build() -> Self {
        panic!("fixture file missing")
    }

    fn noop(&mut self) -> HookResult {
        Ok(())
    }
}

impl BenchClass for ConstructorPanics {
    fn describe(t: &mut MethodTable<Self>) {
        t.constructor(Self::build);
        t.bench("work", Self::noop).runs(RUNS);
    }
}

/// Ticks a counter every time a sample streams past
struct TickingListener(meterbench::Counter);

impl ResultListener for TickingListener {
    fn on_sample(&mut self, _method: &MethodId, _probe: &ProbeInfo, _sample: Sample) {
        self.0.add(1000);
    }
}

struct StaticOnly;

fn checksum() -> HookResult {
    let sum = (0..256u32).fold(0u32, |acc, x| acc.wrapping_mul(31).wrapping_add(x));
    std::hint::black_box(sum);
    Ok(())
}

impl BenchClass for StaticOnly {
    fn describe(t: &mut MethodTable<Self>) {
        t.static_method("checksum", checksum).role(Role::Bench).runs(4);
    }
}

#[derive(Default)]
struct Overrides;

impl Overrides {
    fn noop(&mut self) -> HookResult {
        Ok(())
    }
}

impl BenchClass for Overrides {
    fn describe(t: &mut MethodTable<Self>) {
        t.constructor(Self::default);
        t.hook(Role::BeforeEachRun, "reset", Self::noop);
        t.method("prime", Self::noop);
        t.bench("plain", Self::noop).runs(2);
        t.bench("special", Self::noop).runs(3).before_each("prime");
    }
}

/// Reports a missing sample on every second invocation
struct EveryOther {
    info: ProbeInfo,
    calls: u64,
}

impl Probe for EveryOther {
    fn info(&self) -> &ProbeInfo {
        &self.info
    }

    fn start(&mut self) {
        self.calls += 1;
    }

    fn record(&mut self) -> Sample {
        if self.calls % 2 == 0 {
            Sample::Missing
        } else {
            Sample::Value(self.calls as f64)
        }
    }
}

// ============================================================================
// Lifecycle
// ============================================================================

/// Test that every hook fires the expected number of times
#[test]
fn test_normal_complete_bench_call_counts() {
    let mut bench = time_bench();
    let log = record_calls(&mut bench);
    bench.add_class::<NormalCompleteBench>().unwrap();

    let result = bench.run().unwrap();

    assert_eq!(count(&log, Role::BeforeBenchClass), 1);
    assert_eq!(count(&log, Role::BeforeFirstRun), 1);
    assert_eq!(count(&log, Role::BeforeEachRun), RUNS);
    assert_eq!(count(&log, Role::Bench), RUNS);
    assert_eq!(count(&log, Role::AfterEachRun), RUNS);
    assert_eq!(count(&log, Role::AfterLastRun), 1);
    assert_eq!(count(&log, Role::AfterBenchClass), 1);

    assert_eq!(result.all_failures().count(), 0);
    assert_eq!(result.outcome(), RunOutcome::Completed);
}

/// Test that the lifecycle runs in strict order
#[test]
fn test_lifecycle_order() {
    let mut bench = time_bench();
    let log = record_calls(&mut bench);
    bench.add_class::<NormalCompleteBench>().unwrap();
    bench.run_with(0.4, Arrangement::NoArrangement).unwrap();

    let roles: Vec<Role> = log.borrow().iter().map(|(r, _)| *r).collect();
    assert_eq!(
        roles,
        vec![
            Role::BeforeBenchClass,
            Role::BeforeFirstRun,
            Role::BeforeEachRun,
            Role::Bench,
            Role::AfterEachRun,
            Role::BeforeEachRun,
            Role::Bench,
            Role::AfterEachRun,
            Role::AfterLastRun,
            Role::AfterBenchClass,
        ]
    );
}

/// Test that an added object goes through the same lifecycle
#[test]
fn test_add_object() {
    let mut bench = time_bench();
    let log = record_calls(&mut bench);
    bench.add_object(NormalCompleteBench).unwrap();

    let result = bench.run().unwrap();

    assert_eq!(count(&log, Role::BeforeBenchClass), 1);
    assert_eq!(count(&log, Role::Bench), RUNS);
    assert_eq!(count(&log, Role::AfterBenchClass), 1);
    assert_eq!(result.aggregate("time").raw_count(), RUNS);
}

/// Test that N methods run R times give N×R samples per probe
#[test]
fn test_samples_per_probe() {
    let mut bench = time_bench();
    let (ticks, _counter) = CountingProbe::new("ticks");
    bench.register_probe(ticks);
    let log = record_calls(&mut bench);
    bench.add_class::<ThreeMethods>().unwrap();

    let result = bench.run().unwrap();

    assert_eq!(result.registered_probes().len(), 2);
    assert_eq!(result.aggregate("time").count(), 3 * 10);
    assert_eq!(result.aggregate("ticks").count(), 3 * 10);
    assert_eq!(result.aggregate("ticks").sum(), 0.0);
    for name in ["a", "b", "c"] {
        let method = result.class_named("ThreeMethods").unwrap().method(name).unwrap();
        assert_eq!(method.samples("time").len(), 10);
    }

    assert_eq!(count(&log, Role::BeforeFirstRun), 1);
    assert_eq!(count(&log, Role::AfterLastRun), 1);
}

/// Test that a class made only of free functions needs no constructor
#[test]
fn test_static_only_class() {
    let mut bench = time_bench();
    assert!(bench.add_class::<StaticOnly>().unwrap());

    let result = bench.run().unwrap();
    assert_eq!(result.aggregate("time").count(), 4);
}

/// Test that per-benchmark hook overrides replace the class-wide hook
#[test]
fn test_per_bench_hook_override() {
    let mut bench = time_bench();
    let log = record_calls(&mut bench);
    bench.add_class::<Overrides>().unwrap();
    bench.run().unwrap();

    let setups: Vec<&str> = log
        .borrow()
        .iter()
        .filter(|(r, _)| *r == Role::BeforeEachRun)
        .map(|(_, name)| *name)
        .collect();
    assert_eq!(setups, vec!["reset", "reset", "prime", "prime", "prime"]);
}

// ============================================================================
// Failure isolation
// ============================================================================

/// Test that a failing class setup disables the whole class
#[test]
fn test_class_setup_failure() {
    let mut bench = time_bench();
    let log = record_calls(&mut bench);
    bench.add_class::<SetupFails>().unwrap();

    let result = bench.run().unwrap();

    assert!(result.registered_probes().is_empty());
    assert!(result.classes().is_empty());
    assert_eq!(result.failures().len(), 1);
    assert_eq!(result.all_failures().count(), 1);
    assert_eq!(result.failures()[0].role, Role::BeforeBenchClass);
    assert_eq!(result.failures()[0].method.name, "connect");
    assert_eq!(result.outcome(), RunOutcome::NoClassSucceeded);

    assert_eq!(count(&log, Role::Bench), 0);
    assert_eq!(count(&log, Role::AfterBenchClass), 0);
    let meta = result.meta().unwrap();
    assert_eq!(meta.planned_steps, 3 * RUNS);
    assert_eq!(meta.executed_steps, 0);
}

/// Test that a failing class does not affect the others
#[test]
fn test_failing_class_isolated_from_others() {
    let mut bench = time_bench();
    bench.add_class::<SetupFails>().unwrap();
    bench.add_class::<NormalCompleteBench>().unwrap();

    let result = bench.run_with(1.0, Arrangement::SequentialMethod).unwrap();

    assert_eq!(result.outcome(), RunOutcome::Completed);
    assert_eq!(result.classes().len(), 1);
    assert_eq!(result.aggregate("time").count(), RUNS);
    assert_eq!(result.failures().len(), 1);
}

/// Test that a method failing every time yields no samples and R failures
#[test]
fn test_always_throwing_method() {
    let mut bench = time_bench();
    let log = record_calls(&mut bench);
    bench.add_class::<AlwaysThrows>().unwrap();

    let result = bench.run().unwrap();
    let method = result.class_named("AlwaysThrows").unwrap().method("fail").unwrap();

    assert!(method.samples("time").is_empty());
    assert_eq!(method.failures().len(), RUNS);
    assert!(method.failures().iter().all(|f| f.role == Role::Bench));
    assert!(method.failures().iter().all(|f| f.cause.kind == CauseKind::Error));
    assert_eq!(result.registered_probes().len(), 1);

    // per-run teardown still runs after a failed invocation
    assert_eq!(count(&log, Role::AfterEachRun), RUNS);
}

/// Test that panics are caught and recorded like errors
#[test]
fn test_panicking_method() {
    let mut bench = time_bench();
    bench.add_class::<Panics>().unwrap();

    let result = bench.run().unwrap();
    let failures: Vec<_> = result.all_failures().collect();

    assert_eq!(failures.len(), 2);
    assert!(failures.iter().all(|f| f.cause.kind == CauseKind::Panic));
    assert!(failures[0].cause.message.contains("index out of bounds"));
}

/// Test that a failed per-run setup skips its run and the next run retries
#[test]
fn test_per_run_setup_failure() {
    let mut bench = time_bench();
    let log = record_calls(&mut bench);
    bench.add_class::<FlakySetup>().unwrap();

    let result = bench.run().unwrap();
    let class = result.class_named("FlakySetup").unwrap();

    assert_eq!(count(&log, Role::BeforeEachRun), 6);
    assert_eq!(count(&log, Role::Bench), 3);
    assert_eq!(count(&log, Role::AfterEachRun), 3);
    assert_eq!(class.failures().len(), 3);
    assert!(class.failures().iter().all(|f| f.role == Role::BeforeEachRun));
    assert_eq!(class.method("work").unwrap().samples("time").len(), 3);
}

/// Test that a failed first-run setup only costs the first run
#[test]
fn test_first_run_setup_failure() {
    let mut bench = time_bench();
    let log = record_calls(&mut bench);
    bench.add_class::<FirstRunFails>().unwrap();

    let result = bench.run().unwrap();
    let class = result.class_named("FirstRunFails").unwrap();

    assert_eq!(class.failures().len(), 1);
    assert_eq!(class.failures()[0].role, Role::BeforeFirstRun);
    assert_eq!(count(&log, Role::Bench), RUNS - 1);
    assert_eq!(count(&log, Role::AfterLastRun), 1);
    assert_eq!(result.aggregate("time").count(), RUNS - 1);
}

/// Test that a failing last-run teardown is kept on the class with its samples
#[test]
fn test_last_run_teardown_failure() {
    let mut bench = time_bench();
    let log = record_calls(&mut bench);
    bench.add_class::<LateFailure<false>>().unwrap();

    let result = bench.run().unwrap();
    let class = result.class_named("LateFailure").unwrap();

    assert_eq!(class.failures().len(), 1);
    assert_eq!(class.failures()[0].role, Role::AfterLastRun);
    assert_eq!(class.failures()[0].method.name, "summarize");
    assert!(result.failures().is_empty());
    assert_eq!(class.method("work").unwrap().samples("time").len(), RUNS);
    assert_eq!(count(&log, Role::AfterLastRun), 1);
}

/// Test that a failing class teardown lands at the root and keeps the class
#[test]
fn test_class_teardown_failure() {
    let mut bench = time_bench();
    bench.add_class::<LateFailure<true>>().unwrap();

    let result = bench.run().unwrap();

    assert_eq!(result.failures().len(), 1);
    assert_eq!(result.failures()[0].role, Role::AfterBenchClass);
    assert_eq!(result.all_failures().count(), 1);
    assert_eq!(result.classes().len(), 1);
    assert_eq!(result.aggregate("time").count(), RUNS);
    assert_eq!(result.outcome(), RunOutcome::Completed);
}

/// Test that a panicking constructor disables the class like a failed setup
#[test]
fn test_constructor_panic() {
    let mut bench = time_bench();
    let log = record_calls(&mut bench);
    bench.add_class::<ConstructorPanics>().unwrap();

    let result = bench.run().unwrap();

    assert_eq!(result.failures().len(), 1);
    let failure = &result.failures()[0];
    assert_eq!(failure.role, Role::BeforeBenchClass);
    assert_eq!(failure.method.name, "<constructor>");
    assert_eq!(failure.cause.kind, CauseKind::Panic);
    assert_eq!(failure.cause.message, "fixture file missing");

    assert!(result.registered_probes().is_empty());
    assert!(result.classes().is_empty());
    assert_eq!(result.outcome(), RunOutcome::NoClassSucceeded);
    assert_eq!(count(&log, Role::Bench), 0);
}

/// Test that every probe is read before listeners see a sample
#[test]
fn test_listener_work_not_measured() {
    let mut bench = Benchmark::default();
    let (first, _) = CountingProbe::new("first");
    let (second, counter) = CountingProbe::new("second");
    bench.register_probe(first);
    bench.register_probe(second);
    bench.add_listener(TickingListener(counter.clone()));
    bench.add_class::<StaticOnly>().unwrap();

    let result = bench.run_with(0.75, Arrangement::NoArrangement).unwrap();

    assert_eq!(result.aggregate("second").count(), 3);
    assert_eq!(result.aggregate("second").sum(), 0.0);
    assert_eq!(counter.value(), 2 * 3 * 1000);
}

/// Test that teardown failures keep the samples of their run
#[test]
fn test_teardown_failure_keeps_samples() {
    let mut bench = time_bench();
    bench.add_class::<TeardownFails>().unwrap();

    let result = bench.run().unwrap();
    let class = result.class_named("TeardownFails").unwrap();

    assert_eq!(class.method("work").unwrap().samples("time").len(), RUNS);
    assert_eq!(class.failures().len(), RUNS);
    assert!(class.failures().iter().all(|f| f.role == Role::AfterEachRun));
}

// ============================================================================
// Arrangement and control
// ============================================================================

/// Test that a fixed seed reproduces the execution order
#[test]
fn test_random_arrangement_reproducible() {
    let mut bench = time_bench();
    let log = record_calls(&mut bench);
    bench.add_class::<ThreeMethods>().unwrap();

    let seeded = Arrangement::Random { seed: Some(42) };
    bench.run_with(1.0, seeded).unwrap();
    let first = bench_order(&log);
    log.borrow_mut().clear();

    let result = bench.run_with(1.0, seeded).unwrap();
    let second = bench_order(&log);
    log.borrow_mut().clear();

    bench.run_with(1.0, Arrangement::Random { seed: Some(4242) }).unwrap();
    let other = bench_order(&log);

    assert_eq!(first, second);
    assert_ne!(first, other);
    assert_eq!(result.meta().unwrap().seed, Some(42));

    let mut sorted_first = first.clone();
    let mut sorted_other = other.clone();
    sorted_first.sort();
    sorted_other.sort();
    assert_eq!(sorted_first, sorted_other);
    assert_eq!(sorted_first.len(), 30);
}

/// Test that a random arrangement without seed records the drawn one
#[test]
fn test_random_seed_recorded() {
    let mut bench = time_bench();
    bench.add_class::<ThreeMethods>().unwrap();

    let result = bench.run_with(0.5, Arrangement::Random { seed: None }).unwrap();
    let meta = result.meta().unwrap();

    assert_eq!(meta.arrangement, "random");
    assert!(meta.seed.is_some());
    assert_eq!(meta.planned_steps, 15);
}

/// Test that the sequential arrangement interleaves runs
#[test]
fn test_sequential_arrangement() {
    let mut bench = time_bench();
    let log = record_calls(&mut bench);
    bench.add_class::<ThreeMethods>().unwrap();
    bench.run_with(0.2, Arrangement::SequentialMethod).unwrap();

    assert_eq!(bench_order(&log), vec!["a", "b", "c", "a", "b", "c"]);
}

/// Test that an abort stops between steps and still tears down
#[test]
fn test_abort_between_steps() {
    let mut bench = time_bench();
    let abort: AbortHandle = bench.abort_handle();
    let log = CallLog::default();
    let sink = log.clone();
    bench.set_observer(move |role: Role, method: &MethodId| {
        sink.borrow_mut().push((role, method.name));
        let benches = sink.borrow().iter().filter(|(r, _)| *r == Role::Bench).count();
        if benches == 3 {
            abort.abort();
        }
    });
    bench.add_class::<NormalCompleteBench>().unwrap();

    let result = bench.run().unwrap();
    let meta = result.meta().unwrap();

    assert!(meta.aborted);
    assert_eq!(meta.executed_steps, 3);
    assert_eq!(result.aggregate("time").count(), 3);
    assert_eq!(count(&log, Role::AfterLastRun), 1);
    assert_eq!(count(&log, Role::AfterBenchClass), 1);
}

/// Test that the element filter from the configuration narrows the plan
#[test]
fn test_config_filter() {
    let mut config = BenchConfig::default();
    config.runner.filter = Some("#(a|c)$".to_string());
    let mut bench = Benchmark::new(config);
    bench.register_probe(TimeProbe::default());
    bench.add_class::<ThreeMethods>().unwrap();

    let result = bench.run().unwrap();
    let class = result.class_named("ThreeMethods").unwrap();

    assert!(class.method("b").is_none());
    assert_eq!(result.aggregate("time").count(), 20);
}

// ============================================================================
// Result tree
// ============================================================================

/// Test the outcome distinction between empty and failed submissions
#[test]
fn test_outcomes() {
    let result = time_bench().run().unwrap();
    assert_eq!(result.outcome(), RunOutcome::NothingSubmitted);
    assert_eq!(result.all_failures().count(), 0);
    assert!(result.registered_probes().is_empty());
}

/// Test that missing samples are stored but not aggregated
#[test]
fn test_missing_samples() {
    let mut bench = Benchmark::default();
    bench.register_probe(EveryOther {
        info: ProbeInfo::new("odd", "n", "call number"),
        calls: 0,
    });
    bench.add_class::<TeardownFails>().unwrap();

    let result = bench.run().unwrap();
    let samples = result
        .class_named("TeardownFails")
        .unwrap()
        .method("work")
        .unwrap()
        .samples("odd")
        .to_vec();

    assert_eq!(samples.len(), RUNS);
    assert_eq!(samples[1], Sample::Missing);

    let agg = result.aggregate("odd");
    assert_eq!(agg.raw_count(), 5);
    assert_eq!(agg.count(), 3);
    assert_eq!(agg.sum(), 1.0 + 3.0 + 5.0);
    assert_eq!(agg.min(), 1.0);
    assert_eq!(agg.max(), 5.0);
}

/// Test that merging two runs equals aggregating both at once
#[test]
fn test_merge_two_runs() {
    let mut bench = time_bench();
    bench.add_class::<ThreeMethods>().unwrap();

    let mut first = bench.run().unwrap();
    let second = bench.run().unwrap();
    let expected_sum = first.aggregate("time").sum() + second.aggregate("time").sum();

    first.merge(second);
    let merged = first.aggregate("time");

    assert_eq!(merged.count(), 60);
    assert!((merged.sum() - expected_sum).abs() <= expected_sum * 1e-12);
}

#[derive(Default)]
struct Flattened(BTreeMap<(String, String), Vec<Sample>>, Vec<Role>);

impl Flattened {
    fn sample(&mut self, method: &MethodId, probe: &ProbeInfo, sample: Sample) {
        self.0
            .entry((method.to_string(), probe.name.clone()))
            .or_default()
            .push(sample);
    }
}

impl ResultVisitor for Flattened {
    fn visit_sample(&mut self, method: &MethodId, probe: &ProbeInfo, sample: Sample) {
        self.sample(method, probe, sample);
    }

    fn visit_failure(&mut self, failure: &meterbench::FailureRecord) {
        self.1.push(failure.role);
    }
}

#[derive(Clone, Default)]
struct Streamed(Rc<RefCell<Flattened>>);

impl ResultListener for Streamed {
    fn on_sample(&mut self, method: &MethodId, probe: &ProbeInfo, sample: Sample) {
        self.0.borrow_mut().sample(method, probe, sample);
    }

    fn on_failure(&mut self, failure: &meterbench::FailureRecord) {
        self.0.borrow_mut().1.push(failure.role);
    }
}

/// Test that streaming listeners and tree visitors see the same data
#[test]
fn test_listener_matches_visitor() {
    let mut bench = time_bench();
    bench.register_probe(CountingProbe::new("ticks").0);
    let streamed = Streamed::default();
    bench.add_listener(streamed.clone());
    bench.add_class::<ThreeMethods>().unwrap();
    bench.add_class::<AlwaysThrows>().unwrap();

    let result = bench.run_with(1.0, Arrangement::Random { seed: Some(1) }).unwrap();

    let mut visited = Flattened::default();
    result.walk(&mut visited);

    let streamed = streamed.0.borrow();
    assert_eq!(visited.0, streamed.0);
    assert_eq!(visited.1.len(), RUNS);
    assert_eq!(streamed.1.len(), RUNS);
    assert_eq!(visited.0.len(), 3 * 2);
}

/// Test that visiting reaches every class and method
#[test]
fn test_visitor_structure() {
    #[derive(Default)]
    struct Names(Vec<String>);

    impl ResultVisitor for Names {
        fn visit_class(&mut self, class: &ClassResult) {
            self.0.push(class.name().to_string());
        }

        fn visit_method(&mut self, method: &meterbench::MethodResult) {
            self.0.push(format!("  {}", method.name()));
        }
    }

    let mut bench = time_bench();
    bench.add_class::<ThreeMethods>().unwrap();
    bench.add_class::<StaticOnly>().unwrap();
    let result: BenchmarkResult = bench.run().unwrap();

    let mut names = Names::default();
    result.walk(&mut names);
    assert_eq!(
        names.0,
        vec!["ThreeMethods", "  a", "  b", "  c", "StaticOnly", "  checksum"]
    );
}

/// Test statistics over a finished run
#[test]
fn test_compute_statistics() {
    let mut bench = time_bench();
    bench.add_class::<ThreeMethods>().unwrap();
    bench.add_class::<AlwaysThrows>().unwrap();

    let result = bench.run().unwrap();
    let stats = compute_statistics(&result);

    assert_eq!(stats.len(), 3);
    for s in &stats {
        assert_eq!(s.summary.result_count, 10);
        assert!(s.summary.min <= s.summary.mean && s.summary.mean <= s.summary.max);
        assert!(s.summary.conf95.lower <= s.summary.conf95.upper);
    }
}

/// Test the JSON shape handed to output collaborators
#[test]
fn test_json_report() {
    let mut bench = time_bench();
    bench.add_class::<SetupFails>().unwrap();
    bench.add_class::<AlwaysThrows>().unwrap();

    let result = bench.run().unwrap();
    let json = generate_json_report(&result).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["meta"]["arrangement"], "none");
    assert_eq!(value["failures"][0]["role"], "BeforeBenchClass");
    assert_eq!(value["failures"][0]["cause"]["kind"], "error");
    assert_eq!(value["failures"][0]["cause"]["message"], "fixture unavailable");
    assert_eq!(value["classes"][0]["class"]["name"], "AlwaysThrows");
    assert_eq!(
        value["classes"][0]["methods"][0]["failures"].as_array().map(Vec::len),
        Some(RUNS)
    );
}
