//! Lifecycle & Failure Isolation Demo
//!
//! Two benchmark classes run side by side under a seeded random arrangement.
//! `Collections` goes through the full lifecycle; `Flaky` fails in its
//! per-run setup every third run and panics in one benchmark, which is
//! recorded in the result tree without stopping the run.
//!
//! Run with:
//!   cargo run --example demo -p meterbench --release
//!   RUST_LOG=meterbench=debug cargo run --example demo -p meterbench   # every sample and hook
//!
//! A `meterbench.toml` found in the current directory or above is honored.

use meterbench::prelude::*;
use meterbench::{CountingProbe, Counter, TracingListener, compute_statistics, init_logging};
use std::collections::{BTreeMap, HashMap};
use std::hint::black_box;

// ---------------------------------------------------------------------------
// A well-behaved class using every lifecycle role
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Collections {
    keys: Vec<u64>,
    hash: HashMap<u64, u64>,
    tree: BTreeMap<u64, u64>,
}

impl Collections {
    fn generate(&mut self) -> HookResult {
        self.keys = (0..2_000u64).map(|i| i.wrapping_mul(0x9E37_79B9) % 10_007).collect();
        Ok(())
    }

    fn clear(&mut self) -> HookResult {
        self.hash.clear();
        self.tree.clear();
        Ok(())
    }

    fn hash_insert(&mut self) -> HookResult {
        for &k in &self.keys {
            self.hash.insert(k, k);
        }
        black_box(self.hash.len());
        Ok(())
    }

    fn btree_insert(&mut self) -> HookResult {
        for &k in &self.keys {
            self.tree.insert(k, k);
        }
        black_box(self.tree.len());
        Ok(())
    }

    fn release(&mut self) -> HookResult {
        self.keys = Vec::new();
        Ok(())
    }
}

impl BenchClass for Collections {
    fn describe(t: &mut MethodTable<Self>) {
        t.constructor(Self::default);
        t.default_runs(200);
        t.hook(Role::BeforeFirstRun, "generate", Self::generate);
        t.hook(Role::BeforeEachRun, "clear", Self::clear);
        t.bench("hash_insert", Self::hash_insert);
        t.bench("btree_insert", Self::btree_insert);
        t.hook(Role::AfterLastRun, "release", Self::release);
    }
}

// ---------------------------------------------------------------------------
// A class that misbehaves; its failures stay local
// ---------------------------------------------------------------------------

struct Flaky {
    runs: u32,
    counter: Counter,
}

impl Flaky {
    fn setup(&mut self) -> HookResult {
        self.runs += 1;
        if self.runs % 3 == 0 {
            return Err(format!("setup refused on run {}", self.runs).into());
        }
        Ok(())
    }

    fn count_primes(&mut self) -> HookResult {
        for n in 2..500u32 {
            if (2..n).take_while(|d| d * d <= n).all(|d| n % d != 0) {
                self.counter.tick();
            }
        }
        Ok(())
    }

    fn explode(&mut self) -> HookResult {
        if self.runs > 10 {
            panic!("intentional panic after {} runs", self.runs);
        }
        black_box(self.runs);
        Ok(())
    }
}

impl BenchClass for Flaky {
    fn describe(t: &mut MethodTable<Self>) {
        t.default_runs(30);
        t.hook(Role::BeforeEachRun, "setup", Self::setup);
        t.bench("count_primes", Self::count_primes);
        t.bench("explode", Self::explode);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = BenchConfig::discover().unwrap_or_default();
    if config.runner.seed.is_none() {
        config.runner.arrangement = meterbench::ArrangementKind::Random;
        config.runner.seed = Some(0x5EED);
    }
    init_logging(config.log.verbose);

    let mut bench = Benchmark::new(config);
    bench.register_configured_probes();
    let (primes, counter) = CountingProbe::new("primes");
    bench.register_probe(primes);
    bench.add_listener(TracingListener);

    bench.add_class::<Collections>()?;
    bench.add_object(Flaky { runs: 0, counter })?;

    let result = bench.run()?;

    println!("outcome: {:?}", result.outcome());
    if let Some(meta) = result.meta() {
        println!(
            "arrangement: {} (seed {:?}), {}/{} steps in {:.1} ms",
            meta.arrangement, meta.seed, meta.executed_steps, meta.planned_steps, meta.duration_ms
        );
    }

    println!();
    println!(
        "{:<28} {:<8} {:>6} {:>14} {:>14} {:>14}",
        "method", "probe", "n", "mean", "median", "p99"
    );
    for stats in compute_statistics(&result) {
        println!(
            "{:<28} {:<8} {:>6} {:>14.2} {:>14.2} {:>14.2}",
            stats.method.to_string(),
            stats.probe.name,
            stats.summary.result_count,
            stats.summary.mean,
            stats.summary.median,
            stats.percentiles.p99,
        );
    }

    let failures: Vec<_> = result.all_failures().collect();
    if !failures.is_empty() {
        println!();
        println!("{} isolated failures:", failures.len());
        for failure in failures.iter().take(5) {
            println!("  {failure}");
        }
    }

    Ok(())
}
