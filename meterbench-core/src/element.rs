//! Benchmark Element Model
//!
//! Generic-free description of validated classes and of the benchmarked
//! methods they contribute. Elements are cheap to rebuild and are rebuilt for
//! every run, so no measurement state survives between runs.

use crate::role::Role;
use serde::Serialize;
use std::any::TypeId;

/// Identity of a benchmark class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ClassInfo {
    /// Display name
    pub name: &'static str,
    /// Type identity; not serialized
    #[serde(skip)]
    pub type_id: TypeId,
}

impl ClassInfo {
    /// Stand-in method id for the class constructor, used in failure
    /// records when building an instance fails
    pub fn constructor(self) -> MethodId {
        MethodId {
            class: self,
            name: "<constructor>",
            index: usize::MAX,
        }
    }
}

impl std::fmt::Display for ClassInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

/// Identity of a declared method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MethodId {
    /// Declaring class
    pub class: ClassInfo,
    /// Declared name
    pub name: &'static str,
    /// Position in the class's method table
    #[serde(skip)]
    pub index: usize,
}

impl std::fmt::Display for MethodId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.class.name, self.name)
    }
}

/// How a class entered the coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Origin {
    /// By type; instances are constructed per run
    Class,
    /// As a live instance owned by the caller's registration
    Object,
}

/// At most one method per lifecycle hook role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HookSet {
    /// Class setup
    pub before_bench_class: Option<MethodId>,
    /// Setup before the first measured run
    pub before_first_run: Option<MethodId>,
    /// Setup before every measured run
    pub before_each_run: Option<MethodId>,
    /// Teardown after every measured run
    pub after_each_run: Option<MethodId>,
    /// Teardown after the last measured run
    pub after_last_run: Option<MethodId>,
    /// Class teardown
    pub after_bench_class: Option<MethodId>,
}

impl HookSet {
    /// Hook for `role`; always `None` for [`Role::Bench`]
    pub fn get(&self, role: Role) -> Option<&MethodId> {
        match role {
            Role::BeforeBenchClass => self.before_bench_class.as_ref(),
            Role::BeforeFirstRun => self.before_first_run.as_ref(),
            Role::BeforeEachRun => self.before_each_run.as_ref(),
            Role::AfterEachRun => self.after_each_run.as_ref(),
            Role::AfterLastRun => self.after_last_run.as_ref(),
            Role::AfterBenchClass => self.after_bench_class.as_ref(),
            Role::Bench => None,
        }
    }

    pub(crate) fn slot_mut(&mut self, role: Role) -> Option<&mut Option<MethodId>> {
        match role {
            Role::BeforeBenchClass => Some(&mut self.before_bench_class),
            Role::BeforeFirstRun => Some(&mut self.before_first_run),
            Role::BeforeEachRun => Some(&mut self.before_each_run),
            Role::AfterEachRun => Some(&mut self.after_each_run),
            Role::AfterLastRun => Some(&mut self.after_last_run),
            Role::AfterBenchClass => Some(&mut self.after_bench_class),
            Role::Bench => None,
        }
    }
}

/// A benchmarked method as declared, with its resolved overrides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchDecl {
    /// The benchmarked method
    pub method: MethodId,
    /// Own run count, if declared
    pub runs: Option<usize>,
    /// Per-run setup replacing the class-wide one
    pub before_each_run: Option<MethodId>,
    /// Per-run teardown replacing the class-wide one
    pub after_each_run: Option<MethodId>,
}

/// Validated shape of one class. Built once at registration and cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassLayout {
    /// Class identity
    pub info: ClassInfo,
    /// How the class was added
    pub origin: Origin,
    /// Run count for benchmarks without their own
    pub default_runs: Option<usize>,
    /// Class-wide hooks
    pub hooks: HookSet,
    /// Benchmarked methods in declaration order; never empty
    pub benches: Vec<BenchDecl>,
}

/// Position of an element in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub usize);

/// One benchmarkable method ready for arrangement and execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkElement {
    /// Declaration-order position
    pub id: ElementId,
    /// Index of the owning class in the coordinator
    pub slot: usize,
    /// The benchmarked method
    pub method: MethodId,
    /// Base run count before scaling
    pub runs: usize,
    /// Class hooks with this method's per-run overrides applied
    pub hooks: HookSet,
}

impl BenchmarkElement {
    /// Owning class
    pub fn class(&self) -> &ClassInfo {
        &self.method.class
    }
}

/// Expand validated classes into elements, in declaration order.
///
/// `classes` yields `(slot, layout)`; run counts resolve as method override,
/// then class default, then `default_runs`.
pub fn build_elements<'a>(
    classes: impl IntoIterator<Item = (usize, &'a ClassLayout)>,
    default_runs: usize,
) -> Vec<BenchmarkElement> {
    let mut elements = Vec::new();

    for (slot, layout) in classes {
        for bench in &layout.benches {
            let mut hooks = layout.hooks;
            if bench.before_each_run.is_some() {
                hooks.before_each_run = bench.before_each_run;
            }
            if bench.after_each_run.is_some() {
                hooks.after_each_run = bench.after_each_run;
            }

            elements.push(BenchmarkElement {
                id: ElementId(elements.len()),
                slot,
                method: bench.method,
                runs: bench
                    .runs
                    .or(layout.default_runs)
                    .unwrap_or(default_runs)
                    .max(1),
                hooks,
            });
        }
    }

    elements
}
