//! Role markers
//!
//! The lifecycle position of a declared method, carried as data.

use serde::{Deserialize, Serialize};

/// Lifecycle role of a method inside a benchmark class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    /// Runs once before anything else of the class
    BeforeBenchClass,
    /// Runs once before the first measured invocation of the class
    BeforeFirstRun,
    /// Runs before every measured invocation
    BeforeEachRun,
    /// The measured method itself
    Bench,
    /// Runs after every measured invocation
    AfterEachRun,
    /// Runs once after the last measured invocation of the class
    AfterLastRun,
    /// Runs once after everything else of the class
    AfterBenchClass,
}

/// Result tree level a failure of a given role is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureScope {
    /// Root of the result tree
    Benchmark,
    /// The declaring class
    Class,
    /// The benchmarked method
    Method,
}

impl Role {
    /// All roles in lifecycle order
    pub const ALL: [Role; 7] = [
        Role::BeforeBenchClass,
        Role::BeforeFirstRun,
        Role::BeforeEachRun,
        Role::Bench,
        Role::AfterEachRun,
        Role::AfterLastRun,
        Role::AfterBenchClass,
    ];

    /// Roles of which a class may declare at most one method
    pub const HOOKS: [Role; 6] = [
        Role::BeforeBenchClass,
        Role::BeforeFirstRun,
        Role::BeforeEachRun,
        Role::AfterEachRun,
        Role::AfterLastRun,
        Role::AfterBenchClass,
    ];

    /// Marker name as shown in reports
    pub fn label(self) -> &'static str {
        match self {
            Role::BeforeBenchClass => "BeforeBenchClass",
            Role::BeforeFirstRun => "BeforeFirstRun",
            Role::BeforeEachRun => "BeforeEachRun",
            Role::Bench => "Bench",
            Role::AfterEachRun => "AfterEachRun",
            Role::AfterLastRun => "AfterLastRun",
            Role::AfterBenchClass => "AfterBenchClass",
        }
    }

    /// Whether this is a lifecycle hook rather than the measured method
    pub fn is_hook(self) -> bool {
        self != Role::Bench
    }

    /// Where a failure raised under this role is recorded.
    ///
    /// Class setup and teardown failures go to the root, since a class whose
    /// setup failed never gets a node of its own.
    pub fn failure_scope(self) -> FailureScope {
        match self {
            Role::BeforeBenchClass | Role::AfterBenchClass => FailureScope::Benchmark,
            Role::BeforeFirstRun
            | Role::BeforeEachRun
            | Role::AfterEachRun
            | Role::AfterLastRun => FailureScope::Class,
            Role::Bench => FailureScope::Method,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
