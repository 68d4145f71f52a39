//! Benchmark Arrangement
//!
//! Turns benchmark elements into a concrete sequence of (element, run) steps.
//!
//! Strategies:
//! - No arrangement: declaration order, runs of one element back to back
//! - Sequential: run 0 of every element, then run 1, and so on
//! - Random: seeded permutation of the declaration-order steps
//!
//! An optional regex on `Class#method` narrows the elements first.

use meterbench_core::{BenchmarkElement, ElementId};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Configurable arrangement strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrangementKind {
    /// Declaration order, runs grouped per element
    #[default]
    None,
    /// Interleave elements run by run
    Sequential,
    /// Seeded shuffle
    Random,
}

/// Ordering strategy for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Arrangement {
    /// Declaration order; all runs of an element are consecutive
    #[default]
    NoArrangement,
    /// All elements' run 0, then all run 1, ...
    SequentialMethod,
    /// Pseudo-random permutation, reproducible for a given seed.
    /// Without a seed one is drawn when the plan is built.
    Random {
        /// Shuffle seed
        seed: Option<u64>,
    },
}

impl Arrangement {
    /// Build from configuration values
    pub fn from_kind(kind: ArrangementKind, seed: Option<u64>) -> Self {
        match kind {
            ArrangementKind::None => Arrangement::NoArrangement,
            ArrangementKind::Sequential => Arrangement::SequentialMethod,
            ArrangementKind::Random => Arrangement::Random { seed },
        }
    }

    /// Configuration kind of this strategy
    pub fn kind(&self) -> ArrangementKind {
        match self {
            Arrangement::NoArrangement => ArrangementKind::None,
            Arrangement::SequentialMethod => ArrangementKind::Sequential,
            Arrangement::Random { .. } => ArrangementKind::Random,
        }
    }

    /// Short label for logs and run metadata
    pub fn label(&self) -> &'static str {
        match self {
            Arrangement::NoArrangement => "none",
            Arrangement::SequentialMethod => "sequential",
            Arrangement::Random { .. } => "random",
        }
    }

    /// Seed of a random arrangement
    pub fn seed(&self) -> Option<u64> {
        match self {
            Arrangement::Random { seed } => *seed,
            _ => None,
        }
    }

    /// Draw a seed for a random arrangement that has none
    pub fn with_resolved_seed(self) -> Self {
        match self {
            Arrangement::Random { seed: None } => Arrangement::Random {
                seed: Some(rand::random()),
            },
            other => other,
        }
    }

    fn order(&self, runs: &[(ElementId, usize)]) -> Vec<PlanStep> {
        let declared = || {
            runs.iter()
                .flat_map(|&(element, n)| (0..n).map(move |run| PlanStep { element, run }))
                .collect::<Vec<_>>()
        };

        match self {
            Arrangement::NoArrangement => declared(),
            Arrangement::SequentialMethod => {
                let rounds = runs.iter().map(|&(_, n)| n).max().unwrap_or(0);
                (0..rounds)
                    .flat_map(|run| {
                        runs.iter()
                            .filter(move |&&(_, n)| run < n)
                            .map(move |&(element, _)| PlanStep { element, run })
                    })
                    .collect()
            }
            Arrangement::Random { seed } => {
                let mut steps = declared();
                let mut rng = StdRng::seed_from_u64(seed.unwrap_or_else(rand::random));
                steps.shuffle(&mut rng);
                steps
            }
        }
    }
}

impl std::fmt::Display for Arrangement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Arrangement::Random { seed: Some(seed) } => write!(f, "random (seed {seed})"),
            other => f.write_str(other.label()),
        }
    }
}

/// Scaled run count: `round(base * scale)`, at least one
pub fn resolve_runs(base: usize, scale: f64) -> usize {
    ((base as f64 * scale).round() as usize).max(1)
}

/// One execution of one element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlanStep {
    /// Element to run
    pub element: ElementId,
    /// Run index in `[0, runs)`
    pub run: usize,
}

/// Ordered, single-use execution sequence
#[derive(Debug, Clone)]
pub struct ArrangementPlan {
    steps: Vec<PlanStep>,
    arrangement: Arrangement,
}

impl ArrangementPlan {
    /// Planned steps in execution order
    pub fn steps(&self) -> &[PlanStep] {
        &self.steps
    }

    /// Number of planned steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether nothing is planned
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Strategy the plan was built with, seed resolved
    pub fn arrangement(&self) -> Arrangement {
        self.arrangement
    }

    /// How often `element` appears
    pub fn runs_of(&self, element: ElementId) -> usize {
        self.steps.iter().filter(|s| s.element == element).count()
    }
}

impl IntoIterator for ArrangementPlan {
    type Item = PlanStep;
    type IntoIter = std::vec::IntoIter<PlanStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}

/// Build the execution plan.
///
/// Each selected element appears exactly `resolve_runs(element.runs, scale)`
/// times. Elements whose `Class#method` id does not match `filter` are left
/// out.
pub fn build_plan(
    elements: &[BenchmarkElement],
    scale: f64,
    arrangement: Arrangement,
    filter: Option<&regex::Regex>,
) -> ArrangementPlan {
    let runs: Vec<_> = elements
        .iter()
        .filter(|e| filter.is_none_or(|re| re.is_match(&e.method.to_string())))
        .map(|e| (e.id, resolve_runs(e.runs, scale)))
        .collect();

    let arrangement = arrangement.with_resolved_seed();
    ArrangementPlan {
        steps: arrangement.order(&runs),
        arrangement,
    }
}
