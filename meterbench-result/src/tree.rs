//! Result Tree
//!
//! Benchmark → class → method → per-probe sample series. Series are
//! append-only in arrival order and failures are never mutated once added.

use crate::meta::RunMeta;
use fxhash::FxHashMap;
use meterbench_core::{ClassInfo, FailureRecord, FailureScope, MethodId, ProbeInfo, Sample};
use meterbench_stats::Aggregate;
use serde::Serialize;

fn register(probes: &mut Vec<ProbeInfo>, probe: &ProbeInfo) -> bool {
    if probes.iter().any(|p| p.name == probe.name) {
        return false;
    }
    probes.push(probe.clone());
    true
}

/// Samples of one probe on one method
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleSeries {
    /// Probe the samples came from
    pub probe: ProbeInfo,
    /// Samples in arrival order
    pub samples: Vec<Sample>,
}

impl SampleSeries {
    fn new(probe: ProbeInfo) -> Self {
        Self {
            probe,
            samples: Vec::new(),
        }
    }

    /// Aggregate over the whole series
    pub fn aggregate(&self) -> Aggregate {
        Aggregate::from_samples(&self.samples)
    }
}

/// Measurements and invocation failures of one benchmarked method
#[derive(Debug, Clone, Serialize)]
pub struct MethodResult {
    method: MethodId,
    series: Vec<SampleSeries>,
    failures: Vec<FailureRecord>,
}

impl MethodResult {
    fn new(method: MethodId, probes: &[ProbeInfo]) -> Self {
        Self {
            method,
            series: probes.iter().cloned().map(SampleSeries::new).collect(),
            failures: Vec::new(),
        }
    }

    fn series_mut(&mut self, probe: &ProbeInfo) -> &mut SampleSeries {
        let index = match self.series.iter().position(|s| s.probe.name == probe.name) {
            Some(index) => index,
            None => {
                self.series.push(SampleSeries::new(probe.clone()));
                self.series.len() - 1
            }
        };
        &mut self.series[index]
    }

    /// Method identity
    pub fn method(&self) -> &MethodId {
        &self.method
    }

    /// Method name
    pub fn name(&self) -> &'static str {
        self.method.name
    }

    /// Probes registered on this method, in registration order
    pub fn probes(&self) -> impl Iterator<Item = &ProbeInfo> {
        self.series.iter().map(|s| &s.probe)
    }

    /// All series, in probe registration order
    pub fn series(&self) -> &[SampleSeries] {
        &self.series
    }

    /// Samples recorded for `probe`; empty if the probe never reached this method
    pub fn samples(&self, probe: &str) -> &[Sample] {
        self.series
            .iter()
            .find(|s| s.probe.name == probe)
            .map(|s| s.samples.as_slice())
            .unwrap_or_default()
    }

    /// Failures of the benchmarked invocation itself
    pub fn failures(&self) -> &[FailureRecord] {
        &self.failures
    }

    /// Aggregate of `probe` on this method
    pub fn aggregate(&self, probe: &str) -> Aggregate {
        Aggregate::from_samples(self.samples(probe))
    }
}

/// Results of one benchmark class
#[derive(Debug, Clone, Serialize)]
pub struct ClassResult {
    class: ClassInfo,
    probes: Vec<ProbeInfo>,
    methods: Vec<MethodResult>,
    #[serde(skip)]
    method_index: FxHashMap<&'static str, usize>,
    failures: Vec<FailureRecord>,
}

impl ClassResult {
    fn new(class: ClassInfo) -> Self {
        Self {
            class,
            probes: Vec::new(),
            methods: Vec::new(),
            method_index: FxHashMap::default(),
            failures: Vec::new(),
        }
    }

    fn method_mut(&mut self, method: &MethodId) -> &mut MethodResult {
        let index = match self.method_index.get(method.name) {
            Some(&index) => index,
            None => {
                self.methods.push(MethodResult::new(*method, &self.probes));
                self.method_index.insert(method.name, self.methods.len() - 1);
                self.methods.len() - 1
            }
        };
        &mut self.methods[index]
    }

    /// Class identity
    pub fn class(&self) -> &ClassInfo {
        &self.class
    }

    /// Class name
    pub fn name(&self) -> &'static str {
        self.class.name
    }

    /// Probes registered for this class
    pub fn probes(&self) -> &[ProbeInfo] {
        &self.probes
    }

    /// Methods in order of first result
    pub fn methods(&self) -> &[MethodResult] {
        &self.methods
    }

    /// Look up a method by name
    pub fn method(&self, name: &str) -> Option<&MethodResult> {
        self.method_index.get(name).map(|&i| &self.methods[i])
    }

    /// Failures of this class's run-level hooks
    pub fn failures(&self) -> &[FailureRecord] {
        &self.failures
    }

    /// Aggregate of `probe` over every method, merged exactly
    pub fn aggregate(&self, probe: &str) -> Aggregate {
        self.methods
            .iter()
            .fold(Aggregate::new(), |acc, m| acc.merge(&m.aggregate(probe)))
    }
}

/// What a finished run amounts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// No class was run and nothing failed
    NothingSubmitted,
    /// Classes were submitted, but none got past its setup
    NoClassSucceeded,
    /// At least one class ran
    Completed,
}

/// Root of the result tree
#[derive(Debug, Clone, Default, Serialize)]
pub struct BenchmarkResult {
    probes: Vec<ProbeInfo>,
    classes: Vec<ClassResult>,
    #[serde(skip)]
    class_index: FxHashMap<ClassInfo, usize>,
    failures: Vec<FailureRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    meta: Option<RunMeta>,
}

impl BenchmarkResult {
    /// Empty tree
    pub fn new() -> Self {
        Self::default()
    }

    fn class_mut(&mut self, class: &ClassInfo) -> &mut ClassResult {
        let index = match self.class_index.get(class) {
            Some(&index) => index,
            None => {
                self.classes.push(ClassResult::new(*class));
                self.class_index.insert(*class, self.classes.len() - 1);
                self.classes.len() - 1
            }
        };
        &mut self.classes[index]
    }

    fn register_probe(&mut self, class: &ClassInfo, probe: &ProbeInfo) {
        register(&mut self.probes, probe);
        register(&mut self.class_mut(class).probes, probe);
    }

    /// Register `probes` for a class whose setup succeeded.
    ///
    /// Creates the class node even when `probes` is empty.
    pub fn register_class(&mut self, class: &ClassInfo, probes: &[ProbeInfo]) {
        self.class_mut(class);
        for probe in probes {
            self.register_probe(class, probe);
        }
    }

    /// Append one sample, creating intermediate nodes on first use
    pub fn add_data(&mut self, method: &MethodId, probe: &ProbeInfo, sample: Sample) {
        self.register_probe(&method.class, probe);
        self.class_mut(&method.class)
            .method_mut(method)
            .series_mut(probe)
            .samples
            .push(sample);
    }

    /// Attach a failure to the node its role belongs to
    pub fn add_failure(&mut self, failure: FailureRecord) {
        match failure.scope() {
            FailureScope::Benchmark => self.failures.push(failure),
            FailureScope::Class => self.class_mut(&failure.method.class).failures.push(failure),
            FailureScope::Method => {
                let method = failure.method;
                self.class_mut(&method.class)
                    .method_mut(&method)
                    .failures
                    .push(failure)
            }
        }
    }

    /// Every probe registered by some class
    pub fn registered_probes(&self) -> &[ProbeInfo] {
        &self.probes
    }

    /// Classes in order of registration
    pub fn classes(&self) -> &[ClassResult] {
        &self.classes
    }

    /// Look up a class node
    pub fn class(&self, class: &ClassInfo) -> Option<&ClassResult> {
        self.class_index.get(class).map(|&i| &self.classes[i])
    }

    /// Look up a class node by display name
    pub fn class_named(&self, name: &str) -> Option<&ClassResult> {
        self.classes.iter().find(|c| c.name() == name)
    }

    /// Look up a method node
    pub fn method(&self, method: &MethodId) -> Option<&MethodResult> {
        self.class(&method.class)?.method(method.name)
    }

    /// Failures attached at the root
    pub fn failures(&self) -> &[FailureRecord] {
        &self.failures
    }

    /// Failures of every node, root first
    pub fn all_failures(&self) -> impl Iterator<Item = &FailureRecord> {
        self.failures.iter().chain(self.classes.iter().flat_map(|c| {
            c.failures
                .iter()
                .chain(c.methods.iter().flat_map(|m| m.failures.iter()))
        }))
    }

    /// Aggregate of `probe` over the whole tree
    pub fn aggregate(&self, probe: &str) -> Aggregate {
        self.classes
            .iter()
            .fold(Aggregate::new(), |acc, c| acc.merge(&c.aggregate(probe)))
    }

    /// Run metadata, if the tree came out of a coordinator run
    pub fn meta(&self) -> Option<&RunMeta> {
        self.meta.as_ref()
    }

    /// Attach run metadata
    pub fn set_meta(&mut self, meta: RunMeta) {
        self.meta = Some(meta);
    }

    /// Fold another tree into this one.
    ///
    /// Series of the same (class, method, probe) are concatenated, so the
    /// merged aggregate equals the aggregate of the concatenated samples.
    /// This tree's metadata is kept.
    pub fn merge(&mut self, other: BenchmarkResult) {
        for probe in &other.probes {
            register(&mut self.probes, probe);
        }
        self.failures.extend(other.failures);

        for class in other.classes {
            self.register_class(&class.class, &class.probes);
            let target = self.class_mut(&class.class);
            target.failures.extend(class.failures);

            for method in class.methods {
                let node = target.method_mut(&method.method);
                for series in method.series {
                    node.series_mut(&series.probe).samples.extend(series.samples);
                }
                node.failures.extend(method.failures);
            }
        }
    }

    /// Tell an empty submission apart from one where every class failed
    pub fn outcome(&self) -> RunOutcome {
        if !self.classes.is_empty() {
            RunOutcome::Completed
        } else if self.failures.is_empty() {
            RunOutcome::NothingSubmitted
        } else {
            RunOutcome::NoClassSucceeded
        }
    }
}
