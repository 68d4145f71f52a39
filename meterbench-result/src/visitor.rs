//! Tree traversal and streaming
//!
//! Output collaborators either walk a finished [`BenchmarkResult`] or
//! subscribe as a [`ResultListener`] while the run is in progress. Both see
//! samples of a given (method, probe) pair in the same order.

use crate::tree::{BenchmarkResult, ClassResult, MethodResult};
use meterbench_core::{FailureRecord, MethodId, ProbeInfo, Sample};

/// Visitor over a finished result tree.
///
/// [`BenchmarkResult::walk`] calls, in order: `visit_benchmark`, root
/// failures, then per class `visit_class` and its failures, then per method
/// `visit_method`, its samples series by series and its failures.
pub trait ResultVisitor {
    /// Entered once, before anything else
    fn visit_benchmark(&mut self, _result: &BenchmarkResult) {}
    /// Entered for each class node
    fn visit_class(&mut self, _class: &ClassResult) {}
    /// Entered for each method node of the current class
    fn visit_method(&mut self, _method: &MethodResult) {}
    /// One stored sample, missing ones included
    fn visit_sample(&mut self, _method: &MethodId, _probe: &ProbeInfo, _sample: Sample) {}
    /// One failure of the node just entered
    fn visit_failure(&mut self, _failure: &FailureRecord) {}
}

/// Incremental consumer of results during a run, in arrival order
pub trait ResultListener {
    /// A probe produced a sample for a successful invocation
    fn on_sample(&mut self, _method: &MethodId, _probe: &ProbeInfo, _sample: Sample) {}
    /// A hook or benchmarked method failed
    fn on_failure(&mut self, _failure: &FailureRecord) {}
}

impl BenchmarkResult {
    /// Walk the tree root to leaves
    pub fn walk<V: ResultVisitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_benchmark(self);
        for failure in self.failures() {
            visitor.visit_failure(failure);
        }

        for class in self.classes() {
            visitor.visit_class(class);
            for failure in class.failures() {
                visitor.visit_failure(failure);
            }

            for method in class.methods() {
                visitor.visit_method(method);
                for series in method.series() {
                    for &sample in &series.samples {
                        visitor.visit_sample(method.method(), &series.probe, sample);
                    }
                }
                for failure in method.failures() {
                    visitor.visit_failure(failure);
                }
            }
        }
    }
}
