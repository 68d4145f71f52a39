//! Log-backed result listener

use meterbench_core::{FailureRecord, MethodId, ProbeInfo, Sample};
use meterbench_result::ResultListener;

/// Streams every sample and failure to `tracing` as it arrives
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingListener;

impl ResultListener for TracingListener {
    fn on_sample(&mut self, method: &MethodId, probe: &ProbeInfo, sample: Sample) {
        tracing::debug!(%method, probe = %probe.name, unit = %probe.unit, %sample, "sample");
    }

    fn on_failure(&mut self, failure: &FailureRecord) {
        tracing::warn!(
            role = %failure.role,
            method = %failure.method,
            cause = %failure.cause,
            "failure"
        );
    }
}
