//! Run control
//!
//! Hooks for the host to watch the lifecycle and to stop a run early.

use meterbench_core::{MethodId, Role};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Callback fired for every declared method the engine invokes, including
/// the benchmarked method itself, right before the call.
pub trait LifecycleObserver {
    /// `method` is about to be invoked under `role`
    fn on_hook(&mut self, role: Role, method: &MethodId);
}

impl<F: FnMut(Role, &MethodId)> LifecycleObserver for F {
    fn on_hook(&mut self, role: Role, method: &MethodId) {
        self(role, method)
    }
}

/// Best-effort abort request, shareable across threads.
///
/// The engine checks it between plan steps only, never while a benchmarked
/// method is being measured. Classes already set up still get their
/// teardown hooks.
#[derive(Debug, Clone, Default)]
pub struct AbortHandle(Arc<AtomicBool>);

impl AbortHandle {
    /// Ask the running benchmark to stop after the current step
    pub fn abort(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether an abort was requested
    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub(crate) fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}
