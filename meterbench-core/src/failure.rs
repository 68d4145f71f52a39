//! Failure records
//!
//! Everything a benchmark or hook method can raise, captured as data so a run
//! can continue past it.

use crate::class::HookResult;
use crate::element::MethodId;
use crate::role::{FailureScope, Role};
use serde::Serialize;
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

/// How a method failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CauseKind {
    /// Returned an error
    Error,
    /// Panicked
    Panic,
}

/// Captured error or panic payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureCause {
    /// Error return or panic
    pub kind: CauseKind,
    /// Top-level message
    pub message: String,
    /// Messages of the `source()` chain below the top-level error
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub chain: Vec<String>,
}

impl FailureCause {
    /// Capture an error together with its source chain
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut chain = Vec::new();
        let mut source = err.source();
        while let Some(inner) = source {
            chain.push(inner.to_string());
            source = inner.source();
        }

        Self {
            kind: CauseKind::Error,
            message: err.to_string(),
            chain,
        }
    }

    /// Capture a panic payload as returned by `catch_unwind`
    pub fn from_panic(panic: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = panic.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic.downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        Self {
            kind: CauseKind::Panic,
            message,
            chain: Vec::new(),
        }
    }
}

impl std::fmt::Display for FailureCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.kind == CauseKind::Panic {
            f.write_str("panicked: ")?;
        }
        f.write_str(&self.message)?;
        for inner in &self.chain {
            write!(f, ": {inner}")?;
        }
        Ok(())
    }
}

/// Call a benchmark or hook method, turning both error returns and panics
/// into a [`FailureCause`].
pub fn guarded(f: impl FnOnce() -> HookResult) -> Result<(), FailureCause> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(FailureCause::from_error(&*err)),
        Err(panic) => Err(FailureCause::from_panic(panic)),
    }
}

/// One failed invocation of a declared method
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureRecord {
    /// Role the method was invoked under
    pub role: Role,
    /// Method that failed
    pub method: MethodId,
    /// What it raised
    pub cause: FailureCause,
}

impl FailureRecord {
    /// Build a record
    pub fn new(role: Role, method: MethodId, cause: FailureCause) -> Self {
        Self {
            role,
            method,
            cause,
        }
    }

    /// Result tree level this failure belongs to
    pub fn scope(&self) -> FailureScope {
        self.role.failure_scope()
    }
}

impl std::fmt::Display for FailureRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}: {}", self.role, self.method, self.cause)
    }
}
