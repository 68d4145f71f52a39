//! Coordinator errors

use meterbench_core::ValidationError;
use thiserror::Error;

/// Errors surfaced to the caller before anything is executed
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BenchError {
    /// A class failed structural validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The same class was added both by reference and as an object, or as
    /// two objects
    #[error("{class}: registered more than once with conflicting instance ownership")]
    AmbiguousRegistration {
        /// Offending class
        class: &'static str,
    },

    /// Run scale is zero, negative or not finite
    #[error("run scale must be a positive finite number, got {0}")]
    InvalidRunScale(f64),

    /// The configured element filter is not a valid regex
    #[error("invalid filter: {0}")]
    InvalidFilter(#[from] regex::Error),
}
