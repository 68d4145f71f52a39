//! Structural validation errors

use crate::role::Role;
use thiserror::Error;

/// A benchmark class is malformed and cannot be run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// Two methods share a name.
    #[error("{class}: method `{method}` is declared more than once")]
    DuplicateMethod {
        /// Class name
        class: &'static str,
        /// Offending method
        method: &'static str,
    },

    /// More than one method carries the same lifecycle role.
    #[error("{class}: {role} is declared on both `{first}` and `{second}`")]
    DuplicateHook {
        /// Class name
        class: &'static str,
        /// Role in question
        role: Role,
        /// First method carrying the role
        first: &'static str,
        /// Second method carrying the role
        second: &'static str,
    },

    /// The class was added by reference, declares instance methods and has
    /// no constructor to create an instance with.
    #[error("{class}#{method}: instance method on a class added without constructor")]
    MissingConstructor {
        /// Class name
        class: &'static str,
        /// Offending method
        method: &'static str,
    },

    /// A benchmark refers to a per-run hook that is not declared.
    #[error("{class}#{method}: {role} hook `{target}` is not declared")]
    UnknownHook {
        /// Class name
        class: &'static str,
        /// Offending method
        method: &'static str,
        /// Role in question
        role: Role,
        /// Name the override refers to
        target: &'static str,
    },

    /// A run count of zero.
    #[error("{class}: run count of `{target}` must be at least 1")]
    ZeroRuns {
        /// Class name
        class: &'static str,
        /// Method or setting the count belongs to
        target: &'static str,
    },
}
