//! Diff errors.

use thiserror::Error;

/// DiffError reports a diff that could not be completed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiffError {
    /// Both sides are present at `path` but have different runtime types.
    #[error("{path}: type mismatch: original is {original}, current is {current}")]
    TypeMismatch {
        path: String,
        original: String,
        current: String,
    },

    /// The structure is nested deeper than the configured limit.
    #[error("{path}: maximum depth of {limit} exceeded")]
    DepthExceeded { path: String, limit: usize },
}

impl DiffError {
    /// Creates a type mismatch error.
    pub fn type_mismatch(
        path: impl Into<String>,
        original: impl Into<String>,
        current: impl Into<String>,
    ) -> Self {
        DiffError::TypeMismatch {
            path: path.into(),
            original: original.into(),
            current: current.into(),
        }
    }

    /// Creates a depth exceeded error.
    pub fn depth_exceeded(path: impl Into<String>, limit: usize) -> Self {
        DiffError::DepthExceeded {
            path: path.into(),
            limit,
        }
    }
}
