//! Error types for the studentperf serving core

use std::path::PathBuf;
use thiserror::Error;

use crate::artifact::ArtifactKind;

/// Result type alias for studentperf operations
pub type Result<T> = std::result::Result<T, StudentPerfError>;

/// A single violated constraint on one field of a feature record
#[derive(Debug, Clone, PartialEq)]
pub struct FieldViolation {
    /// Name of the offending field
    pub field: String,
    /// The value as received
    pub value: String,
    /// The constraint that was violated
    pub constraint: String,
}

impl FieldViolation {
    pub fn new(
        field: impl Into<String>,
        value: impl Into<String>,
        constraint: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            constraint: constraint.into(),
        }
    }
}

impl std::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} = {:?} ({})",
            self.field, self.value, self.constraint
        )
    }
}

fn fmt_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Main error type for the serving core
#[derive(Error, Debug)]
pub enum StudentPerfError {
    /// The feature record violates one or more domain invariants.
    /// Carries every violation, not just the first, so a caller can
    /// surface all problems at once.
    #[error("invalid feature record: {}", fmt_violations(violations))]
    Validation { violations: Vec<FieldViolation> },

    /// A categorical value that the fitted transform never saw at
    /// training time. May indicate training/serving vocabulary drift.
    #[error("unknown category for {field}: {value:?}")]
    UnknownCategory { field: String, value: String },

    /// The artifact path did not resolve to a readable object
    #[error("{kind} artifact not found at {}", path.display())]
    ArtifactNotFound { kind: ArtifactKind, path: PathBuf },

    /// The artifact deserialized badly or its declared type/schema does
    /// not match what was requested
    #[error("{kind} artifact at {} is corrupt: {reason}", path.display())]
    ArtifactCorrupt {
        kind: ArtifactKind,
        path: PathBuf,
        reason: String,
    },

    /// Feature vector width disagrees with what the model expects.
    /// Indicates an incompatible transform/model artifact pairing.
    #[error("feature vector has {actual} columns, model expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The fitted transform names a column the feature record does not have
    #[error("column not found in feature record: {0}")]
    ColumnNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StudentPerfError {
    /// Build a validation error from a list of violations
    pub fn validation(violations: Vec<FieldViolation>) -> Self {
        StudentPerfError::Validation { violations }
    }

    /// Whether the caller can recover by correcting the request
    /// (as opposed to a deployment/configuration problem)
    pub fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            StudentPerfError::Validation { .. } | StudentPerfError::UnknownCategory { .. }
        )
    }
}
