//! Error types for chart parsing.
//!
//! This module provides the [`ChartError`] type for all library operations
//! and the [`Result`] convenience type.
//!
//! Most data-quality problems are not errors at all: they are recorded as
//! [`Warning`]s in the per-parse [`WarningCollector`](crate::warning::WarningCollector).
//! A `ChartError` is only returned when a parse cannot continue, or when strict
//! mode promotes an error-severity warning.

use crate::warning::Warning;
use thiserror::Error;

/// Error type for all chart library operations.
#[derive(Error, Debug)]
pub enum ChartError {
    /// The 24-byte ISO 8211 leader is malformed or inconsistent.
    #[error("Invalid leader: {0}")]
    InvalidLeader(String),

    /// The record directory is malformed or overruns its bounds.
    #[error("Invalid directory: {0}")]
    InvalidDirectory(String),

    /// The record is shorter than its leader declares.
    #[error("Truncated record: {0}")]
    TruncatedRecord(String),

    /// A field runs outside the data area of its record.
    #[error("Invalid field: {0}")]
    InvalidField(String),

    /// The first record of a buffer could not be decoded.
    #[error("First record is unreadable: {0}")]
    UnreadableFirstRecord(Box<ChartError>),

    /// A cell has no dataset identification (DSID) record.
    #[error("Missing dataset identification: {0}")]
    MissingDatasetIdentity(String),

    /// An update buffer is out of sequence (strict mode).
    #[error("Update sequence error: {0}")]
    UpdateSequence(String),

    /// Strict mode promoted an error-severity warning to a failure.
    #[error("Strict mode: {0}")]
    Strict(Warning),

    /// Parse options failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON serialization or deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV export failed.
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    /// IO error from an export destination.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChartError {
    /// Whether this error describes a structural problem confined to one record.
    ///
    /// Structural errors are recoverable by the record reader, which skips the
    /// offending record and resynchronises on the next one.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ChartError::InvalidLeader(_)
                | ChartError::InvalidDirectory(_)
                | ChartError::TruncatedRecord(_)
                | ChartError::InvalidField(_)
        )
    }

    /// Whether this error is an update sequencing failure.
    #[must_use]
    pub fn is_sequencing(&self) -> bool {
        match self {
            ChartError::UpdateSequence(_) => true,
            ChartError::Strict(w) => w.code.is_sequencing(),
            _ => false,
        }
    }
}

/// Convenience type alias for [`std::result::Result`] with [`ChartError`].
pub type Result<T> = std::result::Result<T, ChartError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warning::{Severity, WarningCode};

    #[test]
    fn test_structural_classification() {
        assert!(ChartError::InvalidLeader("x".to_string()).is_structural());
        assert!(ChartError::InvalidDirectory("x".to_string()).is_structural());
        assert!(!ChartError::UpdateSequence("x".to_string()).is_structural());
        assert!(!ChartError::MissingDatasetIdentity("x".to_string()).is_structural());
    }

    #[test]
    fn test_strict_gap_is_sequencing() {
        let warning = Warning::new(Severity::Error, WarningCode::UpdateGap, "expected 2, got 3");
        let err = ChartError::Strict(warning);
        assert!(err.is_sequencing());
        assert!(err.to_string().contains("UPDATE_GAP"));
    }
}
