//! Error types for the Triage pipeline.
//!
//! All failures are represented by the [`TriageError`] enum. Library
//! errors (CSV parsing, SQLite, model serialization) convert into it via
//! `#[from]`; pipeline-specific failures use the string variants with
//! their constructor helpers.

use std::io;

use thiserror::Error;

/// The main error type for Triage operations.
#[derive(Error, Debug)]
pub enum TriageError {
    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// CSV read/parse errors from the underlying reader.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// SQLite storage errors.
    #[error("Storage error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Model artifact serialization/deserialization errors.
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// JSON output errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Category cleaning errors (misaligned or malformed category strings).
    #[error("Clean error: {0}")]
    Clean(String),

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Model building/fitting errors.
    #[error("Model error: {0}")]
    Model(String),

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with TriageError.
pub type Result<T> = std::result::Result<T, TriageError>;

impl TriageError {
    /// Create a new clean error.
    pub fn clean<S: Into<String>>(msg: S) -> Self {
        TriageError::Clean(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        TriageError::Analysis(msg.into())
    }

    /// Create a new model error.
    pub fn model<S: Into<String>>(msg: S) -> Self {
        TriageError::Model(msg.into())
    }

    /// Create a new invalid operation error.
    pub fn invalid_operation<S: Into<String>>(msg: S) -> Self {
        TriageError::InvalidOperation(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TriageError::clean("category string misaligned at id 7");
        assert_eq!(
            err.to_string(),
            "Clean error: category string misaligned at id 7"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing file");
        let err: TriageError = io_err.into();
        assert!(matches!(err, TriageError::Io(_)));
    }
}
