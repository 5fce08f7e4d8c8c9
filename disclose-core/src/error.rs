//! Error types for the disclosure engine.
//!
//! The parse path itself never fails on malformed input — bad text degrades
//! to lower-confidence records plus notes. The only fallible surface is
//! loading caller-supplied reference data.

use thiserror::Error;

/// Result type alias for reference-data loading.
pub type Result<T> = std::result::Result<T, ReferenceError>;

/// Errors raised while loading ticker/company/asset-type reference data.
#[derive(Error, Debug)]
pub enum ReferenceError {
    /// I/O error reading a reference file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parse error in a reference file.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A row that cannot be used (wrong column count, empty key).
    #[error("bad reference row {row}: {reason}")]
    BadRow { row: usize, reason: String },
}

impl ReferenceError {
    pub fn bad_row(row: usize, reason: impl Into<String>) -> Self {
        ReferenceError::BadRow {
            row,
            reason: reason.into(),
        }
    }
}
