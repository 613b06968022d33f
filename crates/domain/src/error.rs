//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The HTTP method is not supported by the step vocabulary.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// A data table row does not have the expected number of cells.
    #[error("expected {expected} columns for table row {row}, got: {actual}")]
    MalformedTable {
        /// Zero-based index of the offending row.
        row: usize,
        /// Required number of cells.
        expected: usize,
        /// Number of cells found.
        actual: usize,
    },
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
