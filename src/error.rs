//! Error handling for row/record mapping operations.
//!
//! Two layers of failure exist and never mix: fatal errors ([`Error`]) that
//! abort a whole mapping run, and recoverable per-row diagnostics
//! ([`RowError`]) that are accumulated while the batch continues.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for mapping operations
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors for mapping operations
///
/// Every variant here aborts the whole run. Row-scoped failures are carried
/// by [`RowError`] instead and reported through the run's error list.
#[derive(Error, Debug)]
pub enum Error {
    /// Binding extraction failed (malformed annotation table)
    #[error("binding error: {message}")]
    Binding { message: String },

    /// Header row index is outside the supplied row matrix
    #[error("header row index {index} out of bounds: {total} rows supplied")]
    HeaderRow { index: usize, total: usize },

    /// A required column is missing from the header row
    #[error("no header title matching found for required column '{column}'")]
    FieldMatch { column: String },

    /// An explicit column index points past the end of the header row
    #[error("explicit column index {index} for '{column}' exceeds header width {width}")]
    IndexExceeded {
        column: String,
        index: usize,
        width: usize,
    },

    /// A binding names a parser key with no registry entry
    #[error("field parser '{key}' is not registered")]
    ParserNotRegistered { key: String },

    /// A converter key has no registry entry (write path)
    #[error("field converter '{key}' is not registered")]
    ConverterNotRegistered { key: String },

    /// Required field blank after default substitution (sequential strict mode)
    #[error("column '{column}' is required but blank: row {row}")]
    Required { column: String, row: usize },

    /// A registered parser rejected a required cell (sequential strict mode)
    #[error("failed to parse required column '{column}' at row {row}: {message}")]
    Parse {
        column: String,
        row: usize,
        message: String,
    },

    /// The run was cancelled through its cancellation token
    #[error("mapping run cancelled")]
    Cancelled,

    /// A worker task died without reporting a mapping error
    #[error("worker task failed: {message}")]
    Worker { message: String },

    /// I/O failure while reading a row source
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV-level failure from the delegated reader
    #[error("CSV error: {message}")]
    Csv {
        message: String,
        #[source]
        source: csv::Error,
    },

    /// Workbook-level failure from the delegated spreadsheet reader
    #[error("spreadsheet error: {message}")]
    Sheet {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Row source file extension is not one of the supported formats
    #[error("unsupported row source format: '{extension}'")]
    UnknownFormat { extension: String },
}

impl Error {
    /// Create a binding extraction error
    pub fn binding(message: impl Into<String>) -> Self {
        Self::Binding {
            message: message.into(),
        }
    }

    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a CSV reader error with context
    pub fn csv(message: impl Into<String>, source: csv::Error) -> Self {
        Self::Csv {
            message: message.into(),
            source,
        }
    }

    /// Create a spreadsheet reader error with context
    pub fn sheet(
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Sheet {
            message: message.into(),
            source,
        }
    }
}

/// Error codes shared between fatal errors and row diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Required field blank after default substitution
    Required,
    /// Registered parser rejected the raw value
    Parse,
    /// Parser key has no registry entry
    NotRegistered,
    /// Required column absent from the header row
    FieldMatch,
    /// Explicit column index outside header bounds
    IndexExceeded,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorCode::Required => "REQUIRED",
            ErrorCode::Parse => "PARSE",
            ErrorCode::NotRegistered => "NOT_REGISTERED",
            ErrorCode::FieldMatch => "FIELD_MATCH",
            ErrorCode::IndexExceeded => "EINDEX_EXCEED",
        };
        f.write_str(name)
    }
}

/// Recoverable per-row diagnostic
///
/// Accumulated in the run's auxiliary error list; never mutates the primary
/// output. `row` is the 0-based index of the offending row within the input
/// matrix, header row included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    /// 0-based row index within the input matrix (header included)
    pub row: usize,

    /// Column label of the binding that failed
    pub column: String,

    /// Taxonomy code for the failure
    pub code: ErrorCode,

    /// Human-readable description
    pub message: String,
}

impl RowError {
    pub fn new(
        row: usize,
        column: impl Into<String>,
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            row,
            column: column.into(),
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "row {}, column '{}': [{}] {}",
            self.row, self.column, self.code, self.message
        )
    }
}
