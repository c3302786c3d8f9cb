use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Error type covering the different failure cases that can occur when the
/// tool retrieves, transforms, or emits degree-completion data.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Wrapper for IO failures such as creating or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors bubbled up from the student-records database.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Errors bubbled up from the review-workbook writer.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Raised when the institution profile file cannot be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Raised when the requested reporting window is empty or reversed.
    #[error("start date {start} must fall before end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    /// Raised when a field table disagrees with the record positions it claims.
    #[error("inconsistent field layout: {0}")]
    InvalidLayout(String),

    /// Raised when a record has no value for a non-filler layout field.
    #[error("no value for layout field '{0}'")]
    UnknownField(String),

    /// Raised when neither `--database` nor the environment names a database.
    #[error("no student-records database configured; pass --database or set DEGREEVERIFY_DATABASE")]
    MissingDatabase,

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
