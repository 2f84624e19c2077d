//! Error types for gitmetrics.

use thiserror::Error;

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// gitmetrics error types.
#[derive(Debug, Error)]
pub enum Error {
    /// A repository path, branch or commit ref does not resolve
    #[error("Not found: {0}")]
    NotFound(String),

    /// A date, ref or glob is not in a recognized format
    #[error("Parse error: {0}")]
    Parse(String),

    /// A file's bytes are not valid UTF-8
    #[error("Could not decode \"{path}\" as UTF-8")]
    Decode {
        /// Path of the offending file, relative to the repository root
        path: String,
    },

    /// The similarity comparator could not run
    #[error("Execution error: {0}")]
    Execution(String),

    /// A log query against the repository failed
    #[error("Query error: {0}")]
    Query(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The output path cannot be used
    #[error("Output error: {0}")]
    Output(String),

    /// A report with no rows has no header to write
    #[error("Nothing to write: the report has no rows")]
    EmptyReport,

    /// The end of a date range precedes its start
    #[error("Invalid range: end {end} is before start {start}")]
    InvalidRange {
        /// Formatted start of the range
        start: String,
        /// Formatted end of the range
        end: String,
    },
}
