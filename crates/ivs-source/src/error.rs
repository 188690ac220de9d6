//! Source error types

use std::path::PathBuf;

use thiserror::Error;

/// Result type for source operations
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Errors that can occur while reading raw records
#[derive(Debug, Error)]
pub enum SourceError {
    /// Input file does not exist
    #[error("input file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV library error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Database connection or query error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}
