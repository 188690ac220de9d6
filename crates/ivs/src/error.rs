//! Run error types

use std::path::PathBuf;

use thiserror::Error;

/// Result type for report runs
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a report run
#[derive(Debug, Error)]
pub enum Error {
    /// A source record does not fit the expected layout
    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },

    /// The record source could not be read
    #[error("source unavailable: {0}")]
    SourceUnavailable(#[from] ivs_source::SourceError),

    /// The report could not be saved
    #[error("cannot write report to {}: {source}", .path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A required setting is missing or invalid
    #[error("configuration error: {0}")]
    ConfigurationError(String),

    /// Invalid document coordinates
    #[error("document error: {0}")]
    Document(#[from] ivs_core::Error),
}

impl Error {
    pub(crate) fn malformed<S: Into<String>>(line: u64, reason: S) -> Self {
        Error::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn config<S: Into<String>>(message: S) -> Self {
        Error::ConfigurationError(message.into())
    }
}
