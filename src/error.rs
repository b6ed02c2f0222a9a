//! Error types shared by the readers and the pipeline stages.

use std::io;

use thiserror::Error;

use crate::config::ConfigError;

/// Every failure the estimate pipeline can report.
///
/// Parsing and grouping errors are never recovered locally: the first one
/// aborts the run and is handed back to the caller unchanged.
#[derive(Debug, Error)]
pub enum EstimateError {
    /// A timestamp did not match the format expected for its source.
    #[error("malformed {source_name} timestamp \"{value}\": {reason}")]
    MalformedTimestamp {
        /// Which input the timestamp came from (`consumption` or `production`).
        source_name: &'static str,
        /// The raw timestamp text.
        value: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// A present, non-empty reading could not be parsed as a number.
    #[error("malformed {source_name} value \"{value}\" at row {row}")]
    MalformedValue {
        source_name: &'static str,
        value: String,
        /// Zero-based data row index.
        row: usize,
    },

    /// An expected column is absent from the input header.
    #[error("missing column \"{column}\" in {source_name} input")]
    MissingColumn {
        source_name: &'static str,
        column: String,
    },

    /// An averaging step received zero rows.
    #[error("{0} series is empty")]
    EmptySeries(&'static str),

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl EstimateError {
    pub(crate) fn missing_column(source_name: &'static str, column: &str) -> Self {
        Self::MissingColumn {
            source_name,
            column: column.to_string(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EstimateError>;
