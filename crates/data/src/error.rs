//! Error types for loading and exporting data.

use thiserror::Error;

/// Errors raised while reading or writing corpus files.
#[derive(Debug, Error)]
pub enum DataError {
    /// The CSV reader or writer failed (includes I/O errors).
    #[error("CSV error in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    /// A required column is absent from a file header.
    #[error("{path} is missing required column '{column}'")]
    MissingField { path: String, column: String },
}

/// The price table has no column for the requested label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("price data for {label} is not available (no '{column}' column)")]
pub struct MissingPriceColumn {
    pub label: String,
    pub column: String,
}

impl DataError {
    pub(crate) fn csv(path: impl Into<String>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }
}
