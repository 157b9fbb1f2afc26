//! Error types for the record files.

use std::path::PathBuf;

use thiserror::Error;

use crate::date::InvalidDate;

/// Errors that can occur while reading or writing record files.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Missing header line in {0}")]
    MissingHeader(PathBuf),

    #[error("Invalid header: {0:?}")]
    InvalidHeader(String),

    #[error("Expected {expected} fields, found {found}")]
    MissingFields { expected: usize, found: usize },

    #[error("Invalid number in field '{field}': {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Invalid date in field '{field}': {source}")]
    InvalidDate {
        field: &'static str,
        #[source]
        source: InvalidDate,
    },

    #[error("Invalid payment method: {0:?}")]
    InvalidPayment(String),

    #[error("Invalid lodging kind: {0}")]
    InvalidKind(u8),
}

impl RecordError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
