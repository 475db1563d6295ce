//! Error types for sheetbind.

use thiserror::Error;

/// Result type for mapping operations.
pub type MapResult<T> = Result<T, MapError>;

/// Boxed error produced by a tabular backend.
pub type BackendError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while decoding or encoding records.
#[derive(Debug, Error)]
pub enum MapError {
    /// The record shape is malformed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The source workbook has no sheets.
    #[error("Sheet list is empty")]
    EmptyInput,

    /// Failure reported by the tabular backend, passed through as-is.
    #[error(transparent)]
    Backend(BackendError),
}

impl MapError {
    /// Wrap any backend failure.
    pub fn backend<E>(err: E) -> Self
    where
        E: Into<BackendError>,
    {
        MapError::Backend(err.into())
    }

    /// Returns true if this is an `InvalidArgument` error.
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, MapError::InvalidArgument(_))
    }
}

/// Errors raised by the in-memory [`Table`](crate::Table) backend.
#[derive(Debug, Error, PartialEq)]
pub enum TableError {
    #[error("Sheet not found: {name}")]
    SheetNotFound { name: String },

    #[error("Invalid cell reference: {0}")]
    InvalidCellReference(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}

impl From<TableError> for MapError {
    fn from(err: TableError) -> Self {
        MapError::backend(err)
    }
}

/// A cell's text could not be stored in a typed field.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("cannot parse {text:?} as {expected}")]
pub struct FieldError {
    pub text: String,
    pub expected: &'static str,
}

impl FieldError {
    pub(crate) fn new(text: &str, expected: &'static str) -> Self {
        FieldError {
            text: text.to_string(),
            expected,
        }
    }
}
