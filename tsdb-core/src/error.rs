use serde::Serialize;
use thiserror::Error;

/// The taxonomy of failure kinds a client can observe in an `Error`
/// response's `data.kind` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub enum ErrorKind {
    UnknownCommand,
    MalformedRequest,
    SeriesNotFound,
    SeriesAlreadyExists,
    DimensionMismatch,
    InvalidArgument,
    Internal,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("malformed request: {0}")]
    MalformedRequest(String),

    #[error("series not found: {0}")]
    SeriesNotFound(String),

    #[error("series already exists: {0}")]
    SeriesAlreadyExists(String),

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnknownCommand(_) => ErrorKind::UnknownCommand,
            Error::MalformedRequest(_) => ErrorKind::MalformedRequest,
            Error::SeriesNotFound(_) => ErrorKind::SeriesNotFound,
            Error::SeriesAlreadyExists(_) => ErrorKind::SeriesAlreadyExists,
            Error::DimensionMismatch { .. } => ErrorKind::DimensionMismatch,
            Error::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Error::Internal(_) | Error::Io(_) | Error::Serialization(_) => ErrorKind::Internal,
        }
    }
}
