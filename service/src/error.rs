use std::fmt::{Display, Formatter, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    DbError(String),
    NotFound(String),
    PipelineActive(String),
    CloudStorageError(String),
    PipelineStateError(String),
    IoError(String),
    InvalidInput(String),
}

impl Error {
    /// Errors that end a deletion with a `failed` result instead of propagating.
    pub fn is_request_failure(&self) -> bool {
        matches!(
            self,
            Error::NotFound(_) | Error::PipelineActive(_) | Error::InvalidInput(_)
        )
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Error::DbError(message) => write!(f, "Database error: {}", message),
            Error::NotFound(message) => write!(f, "Not found: {}", message),
            Error::PipelineActive(message) => write!(f, "Pipeline active: {}", message),
            Error::CloudStorageError(message) => write!(f, "Cloud storage error: {}", message),
            Error::PipelineStateError(message) => write!(f, "Pipeline state error: {}", message),
            Error::IoError(message) => write!(f, "IO error: {}", message),
            Error::InvalidInput(message) => write!(f, "Invalid input: {}", message),
        }
    }
}

impl std::error::Error for Error {}

impl From<database::database_error::DatabaseError> for Error {
    fn from(err: database::database_error::DatabaseError) -> Self {
        Error::DbError(err.to_string())
    }
}

impl From<cloud_storage::CloudStorageError> for Error {
    fn from(err: cloud_storage::CloudStorageError) -> Self {
        Error::CloudStorageError(err.to_string())
    }
}

impl From<pipeline_state::PipelineStateError> for Error {
    fn from(err: pipeline_state::PipelineStateError) -> Self {
        Error::PipelineStateError(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err.to_string())
    }
}
