//! Use-case error shared by all services.
//!
//! Callers at the presentation boundary map [`ErrorKind`] to their own
//! status codes; the core never formats transport responses.

use crate::model::validation::ValidationError;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Transport-neutral classification of a [`ServiceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    InvalidOperation,
    Unauthorized,
    Forbidden,
    Validation,
    Unavailable,
    Internal,
}

impl ErrorKind {
    /// Only storage contention is worth retrying unchanged.
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Unavailable)
    }
}

#[derive(Debug)]
pub enum ServiceError {
    /// Referenced entity does not exist.
    NotFound { entity: &'static str, key: String },
    /// Uniqueness violation that could not be resolved.
    Conflict(String),
    /// Semantically disallowed action, e.g. following oneself.
    InvalidOperation(String),
    /// Operation requires an authenticated viewer.
    Unauthorized,
    /// Viewer is authenticated but does not own the target.
    Forbidden(String),
    Validation(ValidationError),
    /// Storage stayed locked past its timeout; safe to retry.
    Unavailable(RepoError),
    /// Any other persistence failure.
    Repo(RepoError),
}

impl ServiceError {
    pub(crate) fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::InvalidOperation(_) => ErrorKind::InvalidOperation,
            Self::Unauthorized => ErrorKind::Unauthorized,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Unavailable(_) => ErrorKind::Unavailable,
            Self::Repo(_) => ErrorKind::Internal,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { entity, key } => write!(f, "{entity} not found: {key}"),
            Self::Conflict(what) => write!(f, "conflict: {what} already exists"),
            Self::InvalidOperation(message) => write!(f, "invalid operation: {message}"),
            Self::Unauthorized => write!(f, "authentication required"),
            Self::Forbidden(message) => write!(f, "forbidden: {message}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Unavailable(err) => write!(f, "temporarily unavailable: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Unavailable(err) | Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity, key } => Self::NotFound { entity, key },
            RepoError::Conflict { constraint } => Self::Conflict(constraint),
            RepoError::Validation(err) => Self::Validation(err),
            busy @ RepoError::Busy(_) => Self::Unavailable(busy),
            other => Self::Repo(other),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}
