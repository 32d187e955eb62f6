use thiserror::Error;

use crate::repository::errors::RepositoryError;

pub mod customers;
pub mod dashboard;
pub mod loyalty;
pub mod orders;
pub mod products;

/// Errors surfaced by service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A submitted form failed validation or conversion.
    #[error("invalid form data: {0}")]
    Form(String),
    #[error("record not found")]
    NotFound,
    #[error("conflicting record: {0}")]
    Conflict(String),
    /// Storage failure that is neither a lookup miss nor a conflict.
    #[error(transparent)]
    Repository(RepositoryError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound,
            RepositoryError::Conflict(message) => Self::Conflict(message),
            other => Self::Repository(other),
        }
    }
}
