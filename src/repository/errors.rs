//! # Repository Errors
//!
//! Business-rule outcomes (`Validation`, `NotFound`, `Forbidden`,
//! `Conflict`, `Expired`) are expected results returned to the caller.
//! `Store` wraps faults from the persistent store.

use thiserror::Error;

use crate::store::StoreError;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Record repository errors
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Input rejected before touching the store
    #[error("{0}")]
    Validation(String),

    /// No record with the requested id, email or token
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Requester does not own the record
    #[error("{0}")]
    Forbidden(String),

    /// Uniqueness constraint violated
    #[error("{0}")]
    Conflict(String),

    /// Refresh token found but past its expiry
    #[error("Refresh token expired")]
    Expired,

    /// Store read or write failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RepositoryError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            RepositoryError::Validation(_) => 400,
            RepositoryError::Expired => 401,
            RepositoryError::Forbidden(_) => 403,
            RepositoryError::NotFound(_) => 404,
            RepositoryError::Conflict(_) => 409,
            RepositoryError::Store(_) => 500,
        }
    }

    /// Client errors are normal outcomes and are not logged as failures
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}
