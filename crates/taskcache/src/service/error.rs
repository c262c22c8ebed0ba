use thiserror::Error;
use uuid::Uuid;

use taskcache_core::cache::CacheError;
use taskcache_core::storage::RepositoryError;
use taskcache_core::todo::DecodeError;

/// Errors surfaced by `TodoService` operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Todo not found: {id}")]
    NotFound { id: String },
    #[error("Stored todo is corrupt: {0}")]
    Decode(#[from] DecodeError),
    #[error("Invalid request: {0}")]
    Validation(String),
    /// Cache or store unavailable. Not retried internally.
    #[error("Temporarily unavailable: {0}")]
    Transient(String),
}

impl ServiceError {
    pub fn not_found(id: Uuid) -> Self {
        ServiceError::NotFound { id: id.to_string() }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, ServiceError::Transient(_))
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { id, .. } => ServiceError::NotFound { id },
            RepositoryError::InvalidData(msg) => ServiceError::Validation(msg),
            RepositoryError::ConnectionFailed(msg) | RepositoryError::QueryFailed(msg) => {
                ServiceError::Transient(format!("store: {msg}"))
            }
        }
    }
}

impl From<CacheError> for ServiceError {
    fn from(err: CacheError) -> Self {
        ServiceError::Transient(format!("cache: {err}"))
    }
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
