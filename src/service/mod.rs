/// Business-rule layer
///
/// Services coordinate between the HTTP handlers, the storage trait, and
/// the text-generation provider. All operations return explicit typed
/// errors; the HTTP layer maps them to status codes.

pub mod habits;
pub mod suggestions;

pub use habits::*;
pub use suggestions::*;

use thiserror::Error;

use crate::domain::DomainError;
use crate::provider::ProviderError;
use crate::storage::StorageError;

/// Errors that can come out of a service operation
#[derive(Error, Debug)]
pub enum ServiceError {
    /// A required field is missing or fails validation (-> 400)
    #[error("{0}")]
    InvalidInput(String),

    /// The referenced habit does not exist (-> 404)
    #[error("Habit not found: {0}")]
    NotFound(String),

    /// The AI feature is not configured on this server (-> 503)
    #[error("{0}")]
    Unavailable(String),

    /// Unexpected persistence failure (-> 500)
    #[error("Storage error: {0}")]
    Storage(StorageError),

    /// Unexpected provider failure (-> 500)
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::HabitNotFound { habit_id } => ServiceError::NotFound(habit_id),
            other => ServiceError::Storage(other),
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        ServiceError::InvalidInput(err.to_string())
    }
}
