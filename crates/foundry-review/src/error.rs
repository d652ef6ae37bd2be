//! Error types for the review projection.

use foundry_persistence::PersistenceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReviewError {
    /// An association the projection depends on is missing.
    #[error("{kind} not found: {id}")]
    NotFound { kind: String, id: String },

    #[error("persistence error: {0}")]
    Persistence(PersistenceError),
}

impl ReviewError {
    pub fn not_found(kind: &str, id: impl ToString) -> Self {
        ReviewError::NotFound {
            kind: kind.to_string(),
            id: id.to_string(),
        }
    }
}

impl From<PersistenceError> for ReviewError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::NotFound { kind, id } => ReviewError::NotFound { kind, id },
            other => ReviewError::Persistence(other),
        }
    }
}

/// Result type alias for review projection queries.
pub type Result<T> = std::result::Result<T, ReviewError>;
