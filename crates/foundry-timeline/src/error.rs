//! Error types for timeline workflow operations.

use foundry_models::ModelError;
use foundry_persistence::PersistenceError;
use thiserror::Error;

/// Input rejected before anything is written.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("description can't be blank")]
    MissingDescription,

    #[error("event date can't be blank")]
    MissingEventDate,

    #[error("invalid status: {0}")]
    InvalidStatus(String),

    #[error("invalid grade: {0}")]
    InvalidGrade(String),

    /// Serialized links could not be parsed.
    #[error("invalid links: {0}")]
    InvalidLinks(String),

    /// Serialized file metadata could not be parsed.
    #[error("invalid files metadata: {0}")]
    InvalidFileMetadata(String),

    /// Staff review must end in a reviewed status.
    #[error("{0} is not a review outcome")]
    InvalidReviewOutcome(String),

    #[error("feedback can't be blank")]
    MissingFeedback,

    /// The linked event is not a later event of the same owner and type.
    #[error("{0} is not an improvement of this event")]
    NotAnImprovement(String),

    #[error("invalid calendar event: {0}")]
    InvalidCalendarEvent(String),
}

impl From<ModelError> for ValidationError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::InvalidStatus(s) => ValidationError::InvalidStatus(s),
            ModelError::InvalidGrade(s) => ValidationError::InvalidGrade(s),
            ModelError::InvalidCalendarEvent(s) => ValidationError::InvalidCalendarEvent(s),
        }
    }
}

/// Errors that can occur during timeline workflow operations.
#[derive(Error, Debug)]
pub enum TimelineError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The acting founder may not perform the operation.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: String, id: String },

    /// A download or share URL could not be built.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("persistence error: {0}")]
    Persistence(PersistenceError),
}

impl TimelineError {
    pub fn not_found(kind: &str, id: impl ToString) -> Self {
        TimelineError::NotFound {
            kind: kind.to_string(),
            id: id.to_string(),
        }
    }

    pub fn permission_denied(reason: impl Into<String>) -> Self {
        TimelineError::PermissionDenied(reason.into())
    }
}

impl From<PersistenceError> for TimelineError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::NotFound { kind, id } => TimelineError::NotFound { kind, id },
            other => TimelineError::Persistence(other),
        }
    }
}

impl From<ModelError> for TimelineError {
    fn from(err: ModelError) -> Self {
        TimelineError::Validation(err.into())
    }
}

/// Result type alias for timeline workflow operations.
pub type Result<T> = std::result::Result<T, TimelineError>;
