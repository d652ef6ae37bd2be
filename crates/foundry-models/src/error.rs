//! Errors raised when parsing model values from untrusted text.

use thiserror::Error;

/// Errors for values that fall outside a model enumeration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Status text is not one of the known timeline event statuses.
    #[error("invalid status: {0}")]
    InvalidStatus(String),

    /// Grade text is not one of good, great or wow.
    #[error("invalid grade: {0}")]
    InvalidGrade(String),

    /// Calendar event failed validation.
    #[error("invalid calendar event: {0}")]
    InvalidCalendarEvent(String),
}
