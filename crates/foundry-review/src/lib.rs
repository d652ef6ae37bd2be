//! Review projection for Foundry coaches.
//!
//! Builds the denormalized list of timeline events a coach reviews for a
//! course. The projection is read-only.

pub mod error;
pub mod projection;

pub use error::{ReviewError, Result};
pub use projection::{
    CriterionEvaluation, FileSummary, ReviewRecord, ReviewableTimelineEvents, REVIEW_LIMIT,
};
