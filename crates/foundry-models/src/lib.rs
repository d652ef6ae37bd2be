//! Core data models for Foundry.
//!
//! This crate provides the fundamental data types used throughout the
//! Foundry system: founders and startups, the curriculum they progress
//! through, timeline events and their attachments, and calendar events.

pub mod builders;
pub mod calendar;
pub mod curriculum;
pub mod error;
pub mod event_type;
pub mod founder;
pub mod ids;
pub mod timeline_event;

// Re-export main types
pub use builders::TimelineEventBuilder;
pub use calendar::{CalendarEvent, UPCOMING_WINDOW_DAYS};
pub use curriculum::{
    Course, EvaluationCriterion, Faculty, Level, StartupFeedback, Target, TimelineEventGrade,
};
pub use error::ModelError;
pub use event_type::{
    EventTypeRole, TimelineEventType, KEY_END_ITERATION, KEY_JOINED, KEY_NEW_DECK, KEY_NEW_PROTOTYPE,
    KEY_NEW_VIDEO, KEY_NEW_WIREFRAME,
};
pub use founder::{Batch, Founder, FounderRole, Startup, StartupLinkField};
pub use ids::{
    BatchId, CalendarEventId, CourseId, EvaluationCriterionId, FacultyId, FeedbackId, FounderId,
    LevelId, StartupId, TargetId, TimelineEventFileId, TimelineEventId, TimelineEventTypeId,
};
pub use timeline_event::{
    files_metadata_json, parameterize, parse_links, serialize_links, Attachment, EventOwner,
    FileMetadata, Grade, Link, TimelineEvent, TimelineEventFile, TimelineEventStatus,
};
