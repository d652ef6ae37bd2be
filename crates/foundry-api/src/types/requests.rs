//! Request DTOs for the API.
//!
//! Links and file metadata travel as JSON text, the way the timeline
//! builder form posts them; uploads are a map from identifier to content
//! reference.

use chrono::NaiveDate;
use serde::Deserialize;

use foundry_models::{parse_links, FileMetadata, Link, TimelineEventId, TimelineEventStatus};
use foundry_timeline::{CriterionGrade, TimelineEventChanges, TimelineEventSubmission, Uploads, ValidationError};

use crate::error::{ApiError, Result};

fn links_from(text: Option<&str>) -> std::result::Result<Option<Vec<Link>>, ValidationError> {
    text.map(parse_links)
        .transpose()
        .map_err(|e| ValidationError::InvalidLinks(e.to_string()))
}

fn files_from(text: Option<&str>) -> std::result::Result<Vec<FileMetadata>, ValidationError> {
    match text.map(str::trim) {
        None | Some("") => Ok(Vec::new()),
        Some(text) => serde_json::from_str(text)
            .map_err(|e| ValidationError::InvalidFileMetadata(e.to_string())),
    }
}

/// Submit timeline event request.
///
/// Review fields are not accepted here; unknown keys such as `status` or
/// `grade` are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitTimelineEventRequest {
    pub event_type_id: String,
    #[serde(default)]
    pub description: String,
    pub event_on: Option<NaiveDate>,
    /// JSON array of links.
    pub serialized_links: Option<String>,
    /// JSON array of file metadata entries.
    pub files_metadata: Option<String>,
    #[serde(default)]
    pub files: Uploads,
    pub target_id: Option<String>,
    pub image: Option<String>,
}

impl SubmitTimelineEventRequest {
    pub fn into_submission(self) -> std::result::Result<(TimelineEventSubmission, Uploads), ValidationError> {
        let mut submission =
            TimelineEventSubmission::new(self.event_type_id, self.description, self.event_on);
        submission.links = links_from(self.serialized_links.as_deref())?;
        submission.files = files_from(self.files_metadata.as_deref())?;
        submission.target_id = self.target_id.map(Into::into);
        submission.image = self.image;
        Ok((submission, self.files))
    }
}

/// Update timeline event request. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTimelineEventRequest {
    pub event_type_id: Option<String>,
    pub description: Option<String>,
    pub event_on: Option<NaiveDate>,
    pub serialized_links: Option<String>,
    pub files_metadata: Option<String>,
    #[serde(default)]
    pub files: Uploads,
    pub image: Option<String>,
}

impl UpdateTimelineEventRequest {
    pub fn into_changes(self) -> std::result::Result<(TimelineEventChanges, Uploads), ValidationError> {
        let changes = TimelineEventChanges {
            event_type_id: self.event_type_id.map(Into::into),
            description: self.description,
            event_on: self.event_on,
            links: links_from(self.serialized_links.as_deref())?,
            image: self.image,
            files: files_from(self.files_metadata.as_deref())?,
        };
        Ok((changes, self.files))
    }
}

/// Timeline event list query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimelineEventListQuery {
    /// Filter by status.
    pub status: Option<String>,
    /// Filter by event type.
    pub event_type_id: Option<String>,
    /// Maximum number of events to return.
    pub limit: Option<usize>,
}

impl TimelineEventListQuery {
    pub fn status(&self) -> Result<Option<TimelineEventStatus>> {
        self.status
            .as_deref()
            .map(|s| {
                s.parse()
                    .map_err(|_| ApiError::BadRequest(format!("invalid status: {}", s)))
            })
            .transpose()
    }
}

/// Staff review request.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewRequest {
    pub status: String,
    pub feedback: Option<String>,
}

/// Grade request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GradeRequest {
    pub grade: Option<String>,
    #[serde(default)]
    pub criteria: Vec<CriterionGrade>,
}

/// Links an event to the later event that supersedes it; `null` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImprovedEventRequest {
    pub improved_timeline_event_id: Option<TimelineEventId>,
}

/// Feedback request.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackRequest {
    pub feedback: String,
}

/// Review projection query parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewQuery {
    pub course_id: String,
}
