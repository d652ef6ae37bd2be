//! Inputs accepted by the workflow from founders and staff.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use foundry_models::{
    EvaluationCriterionId, FileMetadata, Link, TargetId, TimelineEventType, TimelineEventTypeId,
};

use crate::error::ValidationError;

/// Uploaded content keyed by the identifier used in file metadata.
///
/// Values are opaque content references produced by the upload store.
pub type Uploads = HashMap<String, String>;

/// A new timeline event as entered by a founder.
///
/// Review state is not part of a submission; every submitted event starts
/// out `Pending`.
#[derive(Debug, Clone)]
pub struct TimelineEventSubmission {
    pub event_type_id: TimelineEventTypeId,
    pub description: String,
    pub event_on: Option<NaiveDate>,
    /// `None` when the form omitted links entirely.
    pub links: Option<Vec<Link>>,
    pub files: Vec<FileMetadata>,
    pub target_id: Option<TargetId>,
    pub image: Option<String>,
    /// Set for events generated by the system rather than typed in.
    pub auto_populated: bool,
}

impl TimelineEventSubmission {
    pub fn new(
        event_type_id: impl Into<TimelineEventTypeId>,
        description: impl Into<String>,
        event_on: Option<NaiveDate>,
    ) -> Self {
        Self {
            event_type_id: event_type_id.into(),
            description: description.into(),
            event_on,
            links: None,
            files: Vec::new(),
            target_id: None,
            image: None,
            auto_populated: false,
        }
    }

    pub fn with_links(mut self, links: Vec<Link>) -> Self {
        self.links = Some(links);
        self
    }

    pub fn with_file(mut self, file: FileMetadata) -> Self {
        self.files.push(file);
        self
    }

    pub fn with_target(mut self, target_id: impl Into<TargetId>) -> Self {
        self.target_id = Some(target_id.into());
        self
    }

    pub fn auto_populated(mut self) -> Self {
        self.auto_populated = true;
        self
    }

    /// Applies the description template and checks required fields.
    pub(crate) fn validate(
        &self,
        event_type: &TimelineEventType,
    ) -> Result<ValidatedSubmission, ValidationError> {
        let mut description = self.description.clone();
        if description.trim().is_empty() && self.auto_populated {
            if let Some(template) = event_type.description_template() {
                description = template.to_string();
            }
        }
        if description.trim().is_empty() {
            return Err(ValidationError::MissingDescription);
        }

        let event_on = self.event_on.ok_or(ValidationError::MissingEventDate)?;

        Ok(ValidatedSubmission {
            description,
            event_on,
        })
    }
}

pub(crate) struct ValidatedSubmission {
    pub description: String,
    pub event_on: NaiveDate,
}

/// Fields a founder may change on an existing event. `None` leaves a
/// field as it is.
#[derive(Debug, Clone, Default)]
pub struct TimelineEventChanges {
    pub event_type_id: Option<TimelineEventTypeId>,
    pub description: Option<String>,
    pub event_on: Option<NaiveDate>,
    pub links: Option<Vec<Link>>,
    pub image: Option<String>,
    pub files: Vec<FileMetadata>,
}

impl TimelineEventChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn event_on(mut self, event_on: NaiveDate) -> Self {
        self.event_on = Some(event_on);
        self
    }

    pub fn links(mut self, links: Vec<Link>) -> Self {
        self.links = Some(links);
        self
    }

    pub fn file(mut self, file: FileMetadata) -> Self {
        self.files.push(file);
        self
    }
}

/// Grade awarded against one criterion of a target's rubric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionGrade {
    pub criterion_id: EvaluationCriterionId,
    pub grade: u8,
}
