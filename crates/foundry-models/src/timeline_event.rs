//! Timeline events: founder progress updates reviewed by staff.
//!
//! An event moves between four review states. Founders submit into
//! `Pending`; staff move it to `Verified`, `NeedsImprovement` or
//! `NotAccepted`; any founder edit sends it back to `Pending`.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::curriculum::Target;
use crate::error::ModelError;
use crate::event_type::TimelineEventType;
use crate::ids::{
    FounderId, StartupId, TargetId, TimelineEventFileId, TimelineEventId, TimelineEventTypeId,
};

/// Review state of a timeline event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TimelineEventStatus {
    /// Awaiting review.
    #[default]
    Pending,
    /// Accepted by staff.
    Verified,
    /// Reviewed, founder asked to improve.
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
    /// Rejected by staff.
    #[serde(rename = "Not Accepted")]
    NotAccepted,
}

impl TimelineEventStatus {
    pub const ALL: [TimelineEventStatus; 4] = [
        TimelineEventStatus::Verified,
        TimelineEventStatus::Pending,
        TimelineEventStatus::NeedsImprovement,
        TimelineEventStatus::NotAccepted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimelineEventStatus::Pending => "Pending",
            TimelineEventStatus::Verified => "Verified",
            TimelineEventStatus::NeedsImprovement => "Needs Improvement",
            TimelineEventStatus::NotAccepted => "Not Accepted",
        }
    }

    /// Verified and needs-improvement events have been reviewed and are
    /// locked against founder edits.
    pub fn is_reviewed(&self) -> bool {
        matches!(
            self,
            TimelineEventStatus::Verified | TimelineEventStatus::NeedsImprovement
        )
    }
}

impl fmt::Display for TimelineEventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimelineEventStatus {
    type Err = ModelError;

    /// Accepts the display form ("Needs Improvement") as well as
    /// snake_case ("needs_improvement"), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "pending" => Ok(TimelineEventStatus::Pending),
            "verified" => Ok(TimelineEventStatus::Verified),
            "needs improvement" => Ok(TimelineEventStatus::NeedsImprovement),
            "not accepted" => Ok(TimelineEventStatus::NotAccepted),
            _ => Err(ModelError::InvalidStatus(s.to_string())),
        }
    }
}

/// Qualitative grade that multiplies a target's base points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    Good,
    Great,
    Wow,
}

impl Grade {
    pub const ALL: [Grade; 3] = [Grade::Good, Grade::Great, Grade::Wow];

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::Good => "good",
            Grade::Great => "great",
            Grade::Wow => "wow",
        }
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            Grade::Good => 1.0,
            Grade::Great => 1.5,
            Grade::Wow => 2.0,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grade {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "good" => Ok(Grade::Good),
            "great" => Ok(Grade::Great),
            "wow" => Ok(Grade::Wow),
            _ => Err(ModelError::InvalidGrade(s.to_string())),
        }
    }
}

/// A link attached to a timeline event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub url: String,
    #[serde(default)]
    pub private: bool,
}

impl Link {
    pub fn public(url: impl Into<String>) -> Self {
        Self {
            title: None,
            url: url.into(),
            private: false,
        }
    }

    pub fn private(url: impl Into<String>) -> Self {
        Self {
            title: None,
            url: url.into(),
            private: true,
        }
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Serializes links to the JSON text used by edit forms.
pub fn serialize_links(links: &[Link]) -> Result<String, serde_json::Error> {
    serde_json::to_string(links)
}

/// Parses links from the JSON text used by edit forms.
pub fn parse_links(text: &str) -> Result<Vec<Link>, serde_json::Error> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(text)
}

/// A file attached to a timeline event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEventFile {
    pub id: TimelineEventFileId,
    pub timeline_event_id: TimelineEventId,
    pub title: String,

    #[serde(default)]
    pub private: bool,

    /// Opaque reference to the stored binary content.
    pub content_ref: String,

    pub created_at: DateTime<Utc>,
}

impl TimelineEventFile {
    pub fn new(
        timeline_event_id: TimelineEventId,
        title: impl Into<String>,
        private: bool,
        content_ref: impl Into<String>,
    ) -> Self {
        Self {
            id: TimelineEventFileId::new(),
            timeline_event_id,
            title: title.into(),
            private,
            content_ref: content_ref.into(),
            created_at: Utc::now(),
        }
    }
}

/// One entry of the file-edit list sent by the timeline builder form.
///
/// For persisted files `identifier` is the file id; for new files it is
/// the key of the matching upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub identifier: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default)]
    pub private: bool,

    #[serde(default)]
    pub persisted: bool,

    #[serde(default)]
    pub delete: bool,
}

impl FileMetadata {
    /// Describes a file that already exists.
    pub fn persisted(file: &TimelineEventFile) -> Self {
        Self {
            identifier: file.id.to_string(),
            title: Some(file.title.clone()),
            private: file.private,
            persisted: true,
            delete: false,
        }
    }

    /// Requests creation of a new file from the upload keyed by `identifier`.
    pub fn new_file(identifier: impl Into<String>, title: impl Into<String>, private: bool) -> Self {
        Self {
            identifier: identifier.into(),
            title: Some(title.into()),
            private,
            persisted: false,
            delete: false,
        }
    }

    /// Requests deletion of a persisted file.
    pub fn delete(file_id: &TimelineEventFileId) -> Self {
        Self {
            identifier: file_id.to_string(),
            title: None,
            private: false,
            persisted: true,
            delete: true,
        }
    }
}

/// Renders the metadata list the edit form is seeded with.
pub fn files_metadata_json(files: &[&TimelineEventFile]) -> Result<String, serde_json::Error> {
    let metadata: Vec<FileMetadata> = files.iter().map(|f| FileMetadata::persisted(f)).collect();
    serde_json::to_string(&metadata)
}

/// An attachment as presented to a viewer: a file or a link.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Attachment {
    File {
        id: TimelineEventFileId,
        title: String,
        private: bool,
        url: String,
    },
    Link(Link),
}

impl Attachment {
    pub fn is_private(&self) -> bool {
        match self {
            Attachment::File { private, .. } => *private,
            Attachment::Link(link) => link.private,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Attachment::File { url, .. } => url,
            Attachment::Link(link) => &link.url,
        }
    }
}

/// Who a timeline event belongs to, resolved from its type's scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum EventOwner {
    Founder(FounderId),
    Startup(StartupId),
}

/// A founder- or startup-scoped progress submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub id: TimelineEventId,
    pub startup_id: StartupId,

    /// The founder who submitted the event.
    pub founder_id: FounderId,

    /// Founders credited with the event. Always contains the submitter.
    #[serde(default)]
    pub owner_ids: Vec<FounderId>,

    pub event_type_id: TimelineEventTypeId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<TargetId>,

    pub description: String,
    pub event_on: NaiveDate,

    #[serde(default)]
    pub status: TimelineEventStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<Grade>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_updated_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub links: Vec<Link>,

    /// URL of the processed cover image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// A later event that supersedes this one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub improved_timeline_event_id: Option<TimelineEventId>,

    /// Events verified by the system rather than staff never reach review.
    #[serde(default)]
    pub auto_verified: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TimelineEvent {
    /// Creates a pending event with no links.
    pub fn new(
        startup_id: StartupId,
        founder_id: FounderId,
        event_type_id: TimelineEventTypeId,
        description: impl Into<String>,
        event_on: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TimelineEventId::new(),
            startup_id,
            owner_ids: vec![founder_id.clone()],
            founder_id,
            event_type_id,
            target_id: None,
            description: description.into(),
            event_on,
            status: TimelineEventStatus::Pending,
            grade: None,
            status_updated_at: None,
            links: Vec::new(),
            image: None,
            improved_timeline_event_id: None,
            auto_verified: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Moves the event to `status` and stamps the transition time.
    pub fn transition_to(&mut self, status: TimelineEventStatus) {
        let now = Utc::now();
        self.status = status;
        self.status_updated_at = Some(now);
        self.updated_at = now;
    }

    pub fn is_pending(&self) -> bool {
        self.status == TimelineEventStatus::Pending
    }

    pub fn is_verified(&self) -> bool {
        self.status == TimelineEventStatus::Verified
    }

    pub fn needs_improvement(&self) -> bool {
        self.status == TimelineEventStatus::NeedsImprovement
    }

    pub fn not_accepted(&self) -> bool {
        self.status == TimelineEventStatus::NotAccepted
    }

    pub fn verified_or_needs_improvement(&self) -> bool {
        self.status.is_reviewed()
    }

    /// Founders may edit events that are not end-of-iteration and have not
    /// been reviewed.
    pub fn founder_can_modify(&self, event_type: &TimelineEventType) -> bool {
        if event_type.end_iteration() {
            return false;
        }
        !self.verified_or_needs_improvement()
    }

    /// Founders may delete unreviewed events that carry no feedback.
    pub fn founder_can_delete(&self, has_feedback: bool) -> bool {
        !(self.verified_or_needs_improvement() || has_feedback)
    }

    /// Returns true if at least one link is public.
    pub fn has_public_link(&self) -> bool {
        self.links.iter().any(|l| !l.private)
    }

    /// Founder-scoped events are shown only to the founder who submitted them.
    pub fn hidden_from(&self, event_type: &TimelineEventType, viewer: Option<&FounderId>) -> bool {
        if !event_type.founder_event() {
            return false;
        }
        match viewer {
            None => true,
            Some(viewer) => *viewer != self.founder_id,
        }
    }

    pub fn owner(&self, event_type: &TimelineEventType) -> EventOwner {
        if event_type.founder_event() {
            EventOwner::Founder(self.founder_id.clone())
        } else {
            EventOwner::Startup(self.startup_id.clone())
        }
    }

    /// Points earned for this event, or `None` when it has no target.
    pub fn points_for_grade(&self, target: Option<&Target>) -> Option<f64> {
        let minimum = f64::from(target?.points_earnable);
        match self.grade {
            None => Some(minimum),
            Some(grade) => Some(minimum * grade.multiplier()),
        }
    }

    pub fn first_link_url(&self) -> Option<&str> {
        self.links.first().map(|l| l.url.as_str())
    }

    pub fn serialized_links(&self) -> Result<String, serde_json::Error> {
        serialize_links(&self.links)
    }

    /// Replaces links from their serialized form.
    pub fn set_serialized_links(&mut self, text: &str) -> Result<(), serde_json::Error> {
        self.links = parse_links(text)?;
        Ok(())
    }

    /// Path of the public page for this event, relative to the site root.
    pub fn share_path(&self, startup_slug: &str, event_type_title: &str) -> String {
        format!(
            "startups/{}/{}-{}",
            startup_slug,
            parameterize(event_type_title),
            self.id
        )
    }
}

/// Lowercases and joins alphanumeric runs with dashes.
pub fn parameterize(text: &str) -> String {
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();
    let re = SEPARATORS.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("Invalid regex pattern"));
    re.replace_all(&text.to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}
