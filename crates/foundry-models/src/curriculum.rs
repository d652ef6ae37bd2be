//! Courses, levels, targets and the coaches who review against them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{
    CourseId, EvaluationCriterionId, FacultyId, FeedbackId, LevelId, StartupId, TargetId,
    TimelineEventId,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
}

/// A step within a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    pub id: LevelId,
    pub course_id: CourseId,
    pub number: u32,
    pub name: String,
}

impl Level {
    /// Short label used in review titles, e.g. `L2`.
    pub fn short_name(&self) -> String {
        format!("L{}", self.number)
    }
}

/// A graded objective that timeline events can be submitted against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,
    pub level_id: LevelId,
    pub title: String,

    /// Base points for a completed target; grades multiply this.
    pub points_earnable: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rubric_description: Option<String>,

    /// Criteria making up the target's rubric, in display order.
    #[serde(default)]
    pub evaluation_criteria: Vec<EvaluationCriterionId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationCriterion {
    pub id: EvaluationCriterionId,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Grade awarded to one timeline event against one rubric criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEventGrade {
    pub timeline_event_id: TimelineEventId,
    pub evaluation_criterion_id: EvaluationCriterionId,
    pub grade: u8,
}

/// A coach. Reviews events from the startups assigned to them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Faculty {
    pub id: FacultyId,
    pub name: String,

    #[serde(default)]
    pub startup_ids: Vec<StartupId>,
}

/// Written feedback left by a coach on a timeline event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartupFeedback {
    pub id: FeedbackId,
    pub timeline_event_id: TimelineEventId,
    pub startup_id: StartupId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faculty_id: Option<FacultyId>,

    pub feedback: String,
    pub created_at: DateTime<Utc>,
}

impl StartupFeedback {
    pub fn new(
        timeline_event_id: TimelineEventId,
        startup_id: StartupId,
        faculty_id: Option<FacultyId>,
        feedback: impl Into<String>,
    ) -> Self {
        Self {
            id: FeedbackId::new(),
            timeline_event_id,
            startup_id,
            faculty_id,
            feedback: feedback.into(),
            created_at: Utc::now(),
        }
    }
}
