//! Staff handlers: verification, review, grading, feedback and improvement links.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use foundry_models::{Grade, StartupFeedback, TimelineEvent, TimelineEventId, TimelineEventStatus};
use foundry_timeline::ValidationError;

use crate::error::Result;
use crate::identity::CurrentFaculty;
use crate::state::AppState;
use crate::types::{FeedbackRequest, GradeRequest, ImprovedEventRequest, ReviewRequest};

/// POST /api/admin/timeline_events/:id/verify - Verify a timeline event.
pub async fn verify_timeline_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TimelineEvent>> {
    let event = state.workflow.verify(&TimelineEventId::from(id))?;
    Ok(Json(event))
}

/// POST /api/admin/timeline_events/:id/review - Record a review outcome.
pub async fn review_timeline_event(
    State(state): State<AppState>,
    CurrentFaculty(faculty_id): CurrentFaculty,
    Path(id): Path<String>,
    Json(req): Json<ReviewRequest>,
) -> Result<Json<TimelineEvent>> {
    let outcome: TimelineEventStatus = req.status.parse().map_err(ValidationError::from)?;
    let feedback = req
        .feedback
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty());

    let event = state.workflow.review(
        &TimelineEventId::from(id),
        outcome,
        faculty_id.as_ref(),
        feedback,
    )?;
    Ok(Json(event))
}

/// POST /api/admin/timeline_events/:id/grade - Grade a timeline event.
pub async fn grade_timeline_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<GradeRequest>,
) -> Result<Json<TimelineEvent>> {
    let grade: Option<Grade> = req
        .grade
        .as_deref()
        .map(str::parse)
        .transpose()
        .map_err(ValidationError::from)?;

    let event = state
        .workflow
        .grade(&TimelineEventId::from(id), grade, &req.criteria)?;
    Ok(Json(event))
}

/// POST /api/admin/timeline_events/:id/feedback - Leave feedback.
pub async fn add_timeline_event_feedback(
    State(state): State<AppState>,
    CurrentFaculty(faculty_id): CurrentFaculty,
    Path(id): Path<String>,
    Json(req): Json<FeedbackRequest>,
) -> Result<(StatusCode, Json<StartupFeedback>)> {
    let feedback = state.workflow.add_feedback(
        &TimelineEventId::from(id),
        faculty_id.as_ref(),
        &req.feedback,
    )?;
    Ok((StatusCode::CREATED, Json(feedback)))
}

/// POST /api/admin/timeline_events/:id/improved - Link the superseding event.
pub async fn mark_timeline_event_improved(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ImprovedEventRequest>,
) -> Result<Json<TimelineEvent>> {
    let event = state
        .workflow
        .mark_improved(&TimelineEventId::from(id), req.improved_timeline_event_id.as_ref())?;
    Ok(Json(event))
}
