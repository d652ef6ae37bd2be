//! Coach review handler.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use foundry_models::{CourseId, FacultyId};

use crate::error::Result;
use crate::state::AppState;
use crate::types::{ReviewListResponse, ReviewQuery};

/// GET /api/faculty/:id/review?course_id= - Events awaiting a coach.
pub async fn list_reviewable_timeline_events(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ReviewQuery>,
) -> Result<Json<ReviewListResponse>> {
    let records = state
        .review
        .timeline_events(&FacultyId::from(id), &CourseId::from(query.course_id))?;
    let total = records.len();

    Ok(Json(ReviewListResponse {
        timeline_events: records,
        total,
    }))
}
