//! Community calendar handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use foundry_models::{CalendarEvent, CalendarEventId};
use foundry_timeline::CalendarEventRegistration;

use crate::error::Result;
use crate::state::AppState;
use crate::types::CalendarEventListResponse;

/// GET /api/events - Approved events in the upcoming window.
pub async fn list_upcoming_events(
    State(state): State<AppState>,
) -> Result<Json<CalendarEventListResponse>> {
    let now = Utc::now();
    let events = state.calendar.upcoming(now.date_naive(), now)?;
    let total = events.len();
    Ok(Json(CalendarEventListResponse { events, total }))
}

/// POST /api/events - Register an event for approval.
pub async fn register_event(
    State(state): State<AppState>,
    Json(req): Json<CalendarEventRegistration>,
) -> Result<(StatusCode, Json<CalendarEvent>)> {
    let event = state.calendar.register(req)?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// POST /api/events/:id/approve - Publish a registered event.
pub async fn approve_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CalendarEvent>> {
    let event = state.calendar.approve(&CalendarEventId::from(id))?;
    Ok(Json(event))
}
