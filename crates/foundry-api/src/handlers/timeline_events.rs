//! Founder-facing timeline event handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::debug;

use foundry_models::{StartupId, TimelineEvent, TimelineEventId};
use foundry_timeline::{TimelineEventDetail, TimelineEventFilter};

use crate::error::Result;
use crate::identity::{CurrentFounder, Viewer};
use crate::state::AppState;
use crate::types::{
    SubmitTimelineEventRequest, SuccessResponse, TimelineEventListQuery, TimelineEventListResponse,
    UpdateTimelineEventRequest,
};

/// POST /api/founder/timeline_events - Submit a new timeline event.
pub async fn submit_timeline_event(
    State(state): State<AppState>,
    CurrentFounder(founder_id): CurrentFounder,
    Json(req): Json<SubmitTimelineEventRequest>,
) -> Result<(StatusCode, Json<TimelineEvent>)> {
    let (submission, uploads) = req.into_submission()?;
    let event = state.workflow.submit(&founder_id, submission, &uploads)?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// POST /api/founder/timeline_events/:id - Edit a timeline event.
pub async fn update_timeline_event(
    State(state): State<AppState>,
    CurrentFounder(founder_id): CurrentFounder,
    Path(id): Path<String>,
    Json(req): Json<UpdateTimelineEventRequest>,
) -> Result<Json<TimelineEvent>> {
    let (changes, uploads) = req.into_changes()?;
    let event = state
        .workflow
        .update(&founder_id, &TimelineEventId::from(id), changes, &uploads)?;
    Ok(Json(event))
}

/// DELETE /api/founder/timeline_events/:id - Delete a timeline event.
pub async fn delete_timeline_event(
    State(state): State<AppState>,
    CurrentFounder(founder_id): CurrentFounder,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>> {
    state
        .workflow
        .delete(&founder_id, &TimelineEventId::from(id))?;
    Ok(Json(SuccessResponse {
        message: "timeline event deleted".to_string(),
    }))
}

/// GET /api/timeline_events/:id - Get a timeline event as the viewer sees it.
pub async fn get_timeline_event(
    State(state): State<AppState>,
    Viewer(viewer): Viewer,
    Path(id): Path<String>,
) -> Result<Json<TimelineEventDetail>> {
    let detail = state
        .workflow
        .detail(&TimelineEventId::from(id), viewer.as_ref())?;
    Ok(Json(detail))
}

/// GET /api/startups/:id/timeline_events - List a startup's visible events.
pub async fn list_startup_timeline_events(
    State(state): State<AppState>,
    Viewer(viewer): Viewer,
    Path(id): Path<String>,
    Query(query): Query<TimelineEventListQuery>,
) -> Result<Json<TimelineEventListResponse>> {
    let mut filter = TimelineEventFilter::new().with_startup_id(StartupId::from(id));
    if let Some(status) = query.status()? {
        filter = filter.with_status(status);
    }
    if let Some(ref event_type_id) = query.event_type_id {
        filter = filter.with_event_type_id(event_type_id.as_str().into());
    }

    let events = state.workflow.list(&filter, viewer.as_ref(), query.limit)?;
    debug!(count = events.len(), "listed timeline events");
    let total = events.len();

    Ok(Json(TimelineEventListResponse {
        timeline_events: events,
        total,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::handlers::fixtures::world;
    use chrono::NaiveDate;
    use foundry_models::TimelineEventStatus;

    fn submit_request(event_type_id: &str, description: &str) -> SubmitTimelineEventRequest {
        SubmitTimelineEventRequest {
            event_type_id: event_type_id.to_string(),
            description: description.to_string(),
            event_on: NaiveDate::from_ymd_opt(2024, 4, 2),
            serialized_links: None,
            files_metadata: None,
            files: Default::default(),
            target_id: None,
            image: None,
        }
    }

    #[tokio::test]
    async fn test_submit_creates_pending_event() {
        let w = world();
        let (status, Json(event)) = submit_timeline_event(
            State(w.state.clone()),
            CurrentFounder(w.founder_id.clone()),
            Json(submit_request(w.product_type.as_str(), "Met ten customers")),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(event.status, TimelineEventStatus::Pending);
        assert_eq!(event.startup_id, w.startup_id);
    }

    #[tokio::test]
    async fn test_submit_blank_description_unprocessable() {
        let w = world();
        let result = submit_timeline_event(
            State(w.state.clone()),
            CurrentFounder(w.founder_id.clone()),
            Json(submit_request(w.product_type.as_str(), "  ")),
        )
        .await;

        assert!(matches!(result, Err(ApiError::Unprocessable(_))));
    }

    #[tokio::test]
    async fn test_personal_event_hidden_from_cofounder() {
        let w = world();
        let (_, Json(event)) = submit_timeline_event(
            State(w.state.clone()),
            CurrentFounder(w.founder_id.clone()),
            Json(submit_request(w.personal_type.as_str(), "Finished a course")),
        )
        .await
        .unwrap();

        let hidden = get_timeline_event(
            State(w.state.clone()),
            Viewer(Some(w.cofounder_id.clone())),
            Path(event.id.to_string()),
        )
        .await;
        assert!(matches!(hidden, Err(ApiError::NotFound(_))));

        let Json(detail) = get_timeline_event(
            State(w.state.clone()),
            Viewer(Some(w.founder_id.clone())),
            Path(event.id.to_string()),
        )
        .await
        .unwrap();
        assert_eq!(detail.event.id, event.id);
    }

    #[tokio::test]
    async fn test_list_filters_by_status() {
        let w = world();
        w.state.workflow.verify(&w.event_id).unwrap();

        let Json(verified) = list_startup_timeline_events(
            State(w.state.clone()),
            Viewer(None),
            Path(w.startup_id.to_string()),
            Query(TimelineEventListQuery {
                status: Some("verified".into()),
                ..Default::default()
            }),
        )
        .await
        .unwrap();
        assert_eq!(verified.total, 1);

        let Json(pending) = list_startup_timeline_events(
            State(w.state.clone()),
            Viewer(None),
            Path(w.startup_id.to_string()),
            Query(TimelineEventListQuery {
                status: Some("pending".into()),
                ..Default::default()
            }),
        )
        .await
        .unwrap();
        assert_eq!(pending.total, 0);
    }

    #[tokio::test]
    async fn test_delete_with_feedback_forbidden() {
        let w = world();
        w.state
            .workflow
            .add_feedback(&w.event_id, Some(&w.faculty_id), "Nice work")
            .unwrap();

        let result = delete_timeline_event(
            State(w.state.clone()),
            CurrentFounder(w.founder_id.clone()),
            Path(w.event_id.to_string()),
        )
        .await;

        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }
}
