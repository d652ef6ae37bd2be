//! Router configuration and server setup.

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

use crate::config::ApiConfig;
use crate::handlers;
use crate::state::AppState;

fn cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if config.allows_any_origin() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(AllowOrigin::list(origins))
}

/// Creates the API router with all routes configured.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        // Health
        .route("/api/health", get(handlers::health))
        // Founder timeline
        .route(
            "/api/founder/timeline_events",
            post(handlers::submit_timeline_event),
        )
        .route(
            "/api/founder/timeline_events/:id",
            post(handlers::update_timeline_event).delete(handlers::delete_timeline_event),
        )
        .route("/api/timeline_events/:id", get(handlers::get_timeline_event))
        .route(
            "/api/startups/:id/timeline_events",
            get(handlers::list_startup_timeline_events),
        )
        // Staff
        .route(
            "/api/admin/timeline_events/:id/verify",
            post(handlers::verify_timeline_event),
        )
        .route(
            "/api/admin/timeline_events/:id/review",
            post(handlers::review_timeline_event),
        )
        .route(
            "/api/admin/timeline_events/:id/grade",
            post(handlers::grade_timeline_event),
        )
        .route(
            "/api/admin/timeline_events/:id/feedback",
            post(handlers::add_timeline_event_feedback),
        )
        .route(
            "/api/admin/timeline_events/:id/improved",
            post(handlers::mark_timeline_event_improved),
        )
        // Coach review
        .route(
            "/api/faculty/:id/review",
            get(handlers::list_reviewable_timeline_events),
        )
        // Calendar
        .route(
            "/api/events",
            get(handlers::list_upcoming_events).post(handlers::register_event),
        )
        .route("/api/events/:id/approve", post(handlers::approve_event))
        // Apply middleware
        .layer(cors)
        .with_state(state)
}

/// Starts the API server.
pub async fn serve(state: AppState) -> Result<(), std::io::Error> {
    let addr = state.config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("API server listening on {}", addr);
    axum::serve(listener, create_router(state)).await
}
