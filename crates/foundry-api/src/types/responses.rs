//! Response DTOs for the API.

use serde::Serialize;

use foundry_models::{CalendarEvent, TimelineEvent};
use foundry_review::ReviewRecord;

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Uptime in seconds.
    pub uptime_seconds: u64,
}

/// Timeline event list response.
#[derive(Debug, Clone, Serialize)]
pub struct TimelineEventListResponse {
    pub timeline_events: Vec<TimelineEvent>,
    /// Total count.
    pub total: usize,
}

/// Review projection response.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewListResponse {
    pub timeline_events: Vec<ReviewRecord>,
    pub total: usize,
}

/// Upcoming calendar events response.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarEventListResponse {
    pub events: Vec<CalendarEvent>,
    pub total: usize,
}

/// Generic success response.
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
    /// Success message.
    pub message: String,
}
