//! Application state shared across handlers.

use std::sync::Arc;

use foundry_persistence::Store;
use foundry_review::ReviewableTimelineEvents;
use foundry_timeline::{CalendarRegistry, Notifier, TimelineWorkflow, WorkflowConfig};

use crate::config::ApiConfig;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: Arc<ApiConfig>,
    /// Record store shared by every service.
    pub store: Arc<Store>,
    /// Timeline event workflow.
    pub workflow: Arc<TimelineWorkflow>,
    /// Coach review projection.
    pub review: Arc<ReviewableTimelineEvents>,
    /// Calendar event registration.
    pub calendar: Arc<CalendarRegistry>,
}

impl AppState {
    /// Creates a new AppState with all components.
    pub fn new(
        config: ApiConfig,
        store: Arc<Store>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, url::ParseError> {
        let workflow = TimelineWorkflow::new(store.clone(), WorkflowConfig::new(config.public_url()?));
        Ok(Self {
            config: Arc::new(config),
            workflow: Arc::new(workflow),
            review: Arc::new(ReviewableTimelineEvents::new(store.clone())),
            calendar: Arc::new(CalendarRegistry::new(store.clone(), notifier)),
            store,
        })
    }
}
