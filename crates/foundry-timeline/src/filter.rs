//! Timeline event filtering for listings.

use foundry_models::{FounderId, StartupId, TimelineEvent, TimelineEventStatus, TimelineEventTypeId};

/// Filter criteria for querying timeline events.
#[derive(Debug, Clone, Default)]
pub struct TimelineEventFilter {
    /// Filter by owning startup.
    pub startup_id: Option<StartupId>,
    /// Filter by review status.
    pub status: Option<TimelineEventStatus>,
    /// Filter by event type.
    pub event_type_id: Option<TimelineEventTypeId>,
    /// Filter by credited founder.
    pub owner_id: Option<FounderId>,
}

impl TimelineEventFilter {
    /// Creates a new empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_startup_id(mut self, startup_id: StartupId) -> Self {
        self.startup_id = Some(startup_id);
        self
    }

    pub fn with_status(mut self, status: TimelineEventStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_event_type_id(mut self, event_type_id: TimelineEventTypeId) -> Self {
        self.event_type_id = Some(event_type_id);
        self
    }

    pub fn with_owner_id(mut self, owner_id: FounderId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    /// Returns true if the event matches this filter.
    pub fn matches(&self, event: &TimelineEvent) -> bool {
        if let Some(ref startup_id) = self.startup_id {
            if event.startup_id != *startup_id {
                return false;
            }
        }

        if let Some(status) = self.status {
            if event.status != status {
                return false;
            }
        }

        if let Some(ref event_type_id) = self.event_type_id {
            if event.event_type_id != *event_type_id {
                return false;
            }
        }

        if let Some(ref owner_id) = self.owner_id {
            if !event.owner_ids.contains(owner_id) {
                return false;
            }
        }

        true
    }
}
