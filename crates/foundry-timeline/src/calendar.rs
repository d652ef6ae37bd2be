//! Calendar event registration and the public upcoming listing.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use tracing::{info, warn};

use foundry_models::{CalendarEvent, CalendarEventId};
use foundry_persistence::Store;

use crate::error::{Result, TimelineError, ValidationError};
use crate::notify::Notifier;

/// A calendar event as submitted by a poster.
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarEventRegistration {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub picture: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub posters_name: String,
    pub posters_email: String,
    #[serde(default)]
    pub posters_phone_number: Option<String>,
}

impl CalendarEventRegistration {
    fn into_event(self) -> CalendarEvent {
        CalendarEvent {
            id: CalendarEventId::new(),
            title: self.title,
            description: self.description,
            picture: self.picture,
            start_at: self.start_at,
            end_at: self.end_at,
            location: self.location,
            category: self.category,
            posters_name: self.posters_name,
            posters_email: self.posters_email,
            posters_phone_number: self.posters_phone_number,
            approved: false,
            created_at: Utc::now(),
        }
    }
}

/// Registers calendar events and lists the approved ones.
pub struct CalendarRegistry {
    store: Arc<Store>,
    notifier: Arc<dyn Notifier>,
}

impl CalendarRegistry {
    pub fn new(store: Arc<Store>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Stores an unapproved event, then sends the poster a confirmation.
    pub fn register(&self, registration: CalendarEventRegistration) -> Result<CalendarEvent> {
        let event = registration.into_event();
        event.validate().map_err(ValidationError::from)?;

        self.store.transaction(|db| {
            db.insert_calendar_event(event.clone());
            Ok::<_, TimelineError>(())
        })?;
        info!(calendar_event_id = %event.id, title = %event.title, "calendar event registered");

        if let Err(e) = self.notifier.send_confirmation(&event) {
            warn!(calendar_event_id = %event.id, error = %e, "confirmation not sent");
        }
        Ok(event)
    }

    /// Publishes an event in the upcoming listing.
    pub fn approve(&self, id: &CalendarEventId) -> Result<CalendarEvent> {
        let event = self.store.transaction(|db| {
            let event = db
                .calendar_events
                .get_mut(id)
                .ok_or_else(|| TimelineError::not_found("calendar event", id))?;
            event.approved = true;
            Ok::<_, TimelineError>(event.clone())
        })?;
        info!(calendar_event_id = %id, "calendar event approved");
        Ok(event)
    }

    /// Approved events starting from midnight of `today` within the upcoming window,
    /// soonest first.
    pub fn upcoming(&self, today: NaiveDate, now: DateTime<Utc>) -> Result<Vec<CalendarEvent>> {
        let mut events = self.store.read(|db| {
            db.calendar_events
                .values()
                .filter(|event| event.is_upcoming(today, now))
                .cloned()
                .collect::<Vec<_>>()
        })?;
        events.sort_by_key(|event| event.start_at);
        Ok(events)
    }
}
