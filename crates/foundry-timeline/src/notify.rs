//! Notification hook for calendar event registrations.
//!
//! Delivery is fire-and-forget: a failed notification is logged and never
//! undoes the registration that triggered it.

use std::sync::Mutex;

use thiserror::Error;
use tracing::info;

use foundry_models::{CalendarEvent, CalendarEventId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("notification failed: {0}")]
pub struct NotifyError(pub String);

/// Sends the confirmation a poster receives after registering an event.
///
/// Implementations can hand off to a mail service, or simply log for
/// development and tests.
pub trait Notifier: Send + Sync {
    fn send_confirmation(&self, event: &CalendarEvent) -> Result<(), NotifyError>;
}

/// Logs confirmations instead of delivering them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send_confirmation(&self, event: &CalendarEvent) -> Result<(), NotifyError> {
        info!(
            calendar_event_id = %event.id,
            to = %event.posters_email,
            title = %event.title,
            "registration confirmation"
        );
        Ok(())
    }
}

/// Records confirmations in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<CalendarEventId>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids of the events confirmed so far, oldest first.
    pub fn sent(&self) -> Vec<CalendarEventId> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn send_confirmation(&self, event: &CalendarEvent) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .map_err(|e| NotifyError(e.to_string()))?
            .push(event.id.clone());
        Ok(())
    }
}
