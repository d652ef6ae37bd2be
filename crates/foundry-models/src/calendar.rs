//! Calendar events posted by the community and approved by staff.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::ids::CalendarEventId;

/// How far ahead the public listing looks.
pub const UPCOMING_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: CalendarEventId,
    pub title: String,
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,

    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    pub posters_name: String,
    pub posters_email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posters_phone_number: Option<String>,

    /// Only approved events are listed publicly.
    #[serde(default)]
    pub approved: bool,

    pub created_at: DateTime<Utc>,
}

impl CalendarEvent {
    /// Checks the fields a registration must carry.
    pub fn validate(&self) -> Result<(), ModelError> {
        let required = [
            ("title", &self.title),
            ("description", &self.description),
            ("posters_name", &self.posters_name),
            ("posters_email", &self.posters_email),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ModelError::InvalidCalendarEvent(format!("{} is required", field)));
            }
        }
        if !self.posters_email.contains('@') {
            return Err(ModelError::InvalidCalendarEvent(
                "posters_email is not an email address".to_string(),
            ));
        }
        if self.end_at < self.start_at {
            return Err(ModelError::InvalidCalendarEvent(
                "end_at is before start_at".to_string(),
            ));
        }
        Ok(())
    }

    /// True for approved events starting after midnight (UTC) of `today`
    /// and within the upcoming window measured from `now`.
    pub fn is_upcoming(&self, today: NaiveDate, now: DateTime<Utc>) -> bool {
        let midnight = Utc.from_utc_datetime(&today.and_time(NaiveTime::MIN));
        self.approved
            && self.start_at > midnight
            && self.start_at <= now + Duration::days(UPCOMING_WINDOW_DAYS)
    }
}
