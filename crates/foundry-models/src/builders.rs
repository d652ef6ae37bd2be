//! Builder patterns for complex types.

use chrono::NaiveDate;

use crate::ids::{FounderId, StartupId, TargetId, TimelineEventTypeId};
use crate::timeline_event::{Grade, Link, TimelineEvent, TimelineEventStatus};

/// Builder for creating TimelineEvent instances with a fluent API.
#[derive(Debug, Clone)]
pub struct TimelineEventBuilder {
    startup_id: StartupId,
    founder_id: FounderId,
    event_type_id: TimelineEventTypeId,
    description: String,
    event_on: NaiveDate,
    status: Option<TimelineEventStatus>,
    grade: Option<Grade>,
    target_id: Option<TargetId>,
    links: Vec<Link>,
    image: Option<String>,
    owner_ids: Vec<FounderId>,
    auto_verified: bool,
}

impl TimelineEventBuilder {
    /// Creates a new TimelineEventBuilder with required fields.
    pub fn new(
        startup_id: impl Into<StartupId>,
        founder_id: impl Into<FounderId>,
        event_type_id: impl Into<TimelineEventTypeId>,
        event_on: NaiveDate,
    ) -> Self {
        Self {
            startup_id: startup_id.into(),
            founder_id: founder_id.into(),
            event_type_id: event_type_id.into(),
            description: String::new(),
            event_on,
            status: None,
            grade: None,
            target_id: None,
            links: Vec::new(),
            image: None,
            owner_ids: Vec::new(),
            auto_verified: false,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the status; the transition time is stamped on build.
    pub fn status(mut self, status: TimelineEventStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn grade(mut self, grade: Grade) -> Self {
        self.grade = Some(grade);
        self
    }

    pub fn target(mut self, target_id: impl Into<TargetId>) -> Self {
        self.target_id = Some(target_id.into());
        self
    }

    /// Adds a single link.
    pub fn link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }

    pub fn image(mut self, url: impl Into<String>) -> Self {
        self.image = Some(url.into());
        self
    }

    /// Credits an additional founder.
    pub fn owner(mut self, founder_id: impl Into<FounderId>) -> Self {
        self.owner_ids.push(founder_id.into());
        self
    }

    pub fn auto_verified(mut self) -> Self {
        self.auto_verified = true;
        self
    }

    /// Builds the TimelineEvent.
    pub fn build(self) -> TimelineEvent {
        let mut event = TimelineEvent::new(
            self.startup_id,
            self.founder_id,
            self.event_type_id,
            self.description,
            self.event_on,
        );
        if let Some(status) = self.status {
            event.transition_to(status);
        }
        for owner in self.owner_ids {
            if !event.owner_ids.contains(&owner) {
                event.owner_ids.push(owner);
            }
        }
        event.grade = self.grade;
        event.target_id = self.target_id;
        event.links = self.links;
        event.image = self.image;
        event.auto_verified = self.auto_verified;
        event
    }
}

/// Convenience methods on TimelineEvent for creating builders.
impl TimelineEvent {
    pub fn builder(
        startup_id: impl Into<StartupId>,
        founder_id: impl Into<FounderId>,
        event_type_id: impl Into<TimelineEventTypeId>,
        event_on: NaiveDate,
    ) -> TimelineEventBuilder {
        TimelineEventBuilder::new(startup_id, founder_id, event_type_id, event_on)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    #[test]
    fn test_builder_basic() {
        let event = TimelineEvent::builder("startup-1", "founder-1", "tetype-1", day())
            .description("Launched beta")
            .build();

        assert_eq!(event.description, "Launched beta");
        assert_eq!(event.status, TimelineEventStatus::Pending);
        assert!(event.status_updated_at.is_none());
        assert_eq!(event.event_on, day());
    }

    #[test]
    fn test_builder_status_stamps_time() {
        let event = TimelineEvent::builder("startup-1", "founder-1", "tetype-1", day())
            .description("Reviewed")
            .status(TimelineEventStatus::Verified)
            .grade(Grade::Great)
            .build();

        assert!(event.is_verified());
        assert!(event.status_updated_at.is_some());
        assert_eq!(event.grade, Some(Grade::Great));
    }

    #[test]
    fn test_builder_owners_deduplicated() {
        let event = TimelineEvent::builder("startup-1", "founder-1", "tetype-1", day())
            .owner("founder-1")
            .owner("founder-2")
            .build();

        assert_eq!(
            event.owner_ids,
            vec![FounderId::from("founder-1"), FounderId::from("founder-2")]
        );
    }

    #[test]
    fn test_builder_links_keep_order() {
        let event = TimelineEvent::builder("startup-1", "founder-1", "tetype-1", day())
            .link(Link::public("https://one.example.com"))
            .link(Link::private("https://two.example.com"))
            .build();

        assert_eq!(event.first_link_url(), Some("https://one.example.com"));
        assert_eq!(event.links.len(), 2);
    }
}
