//! Startup fields derived from verified timeline events.

use tracing::debug;
use url::Url;

use foundry_models::{StartupId, TimelineEvent, TimelineEventId};
use foundry_persistence::Database;

use crate::attachments::download_url;
use crate::error::Result;

/// URL of the first file, else the first link.
pub fn first_attachment_url(
    db: &Database,
    event: &TimelineEvent,
    public_url: &Url,
) -> Result<Option<String>> {
    if let Some(file) = db.files_for(&event.id).first() {
        let slug = &db.startup(&event.startup_id)?.slug;
        let url = download_url(public_url, slug, &event.id, &file.id)?;
        return Ok(Some(url.to_string()));
    }
    Ok(event.first_link_url().map(str::to_string))
}

/// Copies the first attachment URL onto the startup field that the
/// event's type fills in. Blank URLs never overwrite the field.
pub fn propagate_startup_link(
    db: &mut Database,
    event_id: &TimelineEventId,
    public_url: &Url,
) -> Result<()> {
    let event = db.timeline_event(event_id)?;
    let field = match db.event_type(&event.event_type_id)?.startup_link_field() {
        Some(field) => field,
        None => return Ok(()),
    };
    let startup_id = event.startup_id.clone();

    let url = first_attachment_url(db, event, public_url)?;
    if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
        debug!(startup_id = %startup_id, ?field, url = %url, "updating startup link");
        db.startup_mut(&startup_id)?.set_link(field, url);
    }
    Ok(())
}

/// Sets the startup's stage to the key of its most recent verified
/// stage-changing event, ordered by event date then creation time.
pub fn recompute_stage(db: &mut Database, startup_id: &StartupId) -> Result<()> {
    let stage = db
        .timeline_events
        .values()
        .filter(|event| event.startup_id == *startup_id && event.is_verified())
        .filter_map(|event| {
            db.event_types
                .get(&event.event_type_id)
                .filter(|t| t.stage_change)
                .map(|t| (event, t))
        })
        .max_by(|(a, _), (b, _)| {
            a.event_on
                .cmp(&b.event_on)
                .then_with(|| a.created_at.cmp(&b.created_at))
        })
        .map(|(_, event_type)| event_type.key.clone());

    let startup = db.startup_mut(startup_id)?;
    if startup.stage != stage {
        debug!(startup_id = %startup_id, from = ?startup.stage, to = ?stage, "stage changed");
        startup.stage = stage;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use foundry_models::{
        EventTypeRole, FounderId, Link, Startup, TimelineEventFile, TimelineEventStatus,
        TimelineEventType, KEY_NEW_DECK,
    };

    fn public_url() -> Url {
        Url::parse("https://www.example.com").unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn seed() -> (Database, StartupId, TimelineEventType) {
        let mut db = Database::default();
        let startup = Startup::new("Acme", "acme");
        let startup_id = startup.id.clone();
        let deck = TimelineEventType::new(KEY_NEW_DECK, "New Deck", EventTypeRole::Product);
        db.insert_startup(startup);
        db.insert_event_type(deck.clone());
        (db, startup_id, deck)
    }

    fn add_event(
        db: &mut Database,
        startup_id: &StartupId,
        type_id: &foundry_models::TimelineEventTypeId,
        on: NaiveDate,
        status: TimelineEventStatus,
    ) -> TimelineEventId {
        let mut event = TimelineEvent::new(
            startup_id.clone(),
            FounderId::new(),
            type_id.clone(),
            "Update",
            on,
        );
        event.transition_to(status);
        let id = event.id.clone();
        db.insert_timeline_event(event);
        id
    }

    #[test]
    fn test_first_attachment_prefers_files() {
        let (mut db, startup_id, deck) = seed();
        let event_id = add_event(&mut db, &startup_id, &deck.id, day(1), TimelineEventStatus::Pending);
        db.timeline_event_mut(&event_id)
            .unwrap()
            .links
            .push(Link::public("https://link.example.com"));

        let event = db.timeline_event(&event_id).unwrap().clone();
        assert_eq!(
            first_attachment_url(&db, &event, &public_url()).unwrap().as_deref(),
            Some("https://link.example.com")
        );

        let file = TimelineEventFile::new(event_id.clone(), "Deck", true, "blob-1");
        let file_id = file.id.clone();
        db.add_file(file);
        let url = first_attachment_url(&db, &event, &public_url()).unwrap().unwrap();
        assert!(url.ends_with(&format!("timeline_event_files/{}/download", file_id)));
    }

    #[test]
    fn test_propagate_skips_blank_url() {
        let (mut db, startup_id, deck) = seed();
        db.startup_mut(&startup_id).unwrap().presentation_link = Some("https://old.example.com".into());
        let event_id = add_event(&mut db, &startup_id, &deck.id, day(1), TimelineEventStatus::Verified);
        db.timeline_event_mut(&event_id).unwrap().links.push(Link::public("  "));

        propagate_startup_link(&mut db, &event_id, &public_url()).unwrap();
        assert_eq!(
            db.startup(&startup_id).unwrap().presentation_link.as_deref(),
            Some("https://old.example.com")
        );
    }

    #[test]
    fn test_propagate_ignores_other_types() {
        let (mut db, startup_id, _) = seed();
        let other = TimelineEventType::new("team_update", "Team Update", EventTypeRole::Product);
        db.insert_event_type(other.clone());
        let event_id = add_event(&mut db, &startup_id, &other.id, day(1), TimelineEventStatus::Verified);
        db.timeline_event_mut(&event_id)
            .unwrap()
            .links
            .push(Link::public("https://link.example.com"));

        propagate_startup_link(&mut db, &event_id, &public_url()).unwrap();
        assert!(db.startup(&startup_id).unwrap().presentation_link.is_none());
    }

    #[test]
    fn test_stage_follows_latest_verified_event() {
        let (mut db, startup_id, _) = seed();
        let prototype = TimelineEventType::new("moved_to_prototyping", "Prototyping", EventTypeRole::Product)
            .with_stage_change();
        let idea = TimelineEventType::new("moved_to_idea_discovery", "Idea Discovery", EventTypeRole::Product)
            .with_stage_change();
        db.insert_event_type(prototype.clone());
        db.insert_event_type(idea.clone());

        add_event(&mut db, &startup_id, &idea.id, day(1), TimelineEventStatus::Verified);
        add_event(&mut db, &startup_id, &prototype.id, day(5), TimelineEventStatus::Verified);
        add_event(&mut db, &startup_id, &idea.id, day(9), TimelineEventStatus::Pending);

        recompute_stage(&mut db, &startup_id).unwrap();
        assert_eq!(
            db.startup(&startup_id).unwrap().stage.as_deref(),
            Some("moved_to_prototyping")
        );
    }

    #[test]
    fn test_stage_ties_broken_by_creation_time() {
        let (mut db, startup_id, _) = seed();
        let first = TimelineEventType::new("stage_a", "Stage A", EventTypeRole::Product).with_stage_change();
        let second = TimelineEventType::new("stage_b", "Stage B", EventTypeRole::Product).with_stage_change();
        db.insert_event_type(first.clone());
        db.insert_event_type(second.clone());

        let later = add_event(&mut db, &startup_id, &first.id, day(3), TimelineEventStatus::Verified);
        let earlier = add_event(&mut db, &startup_id, &second.id, day(3), TimelineEventStatus::Verified);
        let created = db.timeline_event(&later).unwrap().created_at;
        db.timeline_event_mut(&earlier).unwrap().created_at = created - Duration::minutes(5);

        recompute_stage(&mut db, &startup_id).unwrap();
        assert_eq!(db.startup(&startup_id).unwrap().stage.as_deref(), Some("stage_a"));
    }

    #[test]
    fn test_stage_cleared_without_verified_events() {
        let (mut db, startup_id, _) = seed();
        db.startup_mut(&startup_id).unwrap().stage = Some("stage_a".into());

        recompute_stage(&mut db, &startup_id).unwrap();
        assert!(db.startup(&startup_id).unwrap().stage.is_none());
    }
}
