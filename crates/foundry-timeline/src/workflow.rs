//! TimelineWorkflow - the review workflow for timeline events.
//!
//! Every operation takes the acting identity as a parameter and runs its
//! steps in a fixed order inside one store transaction:
//! 1. resolve the actor and the records involved
//! 2. validate and authorize
//! 3. write the event and its attachments
//! 4. update derived startup fields (links, stage)
//!
//! A failure at any step leaves the store unchanged.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};
use url::Url;

use foundry_models::{
    files_metadata_json, Attachment, EventOwner, FacultyId, FounderId, Grade, StartupFeedback,
    StartupId, TimelineEvent, TimelineEventGrade, TimelineEventId, TimelineEventStatus,
};
use foundry_persistence::{Database, PersistenceError, Store};

use crate::attachments::{attachments_for, sync_attachments};
use crate::derived::{propagate_startup_link, recompute_stage};
use crate::error::{Result, TimelineError, ValidationError};
use crate::filter::TimelineEventFilter;
use crate::submission::{CriterionGrade, TimelineEventChanges, TimelineEventSubmission, Uploads};

/// Settings the workflow needs to build absolute URLs.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// Site root that download and share URLs are built against.
    pub public_url: Url,
}

impl WorkflowConfig {
    pub fn new(public_url: Url) -> Self {
        Self { public_url }
    }
}

/// An event as shown to one viewer.
#[derive(Debug, Clone, Serialize)]
pub struct TimelineEventDetail {
    #[serde(flatten)]
    pub event: TimelineEvent,
    pub owner: EventOwner,
    pub attachments: Vec<Attachment>,
    pub points: Option<f64>,
    pub share_url: String,
    pub founder_can_modify: bool,
    pub founder_can_delete: bool,
}

/// Runs timeline event operations against a shared store.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use chrono::NaiveDate;
/// use url::Url;
/// use foundry_persistence::Store;
/// use foundry_timeline::{TimelineEventSubmission, TimelineWorkflow, Uploads, WorkflowConfig};
///
/// let store = Arc::new(Store::open("/tmp/foundry").unwrap());
/// let config = WorkflowConfig::new(Url::parse("https://www.example.com").unwrap());
/// let workflow = TimelineWorkflow::new(store, config);
///
/// let submission = TimelineEventSubmission::new(
///     "tetype-1",
///     "Shipped our first prototype",
///     NaiveDate::from_ymd_opt(2024, 3, 1),
/// );
/// let event = workflow
///     .submit(&"founder-1".into(), submission, &Uploads::new())
///     .unwrap();
/// workflow.verify(&event.id).unwrap();
/// ```
pub struct TimelineWorkflow {
    store: Arc<Store>,
    config: WorkflowConfig,
}

impl TimelineWorkflow {
    pub fn new(store: Arc<Store>, config: WorkflowConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Creates a pending event for the founder's startup.
    pub fn submit(
        &self,
        founder_id: &FounderId,
        submission: TimelineEventSubmission,
        uploads: &Uploads,
    ) -> Result<TimelineEvent> {
        let event = self.store.transaction(|db| {
            let startup_id = acting_startup(db, founder_id)?;
            let event_type = db.event_type(&submission.event_type_id)?.clone();
            let valid = submission.validate(&event_type)?;
            if let Some(ref target_id) = submission.target_id {
                db.target(target_id)?;
            }

            let mut event = TimelineEvent::new(
                startup_id.clone(),
                founder_id.clone(),
                event_type.id.clone(),
                valid.description,
                valid.event_on,
            );
            event.target_id = submission.target_id;
            event.links = submission.links.unwrap_or_default();
            event.image = submission.image;
            let event_id = event.id.clone();
            db.insert_timeline_event(event);

            sync_attachments(db, &event_id, &submission.files, uploads)?;
            if event_type.stage_change {
                recompute_stage(db, &startup_id)?;
            }
            Ok::<_, TimelineError>(db.timeline_event(&event_id)?.clone())
        })?;

        info!(
            event_id = %event.id,
            startup_id = %event.startup_id,
            founder_id = %founder_id,
            "timeline event submitted"
        );
        Ok(event)
    }

    /// Applies a founder's edits and sends the event back for review.
    ///
    /// Any edit, including one to a reviewed event, resets the status to
    /// `Pending`. End-of-iteration events can't be edited at all.
    pub fn update(
        &self,
        founder_id: &FounderId,
        event_id: &TimelineEventId,
        changes: TimelineEventChanges,
        uploads: &Uploads,
    ) -> Result<TimelineEvent> {
        let event = self.store.transaction(|db| {
            let startup_id = acting_startup(db, founder_id)?;
            ensure_in_startup(db, event_id, &startup_id)?;

            let current_type = db.event_type(&db.timeline_event(event_id)?.event_type_id)?.clone();
            if current_type.end_iteration() {
                return Err(TimelineError::permission_denied(
                    "end of iteration events can't be edited",
                ));
            }
            let new_type = match changes.event_type_id {
                Some(ref type_id) => db.event_type(type_id)?.clone(),
                None => current_type.clone(),
            };
            if let Some(ref description) = changes.description {
                if description.trim().is_empty() {
                    return Err(ValidationError::MissingDescription.into());
                }
            }

            let event = db.timeline_event_mut(event_id)?;
            if let Some(description) = changes.description {
                event.description = description;
            }
            if let Some(event_on) = changes.event_on {
                event.event_on = event_on;
            }
            if let Some(links) = changes.links {
                event.links = links;
            }
            if let Some(image) = changes.image {
                event.image = Some(image);
            }
            event.event_type_id = new_type.id.clone();
            event.transition_to(TimelineEventStatus::Pending);

            sync_attachments(db, event_id, &changes.files, uploads)?;
            if current_type.stage_change || new_type.stage_change {
                recompute_stage(db, &startup_id)?;
            }
            Ok::<_, TimelineError>(db.timeline_event(event_id)?.clone())
        })?;

        info!(event_id = %event_id, founder_id = %founder_id, "timeline event updated");
        Ok(event)
    }

    /// Deletes an unreviewed event that has no feedback.
    pub fn delete(&self, founder_id: &FounderId, event_id: &TimelineEventId) -> Result<()> {
        self.store.transaction(|db| {
            let startup_id = acting_startup(db, founder_id)?;
            ensure_in_startup(db, event_id, &startup_id)?;

            let event = db.timeline_event(event_id)?;
            if !event.founder_can_delete(db.has_feedback(event_id)) {
                return Err(TimelineError::permission_denied(
                    "reviewed events and events with feedback can't be deleted",
                ));
            }
            let stage_change = db
                .event_types
                .get(&event.event_type_id)
                .is_some_and(|t| t.stage_change);

            db.remove_timeline_event(event_id)?;
            if stage_change {
                recompute_stage(db, &startup_id)?;
            }
            Ok::<_, TimelineError>(())
        })?;

        info!(event_id = %event_id, founder_id = %founder_id, "timeline event deleted");
        Ok(())
    }

    /// Marks the event verified and updates the startup fields it feeds.
    pub fn verify(&self, event_id: &TimelineEventId) -> Result<TimelineEvent> {
        let event = self.store.transaction(|db| {
            apply_status(db, event_id, TimelineEventStatus::Verified, &self.config.public_url)?;
            Ok::<_, TimelineError>(db.timeline_event(event_id)?.clone())
        })?;

        info!(event_id = %event_id, startup_id = %event.startup_id, "timeline event verified");
        Ok(event)
    }

    /// Records a staff review outcome with optional feedback.
    pub fn review(
        &self,
        event_id: &TimelineEventId,
        outcome: TimelineEventStatus,
        faculty_id: Option<&FacultyId>,
        feedback: Option<&str>,
    ) -> Result<TimelineEvent> {
        if outcome == TimelineEventStatus::Pending {
            return Err(ValidationError::InvalidReviewOutcome(outcome.to_string()).into());
        }

        let event = self.store.transaction(|db| {
            apply_status(db, event_id, outcome, &self.config.public_url)?;
            if let Some(text) = feedback {
                push_feedback(db, event_id, faculty_id, text)?;
            }
            Ok::<_, TimelineError>(db.timeline_event(event_id)?.clone())
        })?;

        info!(event_id = %event_id, status = %outcome, "timeline event reviewed");
        Ok(event)
    }

    /// Sets the qualitative grade and the per-criterion rubric grades.
    pub fn grade(
        &self,
        event_id: &TimelineEventId,
        grade: Option<Grade>,
        criterion_grades: &[CriterionGrade],
    ) -> Result<TimelineEvent> {
        let event = self.store.transaction(|db| {
            let event = db.timeline_event(event_id)?;
            if !criterion_grades.is_empty() {
                let target_id = event
                    .target_id
                    .as_ref()
                    .ok_or_else(|| TimelineError::not_found("target", event_id))?;
                let target = db.target(target_id)?;
                for entry in criterion_grades {
                    if !target.evaluation_criteria.contains(&entry.criterion_id) {
                        return Err(TimelineError::not_found(
                            "evaluation criterion",
                            &entry.criterion_id,
                        ));
                    }
                    db.criterion(&entry.criterion_id)?;
                }
            }

            let event = db.timeline_event_mut(event_id)?;
            event.grade = grade;
            event.updated_at = Utc::now();
            for entry in criterion_grades {
                db.upsert_grade(TimelineEventGrade {
                    timeline_event_id: event_id.clone(),
                    evaluation_criterion_id: entry.criterion_id.clone(),
                    grade: entry.grade,
                });
            }
            Ok::<_, TimelineError>(db.timeline_event(event_id)?.clone())
        })?;

        info!(
            event_id = %event_id,
            grade = ?grade,
            criteria = criterion_grades.len(),
            "timeline event graded"
        );
        Ok(event)
    }

    /// Leaves feedback on an event.
    pub fn add_feedback(
        &self,
        event_id: &TimelineEventId,
        faculty_id: Option<&FacultyId>,
        text: &str,
    ) -> Result<StartupFeedback> {
        let feedback = self
            .store
            .transaction(|db| push_feedback(db, event_id, faculty_id, text))?;
        info!(event_id = %event_id, feedback_id = %feedback.id, "feedback added");
        Ok(feedback)
    }

    /// Loads an event as the viewer may see it.
    ///
    /// Founder-scoped events hidden from the viewer are reported as not
    /// found.
    pub fn detail(
        &self,
        event_id: &TimelineEventId,
        viewer: Option<&FounderId>,
    ) -> Result<TimelineEventDetail> {
        self.store.read(|db| {
            let event = db.timeline_event(event_id)?;
            let event_type = db.event_type(&event.event_type_id)?;
            if event.hidden_from(event_type, viewer) {
                return Err(TimelineError::not_found("timeline event", event_id));
            }
            let target = match event.target_id {
                Some(ref target_id) => Some(db.target(target_id)?),
                None => None,
            };

            Ok(TimelineEventDetail {
                owner: event.owner(event_type),
                attachments: attachments_for(db, event, viewer, &self.config.public_url)?,
                points: event.points_for_grade(target),
                share_url: share_url_in(db, event, &self.config.public_url)?.to_string(),
                founder_can_modify: event.founder_can_modify(event_type),
                founder_can_delete: event.founder_can_delete(db.has_feedback(event_id)),
                event: event.clone(),
            })
        })?
    }

    /// Attachments of an event filtered for the viewer.
    pub fn attachments_for(
        &self,
        event_id: &TimelineEventId,
        viewer: Option<&FounderId>,
    ) -> Result<Vec<Attachment>> {
        self.store.read(|db| {
            let event = db.timeline_event(event_id)?;
            attachments_for(db, event, viewer, &self.config.public_url)
        })?
    }

    /// True if the event must not be shown to the viewer.
    pub fn hidden_from(&self, event_id: &TimelineEventId, viewer: Option<&FounderId>) -> Result<bool> {
        self.store.read(|db| {
            let event = db.timeline_event(event_id)?;
            let event_type = db.event_type(&event.event_type_id)?;
            Ok(event.hidden_from(event_type, viewer))
        })?
    }

    /// Events matching the filter that the viewer may see, most recent
    /// event date first.
    pub fn list(
        &self,
        filter: &TimelineEventFilter,
        viewer: Option<&FounderId>,
        limit: Option<usize>,
    ) -> Result<Vec<TimelineEvent>> {
        let events = self.store.read(|db| {
            let mut events: Vec<TimelineEvent> = db
                .timeline_events
                .values()
                .filter(|event| filter.matches(event))
                .filter(|event| {
                    db.event_types
                        .get(&event.event_type_id)
                        .map_or(true, |t| !event.hidden_from(t, viewer))
                })
                .cloned()
                .collect();
            events.sort_by(|a, b| {
                b.event_on
                    .cmp(&a.event_on)
                    .then_with(|| b.created_at.cmp(&a.created_at))
            });
            if let Some(limit) = limit {
                events.truncate(limit);
            }
            events
        })?;

        debug!(count = events.len(), "listed timeline events");
        Ok(events)
    }

    /// Events that could supersede this one: same owner and type,
    /// created later, most recent event date first.
    pub fn improved_event_candidates(&self, event_id: &TimelineEventId) -> Result<Vec<TimelineEvent>> {
        self.store.read(|db| improvement_candidates(db, event_id))?
    }

    /// Links the event to the later event that supersedes it, or clears
    /// the link with `None`.
    pub fn mark_improved(
        &self,
        event_id: &TimelineEventId,
        improved_by: Option<&TimelineEventId>,
    ) -> Result<TimelineEvent> {
        let event = self.store.transaction(|db| {
            if let Some(improved_id) = improved_by {
                db.timeline_event(improved_id)?;
                let candidates = improvement_candidates(db, event_id)?;
                if !candidates.iter().any(|c| c.id == *improved_id) {
                    return Err(ValidationError::NotAnImprovement(improved_id.to_string()).into());
                }
            }
            let event = db.timeline_event_mut(event_id)?;
            event.improved_timeline_event_id = improved_by.cloned();
            event.updated_at = Utc::now();
            Ok::<_, TimelineError>(event.clone())
        })?;

        info!(event_id = %event_id, improved_by = ?improved_by, "improved event linked");
        Ok(event)
    }

    /// Public URL of the event's page.
    pub fn share_url(&self, event_id: &TimelineEventId) -> Result<Url> {
        self.store.read(|db| {
            let event = db.timeline_event(event_id)?;
            share_url_in(db, event, &self.config.public_url)
        })?
    }

    /// Points the event is worth, or `None` when it has no target.
    pub fn points_for_grade(&self, event_id: &TimelineEventId) -> Result<Option<f64>> {
        self.store.read(|db| {
            let event = db.timeline_event(event_id)?;
            let target = match event.target_id {
                Some(ref target_id) => Some(db.target(target_id)?),
                None => None,
            };
            Ok(event.points_for_grade(target))
        })?
    }

    /// File metadata the edit form is seeded with.
    pub fn files_metadata_json(&self, event_id: &TimelineEventId) -> Result<String> {
        self.store.read(|db| {
            db.timeline_event(event_id)?;
            let files = db.files_for(event_id);
            Ok(files_metadata_json(&files).map_err(PersistenceError::from)?)
        })?
    }

    pub fn founder_can_modify(&self, event_id: &TimelineEventId) -> Result<bool> {
        self.store.read(|db| {
            let event = db.timeline_event(event_id)?;
            let event_type = db.event_type(&event.event_type_id)?;
            Ok(event.founder_can_modify(event_type))
        })?
    }
}

/// Resolves the startup the acting founder works in.
fn acting_startup(db: &Database, founder_id: &FounderId) -> Result<StartupId> {
    let founder = db
        .founders
        .get(founder_id)
        .ok_or_else(|| TimelineError::permission_denied(format!("unknown founder {}", founder_id)))?;
    founder.startup_id.clone().ok_or_else(|| {
        TimelineError::permission_denied(format!("founder {} has no startup", founder_id))
    })
}

/// Events of other startups are reported as missing.
fn ensure_in_startup(db: &Database, event_id: &TimelineEventId, startup_id: &StartupId) -> Result<()> {
    let event = db.timeline_event(event_id)?;
    if event.startup_id != *startup_id {
        return Err(TimelineError::not_found("timeline event", event_id));
    }
    Ok(())
}

fn apply_status(
    db: &mut Database,
    event_id: &TimelineEventId,
    status: TimelineEventStatus,
    public_url: &Url,
) -> Result<()> {
    let event = db.timeline_event_mut(event_id)?;
    event.transition_to(status);
    let startup_id = event.startup_id.clone();
    let type_id = event.event_type_id.clone();

    if status == TimelineEventStatus::Verified {
        propagate_startup_link(db, event_id, public_url)?;
    }
    if db.event_type(&type_id)?.stage_change {
        recompute_stage(db, &startup_id)?;
    }
    Ok(())
}

fn push_feedback(
    db: &mut Database,
    event_id: &TimelineEventId,
    faculty_id: Option<&FacultyId>,
    text: &str,
) -> Result<StartupFeedback> {
    if text.trim().is_empty() {
        return Err(ValidationError::MissingFeedback.into());
    }
    if let Some(faculty_id) = faculty_id {
        db.faculty_member(faculty_id)?;
    }
    let startup_id = db.timeline_event(event_id)?.startup_id.clone();
    let feedback = StartupFeedback::new(event_id.clone(), startup_id, faculty_id.cloned(), text);
    db.add_feedback(feedback.clone());
    Ok(feedback)
}

fn improvement_candidates(db: &Database, event_id: &TimelineEventId) -> Result<Vec<TimelineEvent>> {
    let event = db.timeline_event(event_id)?;
    let event_type = db.event_type(&event.event_type_id)?;
    let owner = event.owner(event_type);

    let mut candidates: Vec<TimelineEvent> = db
        .timeline_events
        .values()
        .filter(|other| {
            other.id != event.id
                && other.event_type_id == event.event_type_id
                && other.created_at > event.created_at
                && other.owner(event_type) == owner
        })
        .cloned()
        .collect();
    candidates.sort_by(|a, b| b.event_on.cmp(&a.event_on));
    Ok(candidates)
}

fn share_url_in(db: &Database, event: &TimelineEvent, public_url: &Url) -> Result<Url> {
    let slug = &db.startup(&event.startup_id)?.slug;
    let title = &db.event_type(&event.event_type_id)?.title;
    Ok(public_url.join(&event.share_path(slug, title))?)
}
