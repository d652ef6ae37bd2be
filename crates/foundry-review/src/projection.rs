//! Reviewable timeline events for a coach.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use foundry_models::{
    CourseId, EvaluationCriterionId, FacultyId, FounderId, Link, StartupId, TimelineEvent,
    TimelineEventFileId, TimelineEventId,
};
use foundry_persistence::{Database, Store};

use crate::error::{ReviewError, Result};

/// Most records a single review listing returns.
pub const REVIEW_LIMIT: usize = 100;

/// One event as the coach dashboard consumes it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    pub id: TimelineEventId,
    /// Level short name and target title, e.g. `L2 | Build a deck`.
    pub title: String,
    pub description: String,
    pub event_on: NaiveDate,
    pub founder_ids: Vec<FounderId>,
    pub links: Vec<Link>,
    pub files: Vec<FileSummary>,
    pub image: Option<String>,
    pub latest_feedback: Option<String>,
    pub evaluation: Vec<CriterionEvaluation>,
    pub rubric: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    pub title: String,
    pub id: TimelineEventFileId,
}

/// A rubric criterion with the grade awarded so far, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionEvaluation {
    pub criterion_id: EvaluationCriterionId,
    pub criterion_name: String,
    pub grade: Option<u8>,
}

/// Finds the timeline events a coach should review.
pub struct ReviewableTimelineEvents {
    store: Arc<Store>,
}

impl ReviewableTimelineEvents {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Events in `course` awaiting the coach, newest first.
    ///
    /// Only events credited to founders of the coach's startups in that
    /// course are included; auto-verified events never are.
    pub fn timeline_events(
        &self,
        faculty_id: &FacultyId,
        course_id: &CourseId,
    ) -> Result<Vec<ReviewRecord>> {
        let records = self.store.read(|db| project(db, faculty_id, course_id))??;
        debug!(
            faculty_id = %faculty_id,
            course_id = %course_id,
            count = records.len(),
            "built review projection"
        );
        Ok(records)
    }
}

fn project(db: &Database, faculty_id: &FacultyId, course_id: &CourseId) -> Result<Vec<ReviewRecord>> {
    let startups = reviewable_startups(db, faculty_id, course_id)?;
    let founder_ids: HashSet<&FounderId> = db
        .founders
        .values()
        .filter(|founder| {
            founder
                .startup_id
                .as_ref()
                .is_some_and(|id| startups.contains(id))
        })
        .map(|founder| &founder.id)
        .collect();

    let mut events: Vec<&TimelineEvent> = db
        .timeline_events
        .values()
        .filter(|event| !event.auto_verified)
        .filter(|event| event.owner_ids.iter().any(|id| founder_ids.contains(id)))
        .collect();
    events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    events.truncate(REVIEW_LIMIT);

    events.into_iter().map(|event| record(db, event)).collect()
}

/// The coach's startups whose current level belongs to the course.
fn reviewable_startups<'a>(
    db: &'a Database,
    faculty_id: &FacultyId,
    course_id: &CourseId,
) -> Result<HashSet<&'a StartupId>> {
    let faculty = db.faculty_member(faculty_id)?;
    Ok(faculty
        .startup_ids
        .iter()
        .filter(|id| {
            db.startups
                .get(*id)
                .and_then(|startup| startup.level_id.as_ref())
                .and_then(|level_id| db.levels.get(level_id))
                .is_some_and(|level| level.course_id == *course_id)
        })
        .collect())
}

fn record(db: &Database, event: &TimelineEvent) -> Result<ReviewRecord> {
    let target_id = event
        .target_id
        .as_ref()
        .ok_or_else(|| ReviewError::not_found("target", &event.id))?;
    let target = db.target(target_id)?;
    let level = db.level(&target.level_id)?;

    let evaluation = target
        .evaluation_criteria
        .iter()
        .map(|criterion_id| {
            let criterion = db.criterion(criterion_id)?;
            Ok(CriterionEvaluation {
                criterion_id: criterion.id.clone(),
                criterion_name: criterion.name.clone(),
                grade: db.grade_for(&event.id, criterion_id).map(|g| g.grade),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ReviewRecord {
        id: event.id.clone(),
        title: format!("{} | {}", level.short_name(), target.title),
        description: event.description.clone(),
        event_on: event.event_on,
        founder_ids: event.owner_ids.clone(),
        links: event.links.clone(),
        files: db
            .files_for(&event.id)
            .into_iter()
            .map(|file| FileSummary {
                title: file.title.clone(),
                id: file.id.clone(),
            })
            .collect(),
        image: event.image.clone(),
        latest_feedback: db.feedback_for(&event.id).last().map(|f| f.feedback.clone()),
        evaluation,
        rubric: target.rubric_description.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use foundry_models::{
        Course, EvaluationCriterion, EventTypeRole, Faculty, Founder, Level, LevelId, Startup,
        StartupFeedback, Target, TargetId, TimelineEventFile, TimelineEventGrade, TimelineEventType,
    };
    use foundry_persistence::PersistenceError;
    use tempfile::tempdir;

    struct Fixture {
        store: Arc<Store>,
        faculty: FacultyId,
        course: CourseId,
        other_course: CourseId,
        founder: FounderId,
        outsider: FounderId,
        target: TargetId,
        criteria: Vec<EvaluationCriterionId>,
        event_type: foundry_models::TimelineEventTypeId,
    }

    impl Fixture {
        fn add_event(&self, founder: &FounderId, description: &str, age_minutes: i64) -> TimelineEventId {
            let startup_id = self
                .store
                .read(|db| db.founder(founder).map(|f| f.startup_id.clone()))
                .unwrap()
                .unwrap()
                .unwrap();
            let mut event = TimelineEvent::builder(
                startup_id,
                founder.clone(),
                self.event_type.clone(),
                NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
            )
            .description(description)
            .target(self.target.clone())
            .build();
            event.created_at = Utc::now() - Duration::minutes(age_minutes);
            self.insert(event)
        }

        fn insert(&self, event: TimelineEvent) -> TimelineEventId {
            let id = event.id.clone();
            self.store
                .transaction(|db| {
                    db.insert_timeline_event(event);
                    Ok::<_, PersistenceError>(())
                })
                .unwrap();
            id
        }

        fn review(&self) -> Result<Vec<ReviewRecord>> {
            ReviewableTimelineEvents::new(self.store.clone()).timeline_events(&self.faculty, &self.course)
        }
    }

    fn fixture_with(store: Store) -> Fixture {
        let mut db = Database::default();
        let course = Course { id: CourseId::new(), name: "Startup".to_string() };
        let other_course = Course { id: CourseId::new(), name: "Developer".to_string() };
        let level = Level {
            id: LevelId::new(),
            course_id: course.id.clone(),
            number: 2,
            name: "Validation".to_string(),
        };
        let other_level = Level {
            id: LevelId::new(),
            course_id: other_course.id.clone(),
            number: 1,
            name: "Basics".to_string(),
        };

        let mut startup = Startup::new("Acme", "acme");
        startup.level_id = Some(level.id.clone());
        let mut elsewhere = Startup::new("Globex", "globex");
        elsewhere.level_id = Some(other_level.id.clone());

        let founder = Founder::new("Ada", "ada@example.com").in_startup(startup.id.clone());
        let outsider = Founder::new("Eve", "eve@example.com").in_startup(elsewhere.id.clone());

        let clarity = EvaluationCriterion {
            id: EvaluationCriterionId::new(),
            name: "Clarity".to_string(),
            description: None,
        };
        let depth = EvaluationCriterion {
            id: EvaluationCriterionId::new(),
            name: "Depth".to_string(),
            description: None,
        };
        let target = Target {
            id: TargetId::new(),
            level_id: level.id.clone(),
            title: "Interview customers".to_string(),
            points_earnable: 20,
            rubric_description: Some("Talk to ten customers".to_string()),
            evaluation_criteria: vec![clarity.id.clone(), depth.id.clone()],
        };
        let faculty = Faculty {
            id: FacultyId::new(),
            name: "Coach".to_string(),
            startup_ids: vec![startup.id.clone(), elsewhere.id.clone()],
        };
        let event_type = TimelineEventType::new("customer_interviews", "Interviews", EventTypeRole::Product);

        let fixture = Fixture {
            store: Arc::new(store),
            faculty: faculty.id.clone(),
            course: course.id.clone(),
            other_course: other_course.id.clone(),
            founder: founder.id.clone(),
            outsider: outsider.id.clone(),
            target: target.id.clone(),
            criteria: vec![clarity.id.clone(), depth.id.clone()],
            event_type: event_type.id.clone(),
        };

        db.insert_course(course);
        db.insert_course(other_course);
        db.insert_level(level);
        db.insert_level(other_level);
        db.insert_startup(startup);
        db.insert_startup(elsewhere);
        db.insert_founder(founder);
        db.insert_founder(outsider);
        db.insert_criterion(clarity);
        db.insert_criterion(depth);
        db.insert_target(target);
        db.insert_faculty(faculty);
        db.insert_event_type(event_type);
        fixture.store.replace(db).unwrap();
        fixture
    }

    fn fixture() -> Fixture {
        fixture_with(Store::in_memory())
    }

    #[test]
    fn test_only_course_startups_and_not_auto_verified() {
        let f = fixture();
        let wanted = f.add_event(&f.founder, "Interviewed five users", 10);
        f.add_event(&f.outsider, "Other course", 5);
        let mut auto = TimelineEvent::builder(
            f.store.read(|db| db.founder(&f.founder).unwrap().startup_id.clone().unwrap()).unwrap(),
            f.founder.clone(),
            f.event_type.clone(),
            NaiveDate::from_ymd_opt(2024, 8, 2).unwrap(),
        )
        .description("Joined")
        .target(f.target.clone())
        .auto_verified()
        .build();
        auto.created_at = Utc::now();
        f.insert(auto);

        let records = f.review().unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids, vec![wanted]);
    }

    #[test]
    fn test_other_course_lists_other_startups() {
        let f = fixture();
        f.add_event(&f.founder, "Startup course", 10);
        let other = f.add_event(&f.outsider, "Developer course", 5);

        let records = ReviewableTimelineEvents::new(f.store.clone())
            .timeline_events(&f.faculty, &f.other_course)
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, other);
    }

    #[test]
    fn test_newest_first_capped() {
        let f = fixture();
        for age in 0..(REVIEW_LIMIT as i64 + 5) {
            f.add_event(&f.founder, &format!("Event {}", age), age);
        }

        let records = f.review().unwrap();
        assert_eq!(records.len(), REVIEW_LIMIT);
        assert_eq!(records[0].description, "Event 0");
        assert_eq!(records[REVIEW_LIMIT - 1].description, format!("Event {}", REVIEW_LIMIT - 1));
    }

    #[test]
    fn test_record_fields() {
        let f = fixture();
        let id = f.add_event(&f.founder, "Interviewed five users", 1);
        f.store
            .transaction(|db| {
                db.add_file(TimelineEventFile::new(id.clone(), "Notes", true, "blob-1"));
                db.add_feedback(StartupFeedback::new(id.clone(), StartupId::new(), None, "Good start"));
                db.add_feedback(StartupFeedback::new(id.clone(), StartupId::new(), None, "Dig deeper"));
                db.upsert_grade(TimelineEventGrade {
                    timeline_event_id: id.clone(),
                    evaluation_criterion_id: f.criteria[0].clone(),
                    grade: 2,
                });
                Ok::<_, PersistenceError>(())
            })
            .unwrap();

        let record = f.review().unwrap().remove(0);

        assert_eq!(record.title, "L2 | Interview customers");
        assert_eq!(record.founder_ids, vec![f.founder.clone()]);
        assert_eq!(record.files.len(), 1);
        assert_eq!(record.files[0].title, "Notes");
        assert_eq!(record.latest_feedback.as_deref(), Some("Dig deeper"));
        assert_eq!(record.rubric.as_deref(), Some("Talk to ten customers"));
        assert_eq!(record.image, None);
        assert_eq!(
            record.evaluation,
            vec![
                CriterionEvaluation {
                    criterion_id: f.criteria[0].clone(),
                    criterion_name: "Clarity".to_string(),
                    grade: Some(2),
                },
                CriterionEvaluation {
                    criterion_id: f.criteria[1].clone(),
                    criterion_name: "Depth".to_string(),
                    grade: None,
                },
            ]
        );
    }

    #[test]
    fn test_json_uses_camel_case_and_nulls() {
        let f = fixture();
        f.add_event(&f.founder, "Interviewed five users", 1);

        let json = serde_json::to_value(f.review().unwrap()).unwrap();
        let record = &json[0];
        assert!(record.get("eventOn").is_some());
        assert!(record.get("founderIds").is_some());
        assert!(record["latestFeedback"].is_null());
        assert!(record["image"].is_null());
        assert_eq!(record["evaluation"][0]["criterionName"], "Clarity");
        assert!(record["evaluation"][0]["grade"].is_null());
    }

    #[test]
    fn test_missing_target_is_not_found() {
        let f = fixture();
        let startup_id = f
            .store
            .read(|db| db.founder(&f.founder).unwrap().startup_id.clone().unwrap())
            .unwrap();
        let event = TimelineEvent::builder(
            startup_id,
            f.founder.clone(),
            f.event_type.clone(),
            NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
        )
        .description("No target")
        .build();
        f.insert(event);

        assert!(matches!(
            f.review(),
            Err(ReviewError::NotFound { ref kind, .. }) if kind == "target"
        ));
    }

    #[test]
    fn test_unknown_faculty() {
        let f = fixture();
        let result = ReviewableTimelineEvents::new(f.store.clone())
            .timeline_events(&FacultyId::from("faculty-missing"), &f.course);
        assert!(matches!(result, Err(ReviewError::NotFound { .. })));
    }

    #[test]
    fn test_reads_persisted_store() {
        let dir = tempdir().unwrap();
        {
            let f = fixture_with(Store::open(dir.path()).unwrap());
            f.add_event(&f.founder, "Persisted", 1);
        }
        let store = Arc::new(Store::open(dir.path()).unwrap());
        let (faculty, course) = store
            .read(|db| {
                let faculty = db.faculty.keys().next().cloned().unwrap();
                let course = db
                    .levels
                    .values()
                    .find(|l| l.number == 2)
                    .map(|l| l.course_id.clone())
                    .unwrap();
                (faculty, course)
            })
            .unwrap();

        let records = ReviewableTimelineEvents::new(store)
            .timeline_events(&faculty, &course)
            .unwrap();
        assert_eq!(records.len(), 1);
    }
}
