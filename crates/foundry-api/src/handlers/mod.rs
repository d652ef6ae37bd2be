//! API request handlers.

pub mod admin;
pub mod calendar;
pub mod health;
pub mod review;
pub mod timeline_events;

pub use admin::*;
pub use calendar::*;
pub use health::*;
pub use review::*;
pub use timeline_events::*;

#[cfg(test)]
pub(crate) mod fixtures {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use url::Url;

    use foundry_models::{
        Course, CourseId, EvaluationCriterion, EvaluationCriterionId, EventTypeRole, Faculty,
        FacultyId, Founder, FounderId, Level, LevelId, Startup, StartupId, Target, TargetId,
        TimelineEvent, TimelineEventId, TimelineEventType, TimelineEventTypeId,
    };
    use foundry_persistence::{Database, Store};
    use foundry_timeline::RecordingNotifier;

    use crate::config::ApiConfig;
    use crate::state::AppState;

    /// A startup with two founders, a coach and a graded target.
    pub struct World {
        pub state: AppState,
        pub notifier: Arc<RecordingNotifier>,
        pub startup_id: StartupId,
        pub founder_id: FounderId,
        pub cofounder_id: FounderId,
        pub faculty_id: FacultyId,
        pub course_id: CourseId,
        pub target_id: TargetId,
        pub criterion_id: EvaluationCriterionId,
        pub product_type: TimelineEventTypeId,
        pub personal_type: TimelineEventTypeId,
        pub event_id: TimelineEventId,
    }

    pub fn world() -> World {
        let mut db = Database::default();

        let course = Course {
            id: CourseId::new(),
            name: "Startup School".to_string(),
        };
        let level = Level {
            id: LevelId::new(),
            course_id: course.id.clone(),
            number: 1,
            name: "Ideation".to_string(),
        };
        let criterion = EvaluationCriterion {
            id: EvaluationCriterionId::new(),
            name: "Quality".to_string(),
            description: None,
        };
        let target = Target {
            id: TargetId::new(),
            level_id: level.id.clone(),
            title: "Build a prototype".to_string(),
            points_earnable: 20,
            rubric_description: None,
            evaluation_criteria: vec![criterion.id.clone()],
        };
        let mut startup = Startup::new("Acme", "acme");
        startup.level_id = Some(level.id.clone());
        let founder = Founder::new("Ada", "ada@example.com").in_startup(startup.id.clone());
        let cofounder = Founder::new("Grace", "grace@example.com").in_startup(startup.id.clone());
        let faculty = Faculty {
            id: FacultyId::new(),
            name: "Coach Carter".to_string(),
            startup_ids: vec![startup.id.clone()],
        };
        let product_type = TimelineEventType::new("team_update", "Team Update", EventTypeRole::Product);
        let personal_type = TimelineEventType::new("learning", "Learning", EventTypeRole::Founder);

        let event = TimelineEvent::builder(
            startup.id.clone(),
            founder.id.clone(),
            product_type.id.clone(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        )
        .description("Shipped the prototype")
        .target(target.id.clone())
        .build();

        let world_ids = (
            startup.id.clone(),
            founder.id.clone(),
            cofounder.id.clone(),
            faculty.id.clone(),
            course.id.clone(),
            target.id.clone(),
            criterion.id.clone(),
            product_type.id.clone(),
            personal_type.id.clone(),
            event.id.clone(),
        );

        db.insert_course(course);
        db.insert_level(level);
        db.insert_criterion(criterion);
        db.insert_target(target);
        db.insert_startup(startup);
        db.insert_founder(founder);
        db.insert_founder(cofounder);
        db.insert_faculty(faculty);
        db.insert_event_type(product_type);
        db.insert_event_type(personal_type);
        db.insert_timeline_event(event);

        let notifier = Arc::new(RecordingNotifier::default());
        let config = ApiConfig::default()
            .with_public_url(Url::parse("https://www.example.com").unwrap());
        let state = AppState::new(
            config,
            Arc::new(Store::with_database(db)),
            notifier.clone(),
        )
        .unwrap();

        let (
            startup_id,
            founder_id,
            cofounder_id,
            faculty_id,
            course_id,
            target_id,
            criterion_id,
            product_type,
            personal_type,
            event_id,
        ) = world_ids;

        World {
            state,
            notifier,
            startup_id,
            founder_id,
            cofounder_id,
            faculty_id,
            course_id,
            target_id,
            criterion_id,
            product_type,
            personal_type,
            event_id,
        }
    }
}
