//! In-memory record set persisted as one snapshot.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use foundry_models::{
    Batch, CalendarEvent, CalendarEventId, Course, CourseId, EvaluationCriterion,
    EvaluationCriterionId, Faculty, FacultyId, Founder, FounderId, Level, LevelId, Startup,
    StartupFeedback, StartupId, Target, TargetId, TimelineEvent, TimelineEventFile,
    TimelineEventFileId, TimelineEventGrade, TimelineEventId, TimelineEventType,
    TimelineEventTypeId,
};

use crate::error::{PersistenceError, Result};

/// Every record Foundry stores.
///
/// Keyed collections use `HashMap`; collections whose stored order is
/// meaningful (attachment files, feedback, grades) are kept as `Vec` in
/// insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Database {
    #[serde(default)]
    pub founders: HashMap<FounderId, Founder>,
    #[serde(default)]
    pub startups: HashMap<StartupId, Startup>,
    #[serde(default)]
    pub batches: Vec<Batch>,
    #[serde(default)]
    pub courses: HashMap<CourseId, Course>,
    #[serde(default)]
    pub levels: HashMap<LevelId, Level>,
    #[serde(default)]
    pub targets: HashMap<TargetId, Target>,
    #[serde(default)]
    pub evaluation_criteria: HashMap<EvaluationCriterionId, EvaluationCriterion>,
    #[serde(default)]
    pub faculty: HashMap<FacultyId, Faculty>,
    #[serde(default)]
    pub event_types: HashMap<TimelineEventTypeId, TimelineEventType>,
    #[serde(default)]
    pub timeline_events: HashMap<TimelineEventId, TimelineEvent>,
    #[serde(default)]
    pub timeline_event_files: Vec<TimelineEventFile>,
    #[serde(default)]
    pub timeline_event_grades: Vec<TimelineEventGrade>,
    #[serde(default)]
    pub startup_feedback: Vec<StartupFeedback>,
    #[serde(default)]
    pub calendar_events: HashMap<CalendarEventId, CalendarEvent>,
}

macro_rules! lookup {
    ($get:ident, $get_mut:ident, $field:ident, $id:ty, $record:ty, $kind:literal) => {
        pub fn $get(&self, id: &$id) -> Result<&$record> {
            self.$field
                .get(id)
                .ok_or_else(|| PersistenceError::not_found($kind, id))
        }

        pub fn $get_mut(&mut self, id: &$id) -> Result<&mut $record> {
            self.$field
                .get_mut(id)
                .ok_or_else(|| PersistenceError::not_found($kind, id))
        }
    };
}

impl Database {
    lookup!(founder, founder_mut, founders, FounderId, Founder, "founder");
    lookup!(startup, startup_mut, startups, StartupId, Startup, "startup");
    lookup!(level, level_mut, levels, LevelId, Level, "level");
    lookup!(target, target_mut, targets, TargetId, Target, "target");
    lookup!(
        criterion,
        criterion_mut,
        evaluation_criteria,
        EvaluationCriterionId,
        EvaluationCriterion,
        "evaluation criterion"
    );
    lookup!(faculty_member, faculty_member_mut, faculty, FacultyId, Faculty, "faculty");
    lookup!(
        event_type,
        event_type_mut,
        event_types,
        TimelineEventTypeId,
        TimelineEventType,
        "timeline event type"
    );
    lookup!(
        timeline_event,
        timeline_event_mut,
        timeline_events,
        TimelineEventId,
        TimelineEvent,
        "timeline event"
    );

    pub fn insert_founder(&mut self, founder: Founder) {
        self.founders.insert(founder.id.clone(), founder);
    }

    pub fn insert_startup(&mut self, startup: Startup) {
        self.startups.insert(startup.id.clone(), startup);
    }

    pub fn insert_course(&mut self, course: Course) {
        self.courses.insert(course.id.clone(), course);
    }

    pub fn insert_level(&mut self, level: Level) {
        self.levels.insert(level.id.clone(), level);
    }

    pub fn insert_target(&mut self, target: Target) {
        self.targets.insert(target.id.clone(), target);
    }

    pub fn insert_criterion(&mut self, criterion: EvaluationCriterion) {
        self.evaluation_criteria.insert(criterion.id.clone(), criterion);
    }

    pub fn insert_faculty(&mut self, faculty: Faculty) {
        self.faculty.insert(faculty.id.clone(), faculty);
    }

    pub fn insert_event_type(&mut self, event_type: TimelineEventType) {
        self.event_types.insert(event_type.id.clone(), event_type);
    }

    pub fn insert_timeline_event(&mut self, event: TimelineEvent) {
        self.timeline_events.insert(event.id.clone(), event);
    }

    pub fn insert_calendar_event(&mut self, event: CalendarEvent) {
        self.calendar_events.insert(event.id.clone(), event);
    }

    /// Founders who are members of the given startup.
    pub fn founders_of<'a>(&'a self, startup_id: &'a StartupId) -> impl Iterator<Item = &'a Founder> {
        self.founders.values().filter(move |f| f.belongs_to(startup_id))
    }

    /// Files attached to an event, in stored order.
    pub fn files_for(&self, event_id: &TimelineEventId) -> Vec<&TimelineEventFile> {
        self.timeline_event_files
            .iter()
            .filter(|f| &f.timeline_event_id == event_id)
            .collect()
    }

    pub fn add_file(&mut self, file: TimelineEventFile) {
        self.timeline_event_files.push(file);
    }

    /// Removes one file of an event; the file must belong to that event.
    pub fn remove_file(
        &mut self,
        event_id: &TimelineEventId,
        file_id: &TimelineEventFileId,
    ) -> Result<TimelineEventFile> {
        let index = self
            .timeline_event_files
            .iter()
            .position(|f| &f.id == file_id && &f.timeline_event_id == event_id)
            .ok_or_else(|| PersistenceError::not_found("timeline event file", file_id))?;
        Ok(self.timeline_event_files.remove(index))
    }

    /// Feedback on an event, oldest first.
    pub fn feedback_for(&self, event_id: &TimelineEventId) -> Vec<&StartupFeedback> {
        self.startup_feedback
            .iter()
            .filter(|f| &f.timeline_event_id == event_id)
            .collect()
    }

    pub fn has_feedback(&self, event_id: &TimelineEventId) -> bool {
        self.startup_feedback
            .iter()
            .any(|f| &f.timeline_event_id == event_id)
    }

    pub fn add_feedback(&mut self, feedback: StartupFeedback) {
        self.startup_feedback.push(feedback);
    }

    pub fn grade_for(
        &self,
        event_id: &TimelineEventId,
        criterion_id: &EvaluationCriterionId,
    ) -> Option<&TimelineEventGrade> {
        self.timeline_event_grades.iter().find(|g| {
            &g.timeline_event_id == event_id && &g.evaluation_criterion_id == criterion_id
        })
    }

    /// Inserts a criterion grade, replacing any earlier grade for the pair.
    pub fn upsert_grade(&mut self, grade: TimelineEventGrade) {
        self.timeline_event_grades.retain(|g| {
            !(g.timeline_event_id == grade.timeline_event_id
                && g.evaluation_criterion_id == grade.evaluation_criterion_id)
        });
        self.timeline_event_grades.push(grade);
    }

    /// Removes an event and everything that hangs off it.
    pub fn remove_timeline_event(&mut self, event_id: &TimelineEventId) -> Result<TimelineEvent> {
        let event = self
            .timeline_events
            .remove(event_id)
            .ok_or_else(|| PersistenceError::not_found("timeline event", event_id))?;
        self.timeline_event_files
            .retain(|f| &f.timeline_event_id != event_id);
        self.timeline_event_grades
            .retain(|g| &g.timeline_event_id != event_id);
        self.startup_feedback
            .retain(|f| &f.timeline_event_id != event_id);
        Ok(event)
    }
}
