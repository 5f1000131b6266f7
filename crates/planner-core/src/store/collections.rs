//! Create and mutate operations on the six collections.
//!
//! Inputs mirror the planner's entry forms: free strings, no validation.
//! Each operation persists before returning.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::Store;
use crate::entities::{
    find_mut, Assignment, Course, EntityId, EntityKind, Exam, Habit, Note, Priority, Task,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCourse {
    pub title: String,
    pub teacher: String,
    pub days: Vec<String>,
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewAssignment {
    pub title: String,
    pub course: String,
    pub due_date: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewExam {
    pub title: String,
    pub course: String,
    pub date: String,
    pub time: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewHabit {
    pub title: String,
    pub target: i64,
    pub measure: String,
}

impl Store {
    fn next_id(&self) -> EntityId {
        self.clock.now_millis()
    }

    fn created(&self, kind: EntityKind, id: EntityId) -> EntityId {
        debug!(kind = %kind, id, "created entity");
        self.save();
        id
    }

    pub fn add_course(&mut self, input: NewCourse) -> EntityId {
        let id = self.next_id();
        self.data.courses.push(Course {
            id,
            title: input.title,
            teacher: input.teacher,
            days: input.days,
            start: input.start,
            end: input.end,
        });
        self.created(EntityKind::Course, id)
    }

    pub fn add_assignment(&mut self, input: NewAssignment) -> EntityId {
        let id = self.next_id();
        self.data.assignments.push(Assignment {
            id,
            title: input.title,
            course: input.course,
            due_date: input.due_date,
            priority: input.priority,
            completed: false,
        });
        self.created(EntityKind::Assignment, id)
    }

    pub fn add_exam(&mut self, input: NewExam) -> EntityId {
        let id = self.next_id();
        self.data.exams.push(Exam {
            id,
            title: input.title,
            course: input.course,
            date: input.date,
            time: input.time,
            completed: false,
        });
        self.created(EntityKind::Exam, id)
    }

    pub fn add_habit(&mut self, input: NewHabit) -> EntityId {
        let id = self.next_id();
        self.data.habits.push(Habit {
            id,
            title: input.title,
            target: input.target,
            measure: input.measure,
            current: 0,
        });
        self.created(EntityKind::Habit, id)
    }

    pub fn add_task(&mut self, title: impl Into<String>) -> EntityId {
        let id = self.next_id();
        self.data.tasks.push(Task {
            id,
            title: title.into(),
            completed: false,
        });
        self.created(EntityKind::Task, id)
    }

    pub fn add_note(&mut self, text: impl Into<String>) -> EntityId {
        let id = self.next_id();
        self.data.notes.push(Note {
            id,
            text: text.into(),
        });
        self.created(EntityKind::Note, id)
    }

    /// Checks or unchecks an assignment, exam or task. Returns false when no
    /// such checkable entity exists; the record is persisted either way.
    pub fn set_completed(&mut self, kind: EntityKind, id: EntityId, completed: bool) -> bool {
        let found = self.data.set_completed(kind, id, completed);
        if !found {
            warn!(kind = %kind, id, "toggle target not found");
        }
        self.save();
        found
    }

    /// Flips `completed` and returns the new value.
    pub fn toggle_completed(&mut self, kind: EntityKind, id: EntityId) -> Option<bool> {
        let next = !self.data.completed(kind, id)?;
        self.set_completed(kind, id, next);
        Some(next)
    }

    /// Adds one to a habit's counter. The counter may pass the target.
    pub fn bump_habit(&mut self, id: EntityId) -> Option<i64> {
        let habit = find_mut(&mut self.data.habits, id)?;
        habit.current = habit.current.saturating_add(1);
        let current = habit.current;
        self.save();
        Some(current)
    }

    /// Course titles in stored order, for the assignment/exam course picker.
    pub fn course_titles(&self) -> Vec<&str> {
        self.data.courses.iter().map(|c| c.title.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::FixedClock;
    use crate::storage::MemoryMedium;
    use std::sync::Arc;

    fn store() -> Store {
        Store::new(
            Box::new(MemoryMedium::new()),
            Arc::new(FixedClock::at(2024, 3, 4, 9, 30)),
        )
    }

    #[test]
    fn new_entities_start_unfinished() {
        let mut store = store();
        let a = store.add_assignment(NewAssignment {
            title: "Lab report".into(),
            due_date: "2024-03-08".into(),
            ..NewAssignment::default()
        });
        let h = store.add_habit(NewHabit {
            title: "Read".into(),
            target: 20,
            measure: "pages".into(),
        });
        assert!(!store.data().assignments[0].completed);
        assert_eq!(store.data().habits[0].current, 0);
        assert_ne!(a, h);
    }

    #[test]
    fn toggle_completed_flips_tasks() {
        let mut store = store();
        let id = store.add_task("Laundry");
        assert_eq!(store.toggle_completed(EntityKind::Task, id), Some(true));
        assert_eq!(store.toggle_completed(EntityKind::Task, id), Some(false));
    }

    #[test]
    fn notes_cannot_be_completed() {
        let mut store = store();
        let id = store.add_note("remember");
        assert!(!store.set_completed(EntityKind::Note, id, true));
        assert_eq!(store.toggle_completed(EntityKind::Note, id), None);
    }

    #[test]
    fn bump_habit_can_exceed_target() {
        let mut store = store();
        let id = store.add_habit(NewHabit {
            title: "Stretch".into(),
            target: 1,
            measure: "sets".into(),
        });
        store.bump_habit(id);
        assert_eq!(store.bump_habit(id), Some(2));
        assert!(store.data().habits[0].reached_target());
        assert_eq!(store.bump_habit(404), None);
    }

    #[test]
    fn bump_habit_stops_at_the_largest_count() {
        let mut store = store();
        let id = store.add_habit(NewHabit {
            title: "Water".into(),
            target: 8,
            measure: "glasses".into(),
        });
        store.data.habits[0].current = i64::MAX;
        assert_eq!(store.bump_habit(id), Some(i64::MAX));
    }

    #[test]
    fn course_titles_follow_insertion_order() {
        let mut store = store();
        for title in ["Physics", "Art"] {
            store.add_course(NewCourse {
                title: title.into(),
                ..NewCourse::default()
            });
        }
        assert_eq!(store.course_titles(), vec!["Physics", "Art"]);
    }
}
