//! The planner record: everything the user has entered, as one JSON object.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::merge::shallow_merge;
use crate::entities::{
    find_mut, remove_by_id, Assignment, Course, Entity, EntityId, EntityKind, Exam, Habit, Note,
    Task,
};
use crate::error::StoreError;

/// The persisted record.
///
/// Top-level fields this build does not know about are kept in `extra` and
/// written back unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreData {
    pub dark_mode: bool,
    pub courses: Vec<Course>,
    pub assignments: Vec<Assignment>,
    pub exams: Vec<Exam>,
    pub habits: Vec<Habit>,
    pub tasks: Vec<Task>,
    pub notes: Vec<Note>,
    /// Locale date string of the last habit reset.
    pub last_habit_reset: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StoreData {
    /// A fresh record whose habit reset marker is `today`.
    pub fn defaults(today: &str) -> Self {
        Self {
            last_habit_reset: today.to_string(),
            ..Self::default()
        }
    }

    pub fn to_value(&self) -> Result<Value, StoreError> {
        Ok(serde_json::to_value(self)?)
    }

    /// `{...self, ...overlay}` followed by a typed re-read.
    ///
    /// # Errors
    ///
    /// Fails when `overlay` is not an object or a merged field no longer fits
    /// the schema; `self` is not touched in that case.
    pub fn merged_with(&self, overlay: &Value) -> Result<Self, StoreError> {
        if !overlay.is_object() {
            return Err(StoreError::NotAnObject);
        }
        let merged = shallow_merge(&self.to_value()?, overlay);
        Ok(serde_json::from_value(merged)?)
    }

    pub fn len(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Course => self.courses.len(),
            EntityKind::Assignment => self.assignments.len(),
            EntityKind::Exam => self.exams.len(),
            EntityKind::Habit => self.habits.len(),
            EntityKind::Task => self.tasks.len(),
            EntityKind::Note => self.notes.len(),
        }
    }

    pub fn contains(&self, kind: EntityKind, id: EntityId) -> bool {
        fn any<T: Entity>(items: &[T], id: EntityId) -> bool {
            items.iter().any(|item| item.id() == id)
        }
        match kind {
            EntityKind::Course => any(&self.courses, id),
            EntityKind::Assignment => any(&self.assignments, id),
            EntityKind::Exam => any(&self.exams, id),
            EntityKind::Habit => any(&self.habits, id),
            EntityKind::Task => any(&self.tasks, id),
            EntityKind::Note => any(&self.notes, id),
        }
    }

    /// Drops every entity of `kind` carrying `id`; other collections are
    /// untouched. Returns the number removed.
    pub fn remove(&mut self, kind: EntityKind, id: EntityId) -> usize {
        match kind {
            EntityKind::Course => remove_by_id(&mut self.courses, id),
            EntityKind::Assignment => remove_by_id(&mut self.assignments, id),
            EntityKind::Exam => remove_by_id(&mut self.exams, id),
            EntityKind::Habit => remove_by_id(&mut self.habits, id),
            EntityKind::Task => remove_by_id(&mut self.tasks, id),
            EntityKind::Note => remove_by_id(&mut self.notes, id),
        }
    }

    /// `Some(completed)` for a checkable entity that exists.
    pub fn completed(&self, kind: EntityKind, id: EntityId) -> Option<bool> {
        fn lookup<T: Entity>(items: &[T], id: EntityId) -> Option<bool> {
            items.iter().find(|item| item.id() == id)?.completed()
        }
        match kind {
            EntityKind::Assignment => lookup(&self.assignments, id),
            EntityKind::Exam => lookup(&self.exams, id),
            EntityKind::Task => lookup(&self.tasks, id),
            _ => None,
        }
    }

    /// Sets `completed` on the first checkable entity with `id`.
    pub fn set_completed(&mut self, kind: EntityKind, id: EntityId, completed: bool) -> bool {
        fn apply<T: Entity>(items: &mut [T], id: EntityId, completed: bool) -> bool {
            find_mut(items, id).is_some_and(|item| item.set_completed(completed))
        }
        match kind {
            EntityKind::Assignment => apply(&mut self.assignments, id, completed),
            EntityKind::Exam => apply(&mut self.exams, id, completed),
            EntityKind::Task => apply(&mut self.tasks, id, completed),
            _ => false,
        }
    }

    /// The stored date string of an assignment (`dueDate`) or exam (`date`).
    pub fn item_date(&self, kind: EntityKind, id: EntityId) -> Option<&str> {
        match kind {
            EntityKind::Assignment => self
                .assignments
                .iter()
                .find(|a| a.id == id)
                .map(|a| a.due_date.as_str()),
            EntityKind::Exam => self
                .exams
                .iter()
                .find(|e| e.id == id)
                .map(|e| e.date.as_str()),
            _ => None,
        }
    }
}
