//! Planner entities: the six record kinds kept in the store.
//!
//! Every entity carries an integer id equal to its creation timestamp in
//! milliseconds. Uniqueness is best-effort: two entities created in the same
//! millisecond share an id, and removal by id drops both.
//!
//! Field names on disk are camelCase (`dueDate`, `lastHabitReset`) so a record
//! written by any earlier build of the planner loads unchanged.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Entity identifier (creation time in epoch milliseconds).
pub type EntityId = i64;

/// The six entity kinds. Replaces string-keyed dispatch on `"course"`,
/// `"assignment"`, ... with an exhaustive enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Course,
    Assignment,
    Exam,
    Habit,
    Task,
    Note,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Course,
        EntityKind::Assignment,
        EntityKind::Exam,
        EntityKind::Habit,
        EntityKind::Task,
        EntityKind::Note,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Course => "course",
            EntityKind::Assignment => "assignment",
            EntityKind::Exam => "exam",
            EntityKind::Habit => "habit",
            EntityKind::Task => "task",
            EntityKind::Note => "note",
        }
    }

    /// Top-level key of this kind's collection in the stored record.
    pub fn collection_key(&self) -> &'static str {
        match self {
            EntityKind::Course => "courses",
            EntityKind::Assignment => "assignments",
            EntityKind::Exam => "exams",
            EntityKind::Habit => "habits",
            EntityKind::Task => "tasks",
            EntityKind::Note => "notes",
        }
    }

    /// Kinds with a `completed` checkbox.
    pub fn is_checkable(&self) -> bool {
        matches!(
            self,
            EntityKind::Assignment | EntityKind::Exam | EntityKind::Task
        )
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown entity kind: {s}"))
    }
}

/// Common accessors used by the collection table.
pub trait Entity {
    const KIND: EntityKind;

    fn id(&self) -> EntityId;

    /// `Some` for checkable kinds.
    fn completed(&self) -> Option<bool> {
        None
    }

    /// Returns false for kinds without a `completed` field.
    fn set_completed(&mut self, _completed: bool) -> bool {
        false
    }
}

/// A recurring weekly class.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Course {
    pub id: EntityId,
    pub title: String,
    pub teacher: String,
    /// Weekday names, e.g. `["Monday", "Wednesday"]`.
    pub days: Vec<String>,
    /// "HH:MM", 24-hour.
    pub start: String,
    pub end: String,
}

impl Course {
    pub fn meets_on(&self, weekday: &str) -> bool {
        self.days.iter().any(|d| d == weekday)
    }
}

/// Assignment priority. Only "High Priority" is distinguished by the UI;
/// anything else loads as `Normal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    #[default]
    Normal,
    High,
}

impl Priority {
    pub const HIGH_LABEL: &'static str = "High Priority";

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Normal => "Normal",
            Priority::High => Self::HIGH_LABEL,
        }
    }
}

impl FromStr for Priority {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == Self::HIGH_LABEL || s.eq_ignore_ascii_case("high") {
            Ok(Priority::High)
        } else {
            Ok(Priority::Normal)
        }
    }
}

impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value
            .as_deref()
            .map(|s| s.parse().unwrap_or_default())
            .unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Assignment {
    pub id: EntityId,
    pub title: String,
    /// Course title, not a course id. Renaming a course orphans the link.
    pub course: String,
    pub due_date: String,
    pub priority: Priority,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Exam {
    pub id: EntityId,
    pub title: String,
    pub course: String,
    pub date: String,
    pub time: String,
    pub completed: bool,
}

/// A daily counter. `current` may exceed `target`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Habit {
    pub id: EntityId,
    pub title: String,
    #[serde(deserialize_with = "lenient_int")]
    pub target: i64,
    pub measure: String,
    #[serde(deserialize_with = "lenient_int")]
    pub current: i64,
}

impl Habit {
    pub fn reached_target(&self) -> bool {
        self.current >= self.target
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Task {
    pub id: EntityId,
    pub title: String,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Note {
    pub id: EntityId,
    pub text: String,
}

macro_rules! plain_entity {
    ($ty:ty, $kind:expr) => {
        impl Entity for $ty {
            const KIND: EntityKind = $kind;

            fn id(&self) -> EntityId {
                self.id
            }
        }
    };
}

macro_rules! checkable_entity {
    ($ty:ty, $kind:expr) => {
        impl Entity for $ty {
            const KIND: EntityKind = $kind;

            fn id(&self) -> EntityId {
                self.id
            }

            fn completed(&self) -> Option<bool> {
                Some(self.completed)
            }

            fn set_completed(&mut self, completed: bool) -> bool {
                self.completed = completed;
                true
            }
        }
    };
}

plain_entity!(Course, EntityKind::Course);
plain_entity!(Habit, EntityKind::Habit);
plain_entity!(Note, EntityKind::Note);
checkable_entity!(Assignment, EntityKind::Assignment);
checkable_entity!(Exam, EntityKind::Exam);
checkable_entity!(Task, EntityKind::Task);

/// Removes every entity carrying `id`. Returns how many were dropped.
pub fn remove_by_id<T: Entity>(items: &mut Vec<T>, id: EntityId) -> usize {
    let before = items.len();
    items.retain(|item| item.id() != id);
    before - items.len()
}

pub fn find_mut<T: Entity>(items: &mut [T], id: EntityId) -> Option<&mut T> {
    items.iter_mut().find(|item| item.id() == id)
}

/// Accepts numbers, numeric strings and `null` (a form field that failed to
/// parse is stored as `null`). Anything unusable becomes 0.
fn lenient_int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("Assignment".parse::<EntityKind>(), Ok(EntityKind::Assignment));
        assert_eq!(" note ".parse::<EntityKind>(), Ok(EntityKind::Note));
        assert!("lecture".parse::<EntityKind>().is_err());
    }

    #[test]
    fn only_assignments_exams_and_tasks_are_checkable() {
        let checkable: Vec<_> = EntityKind::ALL
            .into_iter()
            .filter(EntityKind::is_checkable)
            .collect();
        assert_eq!(
            checkable,
            vec![EntityKind::Assignment, EntityKind::Exam, EntityKind::Task]
        );
    }

    #[test]
    fn assignment_uses_camel_case_due_date() {
        let a: Assignment = serde_json::from_value(serde_json::json!({
            "id": 1,
            "title": "Essay",
            "course": "History",
            "dueDate": "2024-03-10",
            "priority": "High Priority",
            "completed": false
        }))
        .unwrap();
        assert_eq!(a.due_date, "2024-03-10");
        assert_eq!(a.priority, Priority::High);

        let json = serde_json::to_value(&a).unwrap();
        assert_eq!(json["dueDate"], "2024-03-10");
        assert_eq!(json["priority"], "High Priority");
    }

    #[test]
    fn unknown_priority_loads_as_normal() {
        let a: Assignment =
            serde_json::from_value(serde_json::json!({"id": 1, "priority": "Medium"})).unwrap();
        assert_eq!(a.priority, Priority::Normal);
        let a: Assignment =
            serde_json::from_value(serde_json::json!({"id": 1, "priority": null})).unwrap();
        assert_eq!(a.priority, Priority::Normal);
    }

    #[test]
    fn habit_counters_tolerate_null_and_strings() {
        let h: Habit = serde_json::from_value(serde_json::json!({
            "id": 7,
            "title": "Water",
            "target": null,
            "measure": "glasses",
            "current": "3"
        }))
        .unwrap();
        assert_eq!(h.target, 0);
        assert_eq!(h.current, 3);
    }

    #[test]
    fn remove_by_id_drops_colliding_ids() {
        let mut notes = vec![
            Note { id: 5, text: "a".into() },
            Note { id: 6, text: "b".into() },
            Note { id: 5, text: "c".into() },
        ];
        assert_eq!(remove_by_id(&mut notes, 5), 2);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, 6);
    }
}
