use serde::Serialize;

use super::ViewMode;
use crate::entities::{EntityId, EntityKind};

/// Everything one render cycle shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub view: ViewMode,
    pub dark_mode: bool,
    pub header: Header,
    pub schedule: ScheduleModel,
    pub upcoming: Vec<UpcomingRow>,
    pub habits: Vec<HabitRow>,
    pub tasks: Vec<TaskRow>,
    pub notes: Vec<NoteRow>,
    pub focus: FocusCard,
    /// Choices for the course picker on the assignment/exam forms.
    pub course_options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Header {
    /// `HH:MM`
    pub clock: String,
    /// `Monday, March 4`
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "layout", content = "content", rename_all = "snake_case")]
pub enum ScheduleModel {
    /// Today's column only.
    Day(DayColumn),
    /// Monday through Sunday.
    Week(Vec<DayColumn>),
    /// Assignments and exams by date. Shared by Month and Year.
    Overview {
        mode: ViewMode,
        cards: Vec<OverviewCard>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayColumn {
    pub day: String,
    pub weekend: bool,
    pub courses: Vec<CourseSlot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseSlot {
    pub id: EntityId,
    pub title: String,
    pub teacher: String,
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewCard {
    pub kind: EntityKind,
    pub id: EntityId,
    pub title: String,
    pub course: String,
    /// Locale date, or "Invalid Date" when the stored date does not parse.
    pub due_label: String,
    pub time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpcomingRow {
    pub kind: EntityKind,
    pub id: EntityId,
    pub title: String,
    pub course: String,
    pub raw_date: String,
    pub high_priority: bool,
    pub completed: bool,
    pub past_due: bool,
}

impl UpcomingRow {
    /// Completed or past-due rows delete without a prompt.
    pub fn skip_confirm(&self) -> bool {
        self.completed || self.past_due
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HabitRow {
    pub id: EntityId,
    pub title: String,
    pub current: i64,
    pub target: i64,
    pub measure: String,
    /// Progress bar width, 0..=100.
    pub progress: u8,
    pub reached: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskRow {
    pub id: EntityId,
    pub title: String,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteRow {
    pub id: EntityId,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FocusCard {
    pub title: Option<String>,
    pub subtitle: String,
}
