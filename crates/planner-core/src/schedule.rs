//! Shared schedule projections: courses per weekday and the merged list of
//! dated items (assignments + exams).

use chrono::NaiveDate;
use serde::Serialize;

use crate::calendar::parse_item_date;
use crate::entities::{Course, EntityId, EntityKind, Priority};
use crate::store::StoreData;

/// Courses meeting on `weekday`, ordered by start time.
///
/// Start times compare as strings, which orders zero-padded "HH:MM"
/// correctly. The sort is stable, so equal starts keep stored order.
pub fn courses_on<'a>(courses: &'a [Course], weekday: &str) -> Vec<&'a Course> {
    let mut matching: Vec<&Course> = courses.iter().filter(|c| c.meets_on(weekday)).collect();
    matching.sort_by(|a, b| a.start.cmp(&b.start));
    matching
}

/// An assignment or exam, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatedItem {
    pub kind: EntityKind,
    pub id: EntityId,
    pub title: String,
    pub course: String,
    /// The stored string (`dueDate` or `date`).
    pub raw_date: String,
    pub date: Option<NaiveDate>,
    /// Exams only.
    pub time: Option<String>,
    pub priority: Priority,
    pub completed: bool,
}

impl DatedItem {
    /// Dated strictly before `today`. Undated items are never past due.
    pub fn is_past_due(&self, today: NaiveDate) -> bool {
        self.date.is_some_and(|d| d < today)
    }
}

/// Assignments then exams, sorted ascending by date. Items whose date does
/// not parse sort after every dated item, keeping their relative order.
pub fn dated_items(data: &StoreData) -> Vec<DatedItem> {
    let assignments = data.assignments.iter().map(|a| DatedItem {
        kind: EntityKind::Assignment,
        id: a.id,
        title: a.title.clone(),
        course: a.course.clone(),
        raw_date: a.due_date.clone(),
        date: parse_item_date(&a.due_date),
        time: None,
        priority: a.priority,
        completed: a.completed,
    });
    let exams = data.exams.iter().map(|e| DatedItem {
        kind: EntityKind::Exam,
        id: e.id,
        title: e.title.clone(),
        course: e.course.clone(),
        raw_date: e.date.clone(),
        date: parse_item_date(&e.date),
        time: Some(e.time.clone()).filter(|t| !t.trim().is_empty()),
        priority: Priority::Normal,
        completed: e.completed,
    });

    let mut items: Vec<DatedItem> = assignments.chain(exams).collect();
    items.sort_by_key(|item| (item.date.is_none(), item.date));
    items
}
