//! Dashboard rendering.
//!
//! Rendering is two steps. [`project`] turns the record, a view mode and an
//! instant into a [`Dashboard`] render model (plain data, testable without
//! any markup). [`html`] turns that model into page markup. Every render
//! rebuilds every region from scratch.

pub mod html;
mod model;
mod project;

pub use model::{
    CourseSlot, Dashboard, DayColumn, FocusCard, Header, HabitRow, NoteRow, OverviewCard,
    ScheduleModel, TaskRow, UpcomingRow,
};
pub use project::{
    project, project_focus, project_habits, project_notes, project_schedule, project_tasks,
    project_upcoming, DEFAULT_UPCOMING_LIMIT,
};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The schedule panel's mode.
///
/// `Month` and `Year` currently project the same overview and differ only in
/// label and icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewMode {
    Day,
    #[default]
    Week,
    Month,
    Year,
}

impl ViewMode {
    pub const ALL: [ViewMode; 4] = [ViewMode::Day, ViewMode::Week, ViewMode::Month, ViewMode::Year];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Day => "Day",
            ViewMode::Week => "Week",
            ViewMode::Month => "Month",
            ViewMode::Year => "Year",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ViewMode::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown view mode: {s} (expected day, week, month or year)"))
    }
}
