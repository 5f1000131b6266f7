//! Record -> render model. No markup in here.

use chrono::{Datelike, NaiveDateTime};

use super::model::{
    CourseSlot, Dashboard, DayColumn, FocusCard, HabitRow, Header, NoteRow, OverviewCard,
    ScheduleModel, TaskRow, UpcomingRow,
};
use super::ViewMode;
use crate::calendar::{clock_label, is_weekend, locale_date, long_date, weekday_name, WEEK};
use crate::entities::{Course, Habit, Priority};
use crate::focus::focus_course;
use crate::schedule::{courses_on, dated_items};
use crate::store::StoreData;

/// How many items the upcoming widget lists.
pub const DEFAULT_UPCOMING_LIMIT: usize = 5;

/// One full render cycle.
pub fn project(
    data: &StoreData,
    view: ViewMode,
    now: NaiveDateTime,
    upcoming_limit: usize,
) -> Dashboard {
    Dashboard {
        view,
        dark_mode: data.dark_mode,
        header: Header {
            clock: clock_label(now.time()),
            date: long_date(now.date()),
        },
        schedule: project_schedule(data, view, now),
        upcoming: project_upcoming(data, now, upcoming_limit),
        habits: project_habits(data),
        tasks: project_tasks(data),
        notes: project_notes(data),
        focus: project_focus(data, now),
        course_options: data.courses.iter().map(|c| c.title.clone()).collect(),
    }
}

fn column(courses: &[Course], day: &str) -> DayColumn {
    DayColumn {
        day: day.to_string(),
        weekend: is_weekend(day),
        courses: courses_on(courses, day)
            .into_iter()
            .map(|c| CourseSlot {
                id: c.id,
                title: c.title.clone(),
                teacher: c.teacher.clone(),
                start: c.start.clone(),
                end: c.end.clone(),
            })
            .collect(),
    }
}

pub fn project_schedule(data: &StoreData, view: ViewMode, now: NaiveDateTime) -> ScheduleModel {
    match view {
        ViewMode::Day => ScheduleModel::Day(column(&data.courses, weekday_name(now.weekday()))),
        ViewMode::Week => {
            ScheduleModel::Week(WEEK.iter().map(|day| column(&data.courses, day)).collect())
        }
        ViewMode::Month | ViewMode::Year => ScheduleModel::Overview {
            mode: view,
            cards: dated_items(data)
                .into_iter()
                .map(|item| OverviewCard {
                    kind: item.kind,
                    id: item.id,
                    title: item.title,
                    course: item.course,
                    due_label: item
                        .date
                        .map(locale_date)
                        .unwrap_or_else(|| "Invalid Date".to_string()),
                    time: item.time,
                })
                .collect(),
        },
    }
}

/// The first `limit` dated items, flagged past due against midnight today.
pub fn project_upcoming(data: &StoreData, now: NaiveDateTime, limit: usize) -> Vec<UpcomingRow> {
    let today = now.date();
    dated_items(data)
        .into_iter()
        .take(limit)
        .map(|item| UpcomingRow {
            past_due: item.is_past_due(today),
            kind: item.kind,
            id: item.id,
            title: item.title,
            course: item.course,
            raw_date: item.raw_date,
            high_priority: item.priority == Priority::High,
            completed: item.completed,
        })
        .collect()
}

fn progress(habit: &Habit) -> u8 {
    if habit.target <= 0 {
        return if habit.current > 0 { 100 } else { 0 };
    }
    let pct = habit.current.max(0) as f64 / habit.target as f64 * 100.0;
    pct.min(100.0) as u8
}

pub fn project_habits(data: &StoreData) -> Vec<HabitRow> {
    data.habits
        .iter()
        .map(|h| HabitRow {
            id: h.id,
            title: h.title.clone(),
            current: h.current,
            target: h.target,
            measure: h.measure.clone(),
            progress: progress(h),
            reached: h.reached_target(),
        })
        .collect()
}

pub fn project_tasks(data: &StoreData) -> Vec<TaskRow> {
    data.tasks
        .iter()
        .map(|t| TaskRow {
            id: t.id,
            title: t.title.clone(),
            completed: t.completed,
        })
        .collect()
}

pub fn project_notes(data: &StoreData) -> Vec<NoteRow> {
    data.notes
        .iter()
        .map(|n| NoteRow {
            id: n.id,
            text: n.text.clone(),
        })
        .collect()
}

pub fn project_focus(data: &StoreData, now: NaiveDateTime) -> FocusCard {
    let focus = focus_course(&data.courses, now);
    FocusCard {
        title: focus.course().map(|c| c.title.clone()),
        subtitle: focus.subtitle(),
    }
}
