//! Dashboard markup.
//!
//! Each region renders independently from the [`Dashboard`] model. All user
//! text passes through [`html_escape`] before it lands in the page. Actions
//! are exposed as `data-action` attributes for the page script to pick up.

use indoc::formatdoc;

use super::model::{
    CourseSlot, Dashboard, DayColumn, FocusCard, HabitRow, NoteRow, OverviewCard, ScheduleModel,
    TaskRow, UpcomingRow,
};
use super::ViewMode;
use crate::entities::EntityKind;

const WEEK_ACCENTS: [&str; 4] = [
    "var(--sunset-purple)",
    "var(--sunset-pink)",
    "var(--sunset-orange)",
    "var(--sunset-lavender)",
];
const MUTED_ACCENT: &str = "#E5E7EB";

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Icon and heading for the schedule panel.
pub fn schedule_title(view: ViewMode) -> (&'static str, &'static str) {
    match view {
        ViewMode::Day => ("today", "Today's Schedule"),
        ViewMode::Week => ("calendar_view_week", "Weekly Schedule"),
        ViewMode::Month => ("calendar_month", "Month Overview"),
        ViewMode::Year => ("view_timeline", "Year Overview"),
    }
}

fn delete_button(kind: EntityKind, id: i64, skip_confirm: bool, icon: &str) -> String {
    format!(
        r#"<span class="material-symbols-outlined delete" data-action="delete" data-kind="{kind}" data-id="{id}" data-skip-confirm="{skip_confirm}">{icon}</span>"#
    )
}

fn checkbox(kind: EntityKind, id: i64, checked: bool) -> String {
    let checked = if checked { " checked" } else { "" };
    format!(r#"<input type="checkbox" data-action="toggle" data-kind="{kind}" data-id="{id}"{checked}>"#)
}

fn course_slot(slot: &CourseSlot, accent: &str, with_teacher: bool) -> String {
    let teacher = if with_teacher && !slot.teacher.is_empty() {
        format!(" &bull; {}", html_escape(&slot.teacher))
    } else {
        String::new()
    };
    formatdoc! {r#"
        <div class="course-slot" style="border-left-color: {accent}">
          <p class="course-title">{title}</p>
          <p class="course-time">{start} - {end}{teacher}</p>
          {delete}
        </div>
        "#,
        title = html_escape(&slot.title),
        start = html_escape(&slot.start),
        end = html_escape(&slot.end),
        delete = delete_button(EntityKind::Course, slot.id, false, "delete"),
    }
}

fn day_column(column: &DayColumn, accent: &str) -> String {
    let body = if column.courses.is_empty() {
        let icon = if column.weekend { "weekend" } else { "event_busy" };
        format!(r#"<div class="empty-day"><span class="material-symbols-outlined">{icon}</span></div>"#)
    } else {
        column
            .courses
            .iter()
            .map(|slot| course_slot(slot, accent, false))
            .collect()
    };
    formatdoc! {r#"
        <div class="day-column" style="border-top-color: {accent}">
          <p class="day-name">{day}</p>
          <div class="day-courses">{body}</div>
        </div>
        "#,
        day = html_escape(&column.day),
    }
}

fn today_column(column: &DayColumn) -> String {
    let accent = WEEK_ACCENTS[0];
    let body = if column.courses.is_empty() {
        r#"<p class="empty">No classes today!</p>"#.to_string()
    } else {
        column
            .courses
            .iter()
            .map(|slot| course_slot(slot, accent, true))
            .collect()
    };
    formatdoc! {r#"
        <div class="day-column today" style="border-top-color: {accent}">
          <p class="day-name">{day}</p>
          <div class="day-courses">{body}</div>
        </div>
        "#,
        day = html_escape(&column.day),
    }
}

fn overview_card(card: &OverviewCard) -> String {
    let (icon, color) = match card.kind {
        EntityKind::Exam => ("school", "var(--sunset-orange)"),
        _ => ("assignment", "var(--sunset-pink)"),
    };
    let at = card
        .time
        .as_deref()
        .map(|t| format!(" at {}", html_escape(t)))
        .unwrap_or_default();
    formatdoc! {r#"
        <div class="overview-card" style="border-left-color: {color}">
          <div class="overview-kind"><span class="material-symbols-outlined" style="color: {color}">{icon}</span><p>{kind}</p>{delete}</div>
          <h4>{title}</h4>
          <p class="overview-course">{course}</p>
          <div class="overview-due">Due: {due}{at}</div>
        </div>
        "#,
        kind = card.kind,
        delete = delete_button(card.kind, card.id, false, "delete"),
        title = html_escape(&card.title),
        course = html_escape(&card.course),
        due = html_escape(&card.due_label),
    }
}

pub fn render_schedule(view: ViewMode, schedule: &ScheduleModel) -> String {
    let (icon, title) = schedule_title(view);
    let body: String = match schedule {
        ScheduleModel::Day(column) => today_column(column),
        ScheduleModel::Week(columns) => columns
            .iter()
            .enumerate()
            .map(|(i, column)| day_column(column, WEEK_ACCENTS.get(i).copied().unwrap_or(MUTED_ACCENT)))
            .collect(),
        ScheduleModel::Overview { cards, .. } if cards.is_empty() => {
            r#"<div class="empty">No upcoming events found.</div>"#.to_string()
        }
        ScheduleModel::Overview { cards, .. } => cards.iter().map(overview_card).collect(),
    };
    formatdoc! {r#"
        <section id="schedule" class="schedule schedule-{layout}">
          <h3 id="schedule-title"><span class="material-symbols-outlined">{icon}</span> {title}</h3>
          <div id="schedule-container">{body}</div>
        </section>
        "#,
        layout = view.as_str().to_lowercase(),
    }
}

fn upcoming_row(row: &UpcomingRow) -> String {
    let (icon, color) = match row.kind {
        EntityKind::Exam => ("school", "var(--sunset-orange)"),
        _ => ("functions", "var(--sunset-purple)"),
    };
    let course = if row.course.is_empty() {
        String::new()
    } else {
        format!("{} &bull; ", html_escape(&row.course))
    };
    let tag = if row.high_priority {
        r#"<span class="priority-tag">High Priority</span>"#
    } else {
        ""
    };
    let mut classes = String::from("upcoming-row");
    if row.completed {
        classes.push_str(" completed");
    }
    if row.past_due {
        classes.push_str(" past-due");
    }
    formatdoc! {r#"
        <div class="{classes}">
          {checkbox}
          <div class="upcoming-icon" style="background-color: {color}"><span class="material-symbols-outlined">{icon}</span></div>
          <div class="upcoming-text"><h4>{title}</h4><p>{course}Due: {date}</p></div>
          {tag}
          {delete}
        </div>
        "#,
        checkbox = checkbox(row.kind, row.id, row.completed),
        title = html_escape(&row.title),
        date = html_escape(&row.raw_date),
        delete = delete_button(row.kind, row.id, row.skip_confirm(), "cancel"),
    }
}

pub fn render_upcoming(rows: &[UpcomingRow]) -> String {
    let body: String = if rows.is_empty() {
        r#"<p class="empty">No upcoming assignments or exams.</p>"#.to_string()
    } else {
        rows.iter().map(upcoming_row).collect()
    };
    format!(r#"<div id="assignments-list">{body}</div>"#)
}

fn habit_row(row: &HabitRow) -> String {
    let reached = if row.reached { " reached" } else { "" };
    formatdoc! {r#"
        <div class="habit" data-action="bump" data-kind="habit" data-id="{id}">
          <div class="habit-head"><span class="habit-title{reached}">{title}</span><span>{current}/{target} <span class="measure">{measure}</span></span></div>
          <div class="habit-bar"><div class="habit-fill" style="width: {progress}%"></div></div>
          {delete}
        </div>
        "#,
        id = row.id,
        title = html_escape(&row.title),
        current = row.current,
        target = row.target,
        measure = html_escape(&row.measure),
        progress = row.progress,
        delete = delete_button(EntityKind::Habit, row.id, false, "close"),
    }
}

pub fn render_habits(rows: &[HabitRow]) -> String {
    let body: String = if rows.is_empty() {
        r#"<p class="empty">No daily habits. Add one!</p>"#.to_string()
    } else {
        rows.iter().map(habit_row).collect()
    };
    format!(r#"<div id="habits-list">{body}</div>"#)
}

pub fn render_tasks(rows: &[TaskRow]) -> String {
    let items: String = rows
        .iter()
        .map(|task| {
            let done = if task.completed { " class=\"done\"" } else { "" };
            format!(
                "<li>{}<span{done}>{}</span>{}</li>",
                checkbox(EntityKind::Task, task.id, task.completed),
                html_escape(&task.title),
                delete_button(EntityKind::Task, task.id, task.completed, "close"),
            )
        })
        .collect();
    format!(r#"<ul id="tasks-list">{items}</ul>"#)
}

pub fn render_notes(rows: &[NoteRow]) -> String {
    let items: String = rows
        .iter()
        .map(|note| {
            format!(
                r#"<div class="note"><span class="note-text">{}</span>{}</div>"#,
                html_escape(&note.text),
                delete_button(EntityKind::Note, note.id, false, "delete"),
            )
        })
        .collect();
    format!(r#"<div id="notes-list">{items}</div>"#)
}

pub fn render_focus(card: &FocusCard) -> String {
    let body = match &card.title {
        Some(title) => formatdoc! {r#"
            <div class="focus-icon"><span class="material-symbols-outlined">science</span></div>
            <div class="focus-text"><h4>{title}</h4><p>{subtitle}</p></div>
            "#,
            title = html_escape(title),
            subtitle = html_escape(&card.subtitle),
        },
        None => format!(r#"<p class="empty">{}</p>"#, html_escape(&card.subtitle)),
    };
    format!(r#"<div id="focus-course">{body}</div>"#)
}

fn course_options(titles: &[String]) -> String {
    let mut options = String::from(r#"<option value="">-- None --</option>"#);
    for title in titles {
        let title = html_escape(title);
        options.push_str(&format!(r#"<option value="{title}">{title}</option>"#));
    }
    options
}

/// The whole page.
pub fn render_dashboard(dash: &Dashboard) -> String {
    let theme = if dash.dark_mode { "dark" } else { "light" };
    formatdoc! {r#"
        <!DOCTYPE html>
        <html lang="en" class="{theme}">
        <head>
          <meta charset="utf-8">
          <title>Student Planner</title>
          <link rel="stylesheet" href="/style.css">
        </head>
        <body data-view="{view}">
          <header>
            <div class="window-controls">
              <button data-ipc="window-min">remove</button>
              <button data-ipc="window-max">crop_square</button>
              <button data-ipc="window-close">close</button>
            </div>
            <p id="clock">{clock}</p>
            <p id="date">{date}</p>
          </header>
          <main>
            {schedule}
            <section id="upcoming"><h3>Upcoming</h3>{upcoming}</section>
            <section id="focus"><h3>Focus</h3>{focus}</section>
            <section id="habits"><h3>Daily Habits</h3>{habits}</section>
            <section id="tasks"><h3>Tasks</h3>{tasks}</section>
            <section id="notes"><h3>Notes</h3>{notes}</section>
          </main>
          <template id="course-options">{options}</template>
          <script src="/renderer.js"></script>
        </body>
        </html>
        "#,
        view = dash.view,
        clock = html_escape(&dash.header.clock),
        date = html_escape(&dash.header.date),
        schedule = render_schedule(dash.view, &dash.schedule),
        upcoming = render_upcoming(&dash.upcoming),
        focus = render_focus(&dash.focus),
        habits = render_habits(&dash.habits),
        tasks = render_tasks(&dash.tasks),
        notes = render_notes(&dash.notes),
        options = course_options(&dash.course_options),
    }
}
