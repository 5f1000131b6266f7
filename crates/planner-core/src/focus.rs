//! Focus course: which class is on now, or next.
//!
//! A pure function of the course list and an instant. Today's courses are
//! scanned in start order; the first one whose `[start, end]` window holds the
//! current minute is happening now, otherwise the first one still ahead is
//! "starts at". Failing both, tomorrow's earliest course is shown.

use chrono::{Datelike, Duration, NaiveDateTime, Timelike};
use serde::Serialize;

use crate::calendar::{minute_of_day, weekday_name};
use crate::entities::Course;
use crate::schedule::courses_on;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "course", rename_all = "snake_case")]
pub enum Focus {
    HappeningNow(Course),
    StartsAt(Course),
    Tomorrow(Course),
    Nothing,
}

impl Focus {
    pub fn course(&self) -> Option<&Course> {
        match self {
            Focus::HappeningNow(c) | Focus::StartsAt(c) | Focus::Tomorrow(c) => Some(c),
            Focus::Nothing => None,
        }
    }

    /// Line shown under the course title.
    pub fn subtitle(&self) -> String {
        match self {
            Focus::HappeningNow(_) => "Happening Now".to_string(),
            Focus::StartsAt(c) => format!("Starts at {}", c.start),
            Focus::Tomorrow(c) => format!("Tomorrow at {}", c.start),
            Focus::Nothing => "No upcoming courses schedule.".to_string(),
        }
    }
}

pub fn focus_course(courses: &[Course], now: NaiveDateTime) -> Focus {
    let today = weekday_name(now.weekday());
    let current = now.hour() * 60 + now.minute();

    for course in courses_on(courses, today) {
        // Unparseable times make both comparisons false, same as a NaN.
        let start = minute_of_day(&course.start);
        let end = minute_of_day(&course.end);

        if let (Some(start), Some(end)) = (start, end) {
            if current >= start && current <= end {
                return Focus::HappeningNow(course.clone());
            }
        }
        if start.is_some_and(|start| current < start) {
            return Focus::StartsAt(course.clone());
        }
    }

    let tomorrow = weekday_name((now + Duration::days(1)).weekday());
    match courses_on(courses, tomorrow).first() {
        Some(course) => Focus::Tomorrow((*course).clone()),
        None => Focus::Nothing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        // March 2024: the 4th is a Monday.
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn course(title: &str, days: &[&str], start: &str, end: &str) -> Course {
        Course {
            id: 1,
            title: title.into(),
            teacher: String::new(),
            days: days.iter().map(|d| d.to_string()).collect(),
            start: start.into(),
            end: end.into(),
        }
    }

    #[test]
    fn inside_the_window_is_happening_now() {
        let courses = vec![course("Bio", &["Monday"], "09:00", "10:00")];
        let focus = focus_course(&courses, at(4, 9, 30));
        assert_eq!(focus, Focus::HappeningNow(courses[0].clone()));
        assert_eq!(focus.subtitle(), "Happening Now");
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let courses = vec![course("Bio", &["Monday"], "09:00", "10:00")];
        assert!(matches!(focus_course(&courses, at(4, 9, 0)), Focus::HappeningNow(_)));
        assert!(matches!(focus_course(&courses, at(4, 10, 0)), Focus::HappeningNow(_)));
    }

    #[test]
    fn before_the_window_starts_at() {
        let courses = vec![course("Bio", &["Monday"], "09:00", "10:00")];
        let focus = focus_course(&courses, at(4, 8, 0));
        assert_eq!(focus.subtitle(), "Starts at 09:00");
    }

    #[test]
    fn later_course_wins_once_the_first_is_over() {
        let courses = vec![
            course("Late", &["Monday"], "14:00", "15:00"),
            course("Early", &["Monday"], "09:00", "10:00"),
        ];
        let focus = focus_course(&courses, at(4, 11, 0));
        assert_eq!(focus.course().map(|c| c.title.as_str()), Some("Late"));
        assert!(matches!(focus, Focus::StartsAt(_)));
    }

    #[test]
    fn falls_through_to_tomorrow() {
        let courses = vec![
            course("Bio", &["Monday"], "09:00", "10:00"),
            course("Chem", &["Tuesday"], "13:00", "14:00"),
            course("Math", &["Tuesday"], "08:30", "09:30"),
        ];
        let focus = focus_course(&courses, at(4, 18, 0));
        assert_eq!(focus.subtitle(), "Tomorrow at 08:30");
        assert_eq!(focus.course().map(|c| c.title.as_str()), Some("Math"));
    }

    #[test]
    fn nothing_today_or_tomorrow() {
        let courses = vec![course("Bio", &["Monday"], "09:00", "10:00")];
        // Tuesday 08:00; Wednesday has nothing either.
        assert_eq!(focus_course(&courses, at(5, 8, 0)), Focus::Nothing);
    }

    #[test]
    fn sunday_wraps_to_monday() {
        let courses = vec![course("Bio", &["Monday"], "09:00", "10:00")];
        // March 10th 2024 is a Sunday.
        assert!(matches!(focus_course(&courses, at(10, 20, 0)), Focus::Tomorrow(_)));
    }

    #[test]
    fn malformed_times_never_match_today() {
        let courses = vec![course("Broken", &["Monday"], "nine", "ten")];
        assert_eq!(focus_course(&courses, at(4, 9, 30)), Focus::Nothing);
    }

    #[test]
    fn huge_hour_values_are_skipped() {
        let courses = vec![
            // Sorts ahead of Bio, and its hour count overflows.
            course("Broken", &["Monday"], "0999999999:00", "0999999999:30"),
            course("Bio", &["Monday"], "10:00", "11:00"),
        ];
        match focus_course(&courses, at(4, 9, 0)) {
            Focus::StartsAt(c) => assert_eq!(c.title, "Bio"),
            other => panic!("expected Bio to start next, got {other:?}"),
        }
        assert_eq!(focus_course(&courses[..1], at(4, 9, 0)), Focus::Nothing);
        assert_eq!(Focus::Nothing.subtitle(), "No upcoming courses schedule.");
    }

    #[test]
    fn same_inputs_same_output() {
        let courses = vec![
            course("Bio", &["Monday"], "09:00", "10:00"),
            course("Art", &["Tuesday"], "11:00", "12:00"),
        ];
        let now = at(4, 12, 0);
        assert_eq!(focus_course(&courses, now), focus_course(&courses, now));
    }
}
