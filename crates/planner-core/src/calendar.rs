//! Wall-clock access and the date/time conventions used across the planner.
//!
//! - Weekdays are full English names ("Monday"), which is what courses store.
//! - "Locale date" is the en-US short form `M/D/YYYY`; the habit rollover
//!   marker is compared as that exact string.
//! - Course times are "H:MM"/"HH:MM" strings turned into minute-of-day.

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, Utc, Weekday};
use std::sync::atomic::{AtomicI64, Ordering};

/// Monday-first week, the column order of the weekly schedule.
pub const WEEK: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Source of "now". Injected so projections and id generation are testable.
pub trait Clock: Send + Sync {
    /// Local wall-clock time.
    fn now(&self) -> NaiveDateTime;

    /// Epoch milliseconds, used as the id of newly created entities.
    fn now_millis(&self) -> i64;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// The real clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// A clock pinned to one instant. `now_millis` advances by one on every call
/// so entities created back-to-back in tests get distinct ids.
#[derive(Debug)]
pub struct FixedClock {
    at: NaiveDateTime,
    millis: AtomicI64,
}

impl FixedClock {
    pub fn new(at: NaiveDateTime) -> Self {
        Self {
            at,
            millis: AtomicI64::new(at.and_utc().timestamp_millis()),
        }
    }

    /// Convenience for tests: `FixedClock::at(2024, 3, 4, 9, 30)`.
    pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Self {
        let at = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(hour, minute, 0))
            .unwrap_or_default();
        Self::new(at)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.at
    }

    fn now_millis(&self) -> i64 {
        self.millis.fetch_add(1, Ordering::SeqCst)
    }
}

pub fn weekday_name(day: Weekday) -> &'static str {
    WEEK[day.num_days_from_monday() as usize]
}

pub fn is_weekend(day: &str) -> bool {
    day == "Saturday" || day == "Sunday"
}

/// `3/4/2024`
pub fn locale_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}

/// `Monday, March 4`
pub fn long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d").to_string()
}

/// `09:05`
pub fn clock_label(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Parses an assignment due date or exam date.
///
/// Accepts `YYYY-MM-DD` (what date inputs produce), `YYYY-MM-DDTHH:MM[:SS]`
/// and RFC 3339. Anything else is `None`; callers sort those last and never
/// treat them as past due.
pub fn parse_item_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    chrono::DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.date_naive())
}

/// Minute-of-day for an "H:MM" string.
///
/// Splits on `:` and reads the first two parts; an empty part counts as zero
/// and extra parts (seconds) are ignored. Returns `None` for anything that is
/// not a number, or too large to count in minutes, so a malformed course
/// time never matches a comparison.
pub fn minute_of_day(time: &str) -> Option<u32> {
    let mut parts = time.split(':');
    let hours = numeric_part(parts.next()?)?;
    let minutes = numeric_part(parts.next()?)?;
    hours.checked_mul(60)?.checked_add(minutes)
}

fn numeric_part(part: &str) -> Option<u32> {
    let part = part.trim();
    if part.is_empty() {
        return Some(0);
    }
    part.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_starts_on_monday() {
        assert_eq!(weekday_name(Weekday::Mon), "Monday");
        assert_eq!(weekday_name(Weekday::Sun), "Sunday");
        assert_eq!(WEEK.len(), 7);
    }

    #[test]
    fn locale_date_has_no_zero_padding() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        assert_eq!(locale_date(d), "3/4/2024");
        assert_eq!(long_date(d), "Monday, March 4");
    }

    #[test]
    fn minute_of_day_accepts_short_hours() {
        assert_eq!(minute_of_day("09:30"), Some(570));
        assert_eq!(minute_of_day("9:30"), Some(570));
        assert_eq!(minute_of_day("13:05:59"), Some(785));
    }

    #[test]
    fn minute_of_day_rejects_garbage() {
        assert_eq!(minute_of_day(""), None);
        assert_eq!(minute_of_day("noon"), None);
        assert_eq!(minute_of_day("ab:cd"), None);
        assert_eq!(minute_of_day("10"), None);
    }

    #[test]
    fn minute_of_day_refuses_overflowing_hours() {
        assert_eq!(minute_of_day("99999999:00"), None);
        assert_eq!(minute_of_day("71582788:59"), None);
        assert_eq!(minute_of_day("9:05"), Some(545));
    }

    #[test]
    fn item_dates_parse_in_common_shapes() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 1);
        assert_eq!(parse_item_date("2024-05-01"), expected);
        assert_eq!(parse_item_date("2024-05-01T14:00"), expected);
        assert_eq!(parse_item_date("2024-05-01T14:00:00+02:00"), expected);
        assert_eq!(parse_item_date("next week"), None);
        assert_eq!(parse_item_date(""), None);
    }

    #[test]
    fn fixed_clock_ids_advance() {
        let clock = FixedClock::at(2024, 3, 4, 9, 30);
        let a = clock.now_millis();
        let b = clock.now_millis();
        assert_eq!(b, a + 1);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
    }
}
