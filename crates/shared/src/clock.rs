//! Clock helpers for day-scoped admission logic.
//!
//! All temporal comparisons in the platform are made in UTC. The helpers
//! here normalize timestamps to time-of-day minutes and calendar days so
//! the eligibility rules and the storage scoping agree on what "today"
//! means.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};

/// Minutes elapsed since midnight for a wall-clock timestamp.
pub fn minutes_of_day(ts: DateTime<Utc>) -> u32 {
    ts.hour() * 60 + ts.minute()
}

/// Minutes elapsed since midnight for a time-of-day value.
pub fn time_minutes(t: NaiveTime) -> u32 {
    t.hour() * 60 + t.minute()
}

/// Whether `ts` falls on the given UTC calendar date.
pub fn is_same_day(ts: DateTime<Utc>, date: NaiveDate) -> bool {
    ts.date_naive() == date
}

/// Combines a calendar date with a time-of-day into a UTC timestamp.
pub fn at_time(date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(time))
}

/// English ordinal suffix form of a day-of-month (1 -> "1st", 22 -> "22nd").
pub fn ordinal(day: u32) -> String {
    let suffix = match (day % 10, day % 100) {
        (1, 11) | (2, 12) | (3, 13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", day, suffix)
}

/// Weekday name of a calendar date ("Monday", "Tuesday", ...).
pub fn weekday_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        chrono::Weekday::Mon => "Monday",
        chrono::Weekday::Tue => "Tuesday",
        chrono::Weekday::Wed => "Wednesday",
        chrono::Weekday::Thu => "Thursday",
        chrono::Weekday::Fri => "Friday",
        chrono::Weekday::Sat => "Saturday",
        chrono::Weekday::Sun => "Sunday",
    }
}
