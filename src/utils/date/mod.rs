// Date utility functions
// Day arithmetic shared by the week window and itinerary navigation

use chrono::{Datelike, Duration, NaiveDate};

/// Sunday-first day names, indexed by `num_days_from_sunday`.
pub const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

pub fn day_name(date: NaiveDate) -> &'static str {
    DAY_NAMES[date.weekday().num_days_from_sunday() as usize]
}

/// Shift a date by a signed number of days, `None` on calendar overflow.
pub fn shift_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::try_days(days)?)
}

/// Whole days from `from` to `to` (negative when `to` is earlier).
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

pub fn format_short_date(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}
