//! Week window calculator.
//!
//! A window is a five-day page of the trip calendar addressed by an integer
//! offset from the trip start. Windows are clipped at trip boundaries, never
//! wrapped, so edge windows can hold fewer than five days (or none at all).

use chrono::{Datelike, NaiveDate};

use crate::models::schedule::DAYS_PER_WINDOW;
use crate::utils::date::{day_name, shift_days};

/// One visible column of the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowDay {
    pub day_name: &'static str,
    /// Day of month
    pub day_number: u32,
    pub date: NaiveDate,
}

impl WindowDay {
    fn new(date: NaiveDate) -> Self {
        Self {
            day_name: day_name(date),
            day_number: date.day(),
            date,
        }
    }
}

/// Whether the previous/next window may be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationBounds {
    pub can_go_previous: bool,
    pub can_go_next: bool,
}

impl NavigationBounds {
    pub const PERMISSIVE: NavigationBounds = NavigationBounds {
        can_go_previous: true,
        can_go_next: true,
    };
}

/// A computed window, derived from the trip dates and the offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekWindow {
    pub week_offset: i32,
    pub days: Vec<WindowDay>,
}

impl WeekWindow {
    pub fn compute(trip_start: NaiveDate, trip_end: Option<NaiveDate>, week_offset: i32) -> Self {
        Self {
            week_offset,
            days: compute_window(trip_start, trip_end, week_offset),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Window-relative column index of a date, if it is visible.
    pub fn relative_index_of(&self, trip_start: NaiveDate, date: NaiveDate) -> Option<u8> {
        let start = window_start(trip_start, self.week_offset)?;
        let relative = (date - start).num_days();
        if (0..i64::from(DAYS_PER_WINDOW)).contains(&relative) {
            u8::try_from(relative).ok()
        } else {
            None
        }
    }
}

/// First calendar day of the window at `week_offset`.
pub fn window_start(trip_start: NaiveDate, week_offset: i32) -> Option<NaiveDate> {
    shift_days(trip_start, i64::from(week_offset) * i64::from(DAYS_PER_WINDOW))
}

/// Dates visible at `week_offset`, clipped to `[trip_start, trip_end]`.
pub fn compute_window(
    trip_start: NaiveDate,
    trip_end: Option<NaiveDate>,
    week_offset: i32,
) -> Vec<WindowDay> {
    let Some(start) = window_start(trip_start, week_offset) else {
        return Vec::new();
    };

    let mut days = Vec::with_capacity(usize::from(DAYS_PER_WINDOW));
    for i in 0..i64::from(DAYS_PER_WINDOW) {
        let Some(date) = shift_days(start, i) else {
            break;
        };
        if date < trip_start {
            continue;
        }
        if matches!(trip_end, Some(end) if date > end) {
            break;
        }
        days.push(WindowDay::new(date));
    }
    days
}

/// Navigation bounds for the window at `week_offset`.
///
/// Without both trip dates no boundary can be proven, so both directions stay
/// open.
pub fn navigation_bounds(
    trip_start: Option<NaiveDate>,
    trip_end: Option<NaiveDate>,
    week_offset: i32,
) -> NavigationBounds {
    let (Some(start), Some(end)) = (trip_start, trip_end) else {
        return NavigationBounds::PERMISSIVE;
    };
    let Some(current) = window_start(start, week_offset) else {
        return NavigationBounds::PERMISSIVE;
    };

    let latest_start = shift_days(end, -(i64::from(DAYS_PER_WINDOW) - 1))
        .map(|candidate| candidate.max(start))
        .unwrap_or(start);

    NavigationBounds {
        can_go_previous: current > start,
        can_go_next: current < latest_start,
    }
}

/// 12-hour label for an hour row ("8 AM", "12 PM").
pub fn hour_label(hour: u8) -> String {
    let suffix = if hour < 12 { "AM" } else { "PM" };
    let display = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{} {}", display, suffix)
}
