//! Day itinerary: the locked-in stops scheduled on one trip day, in hour
//! order, plus a directions link for the external mapping provider.

use chrono::NaiveDate;

use crate::models::schedule::ScheduleEntry;
use crate::models::trip::Trip;
use crate::services::catalog::EventCatalog;
use crate::utils::date::{days_between, shift_days};

const DIRECTIONS_BASE: &str = "https://www.google.com/maps/dir/";

#[derive(Debug, Clone, PartialEq)]
pub struct ItineraryStop {
    pub card_id: i64,
    pub hour: u8,
    pub title: String,
    pub location: String,
}

/// Stops scheduled on `absolute_day` whose card still exists and is
/// locked in, ordered by hour.
pub fn day_stops(
    absolute_day: i64,
    entries: &[ScheduleEntry],
    catalog: &EventCatalog,
) -> Vec<ItineraryStop> {
    let mut stops: Vec<ItineraryStop> = entries
        .iter()
        .filter(|entry| entry.day_index == absolute_day)
        .filter_map(|entry| {
            let card = catalog.card(entry.card_id)?;
            card.is_locked_in().then(|| ItineraryStop {
                card_id: card.id,
                hour: entry.hour,
                title: card.title.clone(),
                location: card.location.clone().unwrap_or_default(),
            })
        })
        .collect();
    stops.sort_by_key(|stop| stop.hour);
    stops
}

/// Directions URL through every stop that has a location, or `None` when
/// nothing on the day can be mapped.
pub fn directions_url(stops: &[ItineraryStop]) -> Option<String> {
    let waypoints: Vec<String> = stops
        .iter()
        .map(|stop| stop.location.trim())
        .filter(|location| !location.is_empty())
        .map(|location| urlencoding::encode(location).into_owned())
        .collect();

    if waypoints.is_empty() {
        return None;
    }
    Some(format!("{}{}", DIRECTIONS_BASE, waypoints.join("/")))
}

/// Open the directions for a day in the system browser.
pub fn open_directions(stops: &[ItineraryStop]) -> anyhow::Result<bool> {
    let Some(url) = directions_url(stops) else {
        return Ok(false);
    };
    webbrowser::open(&url)?;
    Ok(true)
}

/// Day-by-day navigation state for the itinerary view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayNavigation {
    pub date: Option<NaiveDate>,
    pub can_go_previous: bool,
    pub can_go_next: bool,
}

/// Calendar date and bounds for `day_offset` days into `trip`.
pub fn day_navigation(trip: &Trip, day_offset: i64) -> DayNavigation {
    let date = trip.start_date.and_then(|start| shift_days(start, day_offset));
    match (trip.start_date, trip.end_date) {
        (Some(start), Some(end)) => DayNavigation {
            date,
            can_go_previous: day_offset > 0,
            can_go_next: day_offset < days_between(start, end),
        },
        _ => DayNavigation {
            date,
            can_go_previous: day_offset > 0,
            can_go_next: true,
        },
    }
}
