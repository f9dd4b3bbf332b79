//! Schedule model: slot addressing, placements, and persisted entries.
//!
//! The board only ever shows a five-day window of the trip. Inside the window
//! days are addressed relatively (`0..=4`); the persistence layer addresses
//! them absolutely, counted from the trip's start date. The two are related
//! by `absolute = week_offset * 5 + relative`, see [`to_absolute`] and
//! [`to_relative`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::catalog::CatalogEvent;

/// Days shown per window page.
pub const DAYS_PER_WINDOW: u8 = 5;
pub const HOURS_PER_DAY: u8 = 24;

/// Convert a window-relative day into the trip-relative day index.
pub fn to_absolute(week_offset: i32, relative_day: u8) -> i64 {
    i64::from(week_offset) * i64::from(DAYS_PER_WINDOW) + i64::from(relative_day)
}

/// Convert a trip-relative day index into the window-relative day, if the
/// day falls inside the window at `week_offset`.
pub fn to_relative(week_offset: i32, absolute_day: i64) -> Option<u8> {
    let relative = absolute_day - i64::from(week_offset) * i64::from(DAYS_PER_WINDOW);
    if (0..i64::from(DAYS_PER_WINDOW)).contains(&relative) {
        u8::try_from(relative).ok()
    } else {
        None
    }
}

/// A single (relative day, hour) cell of the visible window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotKey {
    pub day_index: u8,
    pub hour: u8,
}

impl SlotKey {
    /// Build a key, rejecting days outside the window and hours outside a day.
    pub fn new(day_index: u8, hour: u8) -> Option<Self> {
        if day_index < DAYS_PER_WINDOW && hour < HOURS_PER_DAY {
            Some(Self { day_index, hour })
        } else {
            None
        }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.day_index, self.hour)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidSlotKey(pub String);

impl fmt::Display for InvalidSlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid slot key '{}'", self.0)
    }
}

impl std::error::Error for InvalidSlotKey {}

impl FromStr for SlotKey {
    type Err = InvalidSlotKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidSlotKey(s.to_string());
        let (day, hour) = s.split_once('-').ok_or_else(invalid)?;
        let day: u8 = day.parse().map_err(|_| invalid())?;
        let hour: u8 = hour.parse().map_err(|_| invalid())?;
        SlotKey::new(day, hour).ok_or_else(invalid)
    }
}

/// A catalog event scheduled into one slot of the visible window.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub event: CatalogEvent,
    pub day_index: u8,
    pub hour: u8,
}

impl Placement {
    pub fn key(&self) -> SlotKey {
        SlotKey {
            day_index: self.day_index,
            hour: self.hour,
        }
    }
}

/// Wire record of `GET /trips/{id}/schedule`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub trip_id: i64,
    pub card_id: i64,
    /// Absolute, trip-relative day index.
    pub day_index: i64,
    pub hour: u8,
}

/// One element of the `POST /trips/{id}/schedule` replace body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntryPayload {
    pub card_id: i64,
    pub day_index: i64,
    pub hour: u8,
    pub trip_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affine_transform_documented_case() {
        assert_eq!(to_absolute(2, 3), 13);
        assert_eq!(to_relative(2, 13), Some(3));
    }

    #[test]
    fn test_to_relative_outside_window() {
        assert_eq!(to_relative(2, 9), None);
        assert_eq!(to_relative(2, 15), None);
        assert_eq!(to_relative(0, -1), None);
        assert_eq!(to_relative(0, 4), Some(4));
    }

    #[test]
    fn test_negative_offsets_round_trip() {
        assert_eq!(to_absolute(-1, 0), -5);
        assert_eq!(to_relative(-1, -5), Some(0));
        assert_eq!(to_relative(-1, -1), Some(4));
    }

    #[test]
    fn test_slot_key_bounds() {
        assert!(SlotKey::new(0, 0).is_some());
        assert!(SlotKey::new(4, 23).is_some());
        assert!(SlotKey::new(5, 0).is_none());
        assert!(SlotKey::new(0, 24).is_none());
    }

    #[test]
    fn test_slot_key_text_form() {
        let key = SlotKey::new(1, 9).unwrap();
        assert_eq!(key.to_string(), "1-9");
        assert_eq!("1-9".parse::<SlotKey>(), Ok(key));
        assert!("1:9".parse::<SlotKey>().is_err());
        assert!("7-9".parse::<SlotKey>().is_err());
        assert!("a-b".parse::<SlotKey>().is_err());
    }

    #[test]
    fn test_schedule_entry_without_id() {
        let entry: ScheduleEntry =
            serde_json::from_str(r#"{"trip_id": 1, "card_id": 5, "day_index": 13, "hour": 9}"#)
                .unwrap();
        assert_eq!(entry.id, None);
        assert_eq!(entry.day_index, 13);
    }

    #[test]
    fn test_payload_wire_shape() {
        let payload = ScheduleEntryPayload {
            card_id: 42,
            day_index: 6,
            hour: 10,
            trip_id: 3,
        };
        assert_eq!(
            serde_json::to_string(&payload).unwrap(),
            r#"{"card_id":42,"day_index":6,"hour":10,"trip_id":3}"#
        );
    }
}
