// Test fixtures - reusable test data
// Sample trips and cards plus an in-memory stand-in for the trip backend

#![allow(dead_code)]

use std::sync::Mutex;

use chrono::NaiveDate;
use trip_planner::models::catalog::{BacklogCard, BacklogCardPatch};
use trip_planner::models::schedule::{ScheduleEntry, ScheduleEntryPayload};
use trip_planner::models::trip::{Trip, TripLeg};
use trip_planner::services::api::{ApiError, ApiResult, TripApi};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Two-week trip, June 1-14 2024.
pub fn lisbon_trip() -> Trip {
    Trip {
        id: 1,
        name: "Lisbon & Porto".into(),
        start_date: Some(date(2024, 6, 1)),
        end_date: Some(date(2024, 6, 14)),
        created_by: Some(1),
    }
}

pub fn card(id: i64, title: &str, category: &str, locked_in: bool) -> BacklogCard {
    BacklogCard {
        id,
        title: title.into(),
        category: Some(category.into()),
        location: Some(format!("{}, Lisbon", title)),
        desire_to_go: Some(4.0),
        locked_in: Some(locked_in),
        ..BacklogCard::default()
    }
}

pub fn backlog() -> Vec<BacklogCard> {
    vec![
        card(10, "Belém Tower", "activities", true),
        card(11, "Pastéis de Belém", "food", true),
        card(12, "Lux Frágil", "clubs", true),
        card(13, "Pestana Palace", "hotels", false),
    ]
}

/// In-memory backend. Like the real one, a schedule POST replaces every
/// entry of the trip.
pub struct FakeTripApi {
    pub cards: Mutex<Vec<BacklogCard>>,
    pub trips: Vec<Trip>,
    pub legs: Vec<TripLeg>,
    pub schedule: Mutex<Vec<ScheduleEntry>>,
    pub fail_writes: Mutex<bool>,
    pub writes: Mutex<Vec<Vec<ScheduleEntryPayload>>>,
}

impl FakeTripApi {
    pub fn new() -> Self {
        Self {
            cards: Mutex::new(backlog()),
            trips: vec![lisbon_trip()],
            legs: vec![
                TripLeg {
                    id: 2,
                    trip_id: 1,
                    name: "Porto".into(),
                    order_index: 1,
                    ..TripLeg::default()
                },
                TripLeg {
                    id: 1,
                    trip_id: 1,
                    name: "Lisbon".into(),
                    order_index: 0,
                    ..TripLeg::default()
                },
            ],
            schedule: Mutex::new(Vec::new()),
            fail_writes: Mutex::new(false),
            writes: Mutex::new(Vec::new()),
        }
    }

    pub fn with_schedule(self, entries: Vec<(i64, i64, u8)>) -> Self {
        *self.schedule.lock().unwrap() = entries
            .into_iter()
            .enumerate()
            .map(|(i, (card_id, day_index, hour))| ScheduleEntry {
                id: Some(i as i64 + 1),
                trip_id: 1,
                card_id,
                day_index,
                hour,
            })
            .collect();
        self
    }

    pub fn set_failing(&self, failing: bool) {
        *self.fail_writes.lock().unwrap() = failing;
    }

    fn server_error(path: &str) -> ApiError {
        ApiError::Http {
            status: 500,
            url: format!("http://fake{}", path),
        }
    }
}

impl TripApi for FakeTripApi {
    fn list_backlog_cards(&self) -> ApiResult<Vec<BacklogCard>> {
        Ok(self.cards.lock().unwrap().clone())
    }

    fn update_backlog_card(&self, card_id: i64, patch: &BacklogCardPatch) -> ApiResult<BacklogCard> {
        if *self.fail_writes.lock().unwrap() {
            return Err(Self::server_error("/backlog/cards"));
        }
        let mut cards = self.cards.lock().unwrap();
        let card = cards
            .iter_mut()
            .find(|card| card.id == card_id)
            .ok_or(ApiError::Http {
                status: 404,
                url: format!("http://fake/backlog/cards/{}", card_id),
            })?;
        if let Some(locked_in) = patch.locked_in {
            card.locked_in = Some(locked_in);
        }
        Ok(card.clone())
    }

    fn list_trips(&self) -> ApiResult<Vec<Trip>> {
        Ok(self.trips.clone())
    }

    fn list_trip_legs(&self, trip_id: i64) -> ApiResult<Vec<TripLeg>> {
        Ok(self
            .legs
            .iter()
            .filter(|leg| leg.trip_id == trip_id)
            .cloned()
            .collect())
    }

    fn get_schedule(&self, trip_id: i64) -> ApiResult<Vec<ScheduleEntry>> {
        Ok(self
            .schedule
            .lock()
            .unwrap()
            .iter()
            .filter(|entry| entry.trip_id == trip_id)
            .cloned()
            .collect())
    }

    fn replace_schedule(
        &self,
        trip_id: i64,
        entries: &[ScheduleEntryPayload],
    ) -> ApiResult<Vec<ScheduleEntry>> {
        self.writes.lock().unwrap().push(entries.to_vec());
        if *self.fail_writes.lock().unwrap() {
            return Err(Self::server_error("/trips/1/schedule"));
        }

        let mut schedule = self.schedule.lock().unwrap();
        schedule.retain(|entry| entry.trip_id != trip_id);
        let next_id = schedule.iter().filter_map(|e| e.id).max().unwrap_or(0);
        schedule.extend(entries.iter().enumerate().map(|(i, entry)| ScheduleEntry {
            id: Some(next_id + i as i64 + 1),
            trip_id,
            card_id: entry.card_id,
            day_index: entry.day_index,
            hour: entry.hour,
        }));
        Ok(schedule
            .iter()
            .filter(|entry| entry.trip_id == trip_id)
            .cloned()
            .collect())
    }
}
