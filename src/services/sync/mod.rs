//! Persistence synchronizer.
//!
//! Saving always submits the whole visible window (not a delta), translated
//! from window-relative to trip-relative day indices. The collaborator either
//! accepts or rejects the replace as a whole, so a failed save leaves the
//! local grid exactly as it was, still dirty. When the same window is saved
//! from two places, the later save wins. Entries of other windows ride along
//! unchanged, since the backend replaces the trip's schedule as a whole.

pub mod generation;

use thiserror::Error;

use crate::models::schedule::{to_absolute, to_relative, ScheduleEntry, ScheduleEntryPayload};
use crate::services::api::{ApiError, TripApi};
use crate::services::slot_grid::SlotGrid;

pub use generation::Generation;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("a save is already in progress")]
    SaveInProgress,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Full replace body for the window at `week_offset`, in slot-key order.
///
/// Placements whose event id is not a numeric card id cannot be addressed by
/// the backend and are skipped.
pub fn build_payload(trip_id: i64, week_offset: i32, grid: &SlotGrid) -> Vec<ScheduleEntryPayload> {
    grid.iter()
        .filter_map(|placement| {
            let Some(card_id) = placement.event.card_id() else {
                log::warn!(
                    "Skipping placement with non-numeric card id '{}'",
                    placement.event.id
                );
                return None;
            };
            Some(ScheduleEntryPayload {
                card_id,
                day_index: to_absolute(week_offset, placement.day_index),
                hour: placement.hour,
                trip_id,
            })
        })
        .collect()
}

/// A save that has been started and not yet finished.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    pub trip_id: i64,
    pub week_offset: i32,
    pub entries: Vec<ScheduleEntryPayload>,
    grid_revision: u64,
}

impl SaveRequest {
    /// Carry over the entries of `schedule` that lie outside this window.
    ///
    /// The collaborator replaces the trip's whole schedule, so other windows
    /// have to be resubmitted as last fetched for the save to only replace
    /// this one.
    pub fn with_retained(mut self, schedule: &[ScheduleEntry]) -> Self {
        let retained = schedule
            .iter()
            .filter(|entry| to_relative(self.week_offset, entry.day_index).is_none())
            .map(|entry| ScheduleEntryPayload {
                card_id: entry.card_id,
                day_index: entry.day_index,
                hour: entry.hour,
                trip_id: self.trip_id,
            });
        self.entries.extend(retained);
        self
    }
}

/// What a successful save reports back.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveOutcome {
    pub saved: usize,
    /// Schedule as the collaborator now stores it
    pub schedule: Vec<ScheduleEntry>,
    /// Whether the grid changed while the request was in flight (it then
    /// stays dirty)
    pub superseded: bool,
}

/// Serializes saves: at most one request is in flight at a time.
#[derive(Debug, Default)]
pub struct PersistenceSynchronizer {
    in_flight: bool,
}

impl PersistenceSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_saving(&self) -> bool {
        self.in_flight
    }

    /// Start a save of the current grid. Refused while another save is
    /// pending.
    pub fn begin_save(
        &mut self,
        trip_id: i64,
        week_offset: i32,
        grid: &SlotGrid,
    ) -> Result<SaveRequest, SyncError> {
        if self.in_flight {
            return Err(SyncError::SaveInProgress);
        }
        self.in_flight = true;

        Ok(SaveRequest {
            trip_id,
            week_offset,
            entries: build_payload(trip_id, week_offset, grid),
            grid_revision: grid.revision(),
        })
    }

    /// Record the collaborator's answer to `request`.
    ///
    /// Success clears the dirty flag unless the grid was edited after the
    /// request was built. Failure leaves the grid untouched and dirty.
    pub fn finish_save(
        &mut self,
        grid: &mut SlotGrid,
        request: &SaveRequest,
        result: Result<Vec<ScheduleEntry>, ApiError>,
    ) -> Result<SaveOutcome, SyncError> {
        self.in_flight = false;

        match result {
            Ok(schedule) => {
                let superseded = grid.revision() != request.grid_revision;
                if !superseded {
                    grid.mark_clean();
                }
                log::info!(
                    "Saved {} schedule entries for trip {} (window {})",
                    request.entries.len(),
                    request.trip_id,
                    request.week_offset
                );
                Ok(SaveOutcome {
                    saved: request.entries.len(),
                    schedule,
                    superseded,
                })
            }
            Err(err) => {
                log::error!(
                    "Failed to save schedule for trip {} (window {}): {}",
                    request.trip_id,
                    request.week_offset,
                    err
                );
                Err(SyncError::Api(err))
            }
        }
    }

    /// Build, submit and settle a save in one blocking call.
    pub fn save<A: TripApi + ?Sized>(
        &mut self,
        api: &A,
        trip_id: i64,
        week_offset: i32,
        grid: &mut SlotGrid,
    ) -> Result<SaveOutcome, SyncError> {
        let request = self.begin_save(trip_id, week_offset, grid)?;
        let result = api.replace_schedule(request.trip_id, &request.entries);
        self.finish_save(grid, &request, result)
    }
}
