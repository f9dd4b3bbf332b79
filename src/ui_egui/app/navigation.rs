use super::jobs::JobResult;
use super::TripPlannerApp;
use crate::models::trip::Trip;
use crate::services::api::TripApi;
use crate::services::catalog::EventCatalog;
use crate::services::lock_in::LockInCommand;
use crate::services::sync::SyncError;

impl TripPlannerApp {
    pub(super) fn select_trip(&mut self, ctx: &egui::Context, trip_id: i64) {
        if self.sync.is_saving() {
            self.toasts.warning("Wait for the save to finish");
            return;
        }
        let Some(trip) = self.state.trips.iter().find(|trip| trip.id == trip_id).cloned() else {
            log::warn!("Trip {} is not in the trip list", trip_id);
            return;
        };
        if self.state.grid.is_dirty() {
            log::warn!("Discarding unsaved schedule changes on trip switch");
            self.toasts.warning("Unsaved changes discarded");
        }

        log::info!("Opening trip {} ('{}')", trip.id, trip.name);
        let category = self.preferences.selected_category(trip.id);
        self.state.select_trip(trip, category);
        self.request_legs(ctx, trip_id);
        self.request_schedule(ctx);
    }

    /// Trip to open once the trip list arrives.
    pub(super) fn initial_trip(&self, trips: &[Trip]) -> Option<i64> {
        if let Some(wanted) = self.config.default_trip_id {
            if trips.iter().any(|trip| trip.id == wanted) {
                return Some(wanted);
            }
            log::warn!("Configured trip {} not found, opening the first trip", wanted);
        }
        trips.first().map(|trip| trip.id)
    }

    pub(super) fn navigate_window(&mut self, ctx: &egui::Context, delta: i32) {
        if self.sync.is_saving() {
            return;
        }
        let previous = self.state.week_offset;
        let Some(discarded) = self.state.shift_window(delta) else {
            return;
        };
        if discarded {
            log::warn!("Discarded unsaved changes for window {}", previous);
            self.toasts.warning("Unsaved changes discarded");
        }
        log::debug!("Switched to window {}", self.state.week_offset);
        self.request_schedule(ctx);
    }

    pub(super) fn show_itinerary_day(&mut self, day: i64) {
        let navigation = self.state.itinerary_navigation();
        let allowed = if day < self.state.itinerary_day {
            navigation.can_go_previous
        } else {
            navigation.can_go_next
        };
        if allowed {
            self.state.itinerary_day = day.max(0);
        }
    }

    pub(super) fn refresh(&mut self, ctx: &egui::Context) {
        self.jobs
            .spawn(ctx, |api| JobResult::Catalog(EventCatalog::load(api)));
        if let Some(trip_id) = self.state.trip_id() {
            self.request_legs(ctx, trip_id);
            self.request_schedule(ctx);
        }
    }

    fn request_legs(&mut self, ctx: &egui::Context, trip_id: i64) {
        let stamp = self.trip_generation.advance();
        self.jobs.spawn(ctx, move |api| JobResult::Legs {
            stamp,
            result: api.list_trip_legs(trip_id),
        });
    }

    /// Fetch the full schedule; answers to older requests are dropped.
    pub(super) fn request_schedule(&mut self, ctx: &egui::Context) {
        let Some(trip_id) = self.state.trip_id() else {
            return;
        };
        let stamp = self.window_generation.advance();
        self.jobs.spawn(ctx, move |api| JobResult::Schedule {
            stamp,
            trip_id,
            result: api.get_schedule(trip_id),
        });
    }

    pub(super) fn save(&mut self, ctx: &egui::Context) {
        let Some(trip_id) = self.state.trip_id() else {
            return;
        };
        if !self.state.schedule_loaded {
            log::warn!("Refusing to save trip {} before its schedule is loaded", trip_id);
            self.toasts.warning("The schedule is still loading");
            return;
        }
        if !self.jobs.is_connected() {
            return;
        }

        match self
            .sync
            .begin_save(trip_id, self.state.week_offset, &self.state.grid)
        {
            Ok(request) => {
                let request = request.with_retained(&self.state.schedule);
                log::debug!(
                    "Saving window {} ({} entries across the trip)",
                    request.week_offset,
                    request.entries.len()
                );
                self.jobs.spawn(ctx, move |api| {
                    let result = api.replace_schedule(request.trip_id, &request.entries);
                    JobResult::Saved { request, result }
                });
            }
            Err(SyncError::SaveInProgress) => log::debug!("Save already in flight, ignoring"),
            Err(err) => log::error!("Failed to start save: {}", err),
        }
    }

    pub(super) fn toggle_lock_in(&mut self, ctx: &egui::Context, card_id: i64) {
        let Some(command) = LockInCommand::toggle(&self.state.catalog, card_id) else {
            log::warn!("Card {} is not in the catalog", card_id);
            return;
        };
        command.apply(&mut self.state.catalog);

        let pending = command.clone();
        let spawned = self.jobs.spawn(ctx, move |api| {
            let result = api.update_backlog_card(pending.card_id, &pending.patch());
            JobResult::LockIn {
                command: pending,
                result,
            }
        });
        if !spawned {
            log::warn!("No backend client, reverting lock-in of card {}", card_id);
            command.undo(&mut self.state.catalog);
        }
    }
}
