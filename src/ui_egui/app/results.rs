use super::jobs::JobResult;
use super::TripPlannerApp;

impl TripPlannerApp {
    pub(super) fn apply_job_result(&mut self, ctx: &egui::Context, result: JobResult) {
        match result {
            JobResult::Trips(Ok(trips)) => {
                log::info!("Loaded {} trips", trips.len());
                let current = self.state.trip_id();
                self.state.trips = trips;

                match current {
                    Some(trip_id) => {
                        if let Some(fresh) = self.state.trips.iter().find(|t| t.id == trip_id) {
                            self.state.trip = Some(fresh.clone());
                            self.state.recompute_window();
                        }
                    }
                    None => {
                        if let Some(trip_id) = self.initial_trip(&self.state.trips) {
                            self.select_trip(ctx, trip_id);
                        }
                    }
                }
            }
            JobResult::Trips(Err(err)) => log::warn!("Failed to load trips: {}", err),

            JobResult::Catalog(Ok(catalog)) => {
                if !self.state.apply_catalog(catalog) {
                    log::debug!("Catalog refreshed, grid kept because of unsaved edits");
                }
            }
            JobResult::Catalog(Err(err)) => log::warn!("Failed to load backlog cards: {}", err),

            JobResult::Legs { stamp, result } => {
                if !self.trip_generation.is_current(stamp) {
                    log::debug!("Dropping stale leg list");
                    return;
                }
                match result {
                    Ok(mut legs) => {
                        legs.sort_by_key(|leg| leg.order_index);
                        self.state.legs = legs;
                    }
                    Err(err) => log::warn!("Failed to load trip legs: {}", err),
                }
            }

            JobResult::Schedule {
                stamp,
                trip_id,
                result,
            } => {
                if !self.window_generation.is_current(stamp) || self.state.trip_id() != Some(trip_id) {
                    log::debug!("Dropping stale schedule for trip {}", trip_id);
                    return;
                }
                match result {
                    Ok(schedule) => {
                        log::debug!("Fetched {} schedule entries", schedule.len());
                        if !self.state.apply_schedule(schedule) {
                            log::info!("Schedule fetched, grid kept because of unsaved edits");
                        }
                    }
                    Err(err) => log::warn!("Failed to load schedule for trip {}: {}", trip_id, err),
                }
            }

            JobResult::Saved { request, result } => {
                match self.sync.finish_save(&mut self.state.grid, &request, result) {
                    Ok(outcome) => {
                        // Reads issued before the save would bring back the old schedule.
                        self.window_generation.advance();
                        self.state.schedule = outcome.schedule;
                        if outcome.superseded {
                            self.toasts.warning("Saved, newer changes are still unsaved");
                        } else {
                            self.toasts.success("Schedule saved");
                        }
                    }
                    Err(err) => self.toasts.error(format!("Save failed: {}", err)),
                }
            }

            JobResult::LockIn { command, result } => {
                match command.settle(&mut self.state.catalog, result) {
                    Ok(()) => self.toasts.success(command.description()),
                    Err(err) => self.toasts.error(format!("Could not update card: {}", err)),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::BacklogCard;
    use crate::models::category::Category;
    use crate::models::schedule::ScheduleEntry;
    use crate::models::settings::{AppConfig, Session};
    use crate::models::trip::Trip;
    use crate::services::api::ApiError;
    use crate::services::catalog::EventCatalog;
    use crate::services::storage::BoardPreferences;
    use crate::services::sync::{Generation, PersistenceSynchronizer};
    use crate::ui_egui::app::jobs::JobRunner;
    use crate::ui_egui::app::state::BoardState;
    use crate::ui_egui::app::toast::ToastManager;
    use chrono::NaiveDate;

    fn app() -> TripPlannerApp {
        TripPlannerApp {
            config: AppConfig::default(),
            session: Session::new(None),
            jobs: JobRunner::new(None),
            state: BoardState::new(),
            sync: PersistenceSynchronizer::new(),
            trip_generation: Generation::new(),
            window_generation: Generation::new(),
            preferences: BoardPreferences::in_memory(),
            toasts: ToastManager::new(),
            startup_error: None,
        }
    }

    fn trip(id: i64) -> Trip {
        Trip {
            id,
            name: format!("Trip {}", id),
            start_date: NaiveDate::from_ymd_opt(2024, 6, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 6, 14),
            created_by: None,
        }
    }

    fn entry(card_id: i64, day_index: i64, hour: u8) -> ScheduleEntry {
        ScheduleEntry {
            id: None,
            trip_id: 1,
            card_id,
            day_index,
            hour,
        }
    }

    /// App with trip 1 open and a two-card catalog, schedule not yet fetched.
    fn app_with_trip() -> TripPlannerApp {
        let mut app = app();
        app.state.catalog = EventCatalog::from_cards(vec![
            BacklogCard {
                id: 1,
                title: "Castle".into(),
                locked_in: Some(true),
                ..BacklogCard::default()
            },
            BacklogCard {
                id: 2,
                title: "Tasca".into(),
                category: Some("food".into()),
                locked_in: Some(true),
                ..BacklogCard::default()
            },
        ]);
        app.state.trips = vec![trip(1), trip(2)];
        app.state.select_trip(trip(1), Category::Activities);
        app
    }

    fn schedule_result(stamp: u64, trip_id: i64, entries: Vec<ScheduleEntry>) -> JobResult {
        JobResult::Schedule {
            stamp,
            trip_id,
            result: Ok(entries),
        }
    }

    #[test]
    fn test_read_failures_stay_quiet() {
        let ctx = egui::Context::default();
        let mut app = app_with_trip();
        let stamp = app.window_generation.advance();

        app.apply_job_result(&ctx, JobResult::Trips(Err(ApiError::TripNotFound(1))));
        app.apply_job_result(&ctx, JobResult::Catalog(Err(ApiError::TripNotFound(1))));
        app.apply_job_result(
            &ctx,
            JobResult::Schedule {
                stamp,
                trip_id: 1,
                result: Err(ApiError::TripNotFound(1)),
            },
        );

        assert!(app.toasts.is_empty());
        assert_eq!(app.state.catalog.schedulable().count(), 2);
        assert_eq!(app.state.trips.len(), 2);
        assert!(!app.state.schedule_loaded);
    }

    #[test]
    fn test_stale_schedule_is_dropped() {
        let ctx = egui::Context::default();
        let mut app = app_with_trip();
        let old = app.window_generation.advance();
        let current = app.window_generation.advance();

        app.apply_job_result(&ctx, schedule_result(old, 1, vec![entry(1, 0, 9)]));
        assert!(!app.state.schedule_loaded);
        assert!(app.state.schedule.is_empty());

        app.apply_job_result(&ctx, schedule_result(current, 2, vec![entry(1, 0, 9)]));
        assert!(!app.state.schedule_loaded);

        app.apply_job_result(&ctx, schedule_result(current, 1, vec![entry(1, 0, 9)]));
        assert!(app.state.schedule_loaded);
        assert_eq!(app.state.grid.len(), 1);
    }

    #[test]
    fn test_fetch_keeps_dirty_grid() {
        let ctx = egui::Context::default();
        let mut app = app_with_trip();
        let stamp = app.window_generation.advance();
        app.apply_job_result(&ctx, schedule_result(stamp, 1, vec![entry(1, 0, 9)]));

        let event = app.state.catalog.get("2").cloned().unwrap();
        app.state.grid.place(3, 19, event, None);

        let stamp = app.window_generation.advance();
        app.apply_job_result(&ctx, schedule_result(stamp, 1, vec![entry(1, 1, 10)]));

        assert!(app.state.grid.is_dirty());
        assert_eq!(app.state.grid.get(3, 19).unwrap().event.id, "2");
        assert_eq!(app.state.schedule, vec![entry(1, 1, 10)]);
    }

    #[test]
    fn test_save_waits_for_schedule() {
        let ctx = egui::Context::default();
        let mut app = app_with_trip();
        let event = app.state.catalog.get("1").cloned().unwrap();
        app.state.grid.place(0, 9, event, None);

        app.save(&ctx);

        assert!(!app.sync.is_saving());
        assert_eq!(app.toasts.len(), 1);
        assert!(app.state.grid.is_dirty());
    }

    #[test]
    fn test_saved_result_supersedes_earlier_reads() {
        let ctx = egui::Context::default();
        let mut app = app_with_trip();
        let stamp = app.window_generation.advance();
        app.apply_job_result(&ctx, schedule_result(stamp, 1, vec![entry(2, 6, 12)]));

        let event = app.state.catalog.get("1").cloned().unwrap();
        app.state.grid.place(0, 9, event, None);
        let request = app
            .sync
            .begin_save(1, 0, &app.state.grid)
            .unwrap()
            .with_retained(&app.state.schedule);
        assert_eq!(request.entries.len(), 2);

        // A read issued while the save was in flight.
        let in_flight_read = app.window_generation.advance();
        let stored = vec![entry(1, 0, 9), entry(2, 6, 12)];
        app.apply_job_result(
            &ctx,
            JobResult::Saved {
                request,
                result: Ok(stored.clone()),
            },
        );

        assert!(!app.sync.is_saving());
        assert!(!app.state.grid.is_dirty());
        assert!(!app.window_generation.is_current(in_flight_read));
        assert_eq!(app.state.schedule, stored);
        assert_eq!(app.toasts.len(), 1);

        app.apply_job_result(&ctx, schedule_result(in_flight_read, 1, vec![entry(2, 6, 12)]));
        assert_eq!(app.state.schedule, stored);
    }

    #[test]
    fn test_itinerary_day_stops_at_zero_without_dates() {
        let mut app = app();
        app.state.select_trip(Trip::default(), Category::Activities);

        app.show_itinerary_day(-1);
        assert_eq!(app.state.itinerary_day, 0);

        app.show_itinerary_day(1);
        app.show_itinerary_day(0);
        assert_eq!(app.state.itinerary_day, 0);
    }
}
