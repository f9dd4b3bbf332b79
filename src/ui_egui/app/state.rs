use crate::models::category::Category;
use crate::models::schedule::ScheduleEntry;
use crate::models::trip::{Trip, TripLeg};
use crate::services::catalog::EventCatalog;
use crate::services::itinerary::{day_navigation, day_stops, DayNavigation, ItineraryStop};
use crate::services::slot_grid::{LoadSummary, SlotGrid};
use crate::services::week_window::{navigation_bounds, NavigationBounds, WeekWindow};
use crate::ui_egui::views::BoardTab;

/// Everything the board shows for the selected trip.
pub struct BoardState {
    pub trips: Vec<Trip>,
    pub trip: Option<Trip>,
    pub legs: Vec<TripLeg>,
    pub catalog: EventCatalog,
    /// Last full schedule fetched (or returned by a save) for the trip
    pub schedule: Vec<ScheduleEntry>,
    /// Set once the trip's schedule has been fetched. A save sends the whole
    /// trip, so nothing can be saved before this.
    pub schedule_loaded: bool,
    pub grid: SlotGrid,
    pub week_offset: i32,
    pub window: WeekWindow,
    pub selected_category: Category,
    pub itinerary_day: i64,
    pub tab: BoardTab,
}

impl Default for BoardState {
    fn default() -> Self {
        Self {
            trips: Vec::new(),
            trip: None,
            legs: Vec::new(),
            catalog: EventCatalog::default(),
            schedule: Vec::new(),
            schedule_loaded: false,
            grid: SlotGrid::new(),
            week_offset: 0,
            window: WeekWindow {
                week_offset: 0,
                days: Vec::new(),
            },
            selected_category: Category::default(),
            itinerary_day: 0,
            tab: BoardTab::Board,
        }
    }
}

impl BoardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trip_id(&self) -> Option<i64> {
        self.trip.as_ref().map(|trip| trip.id)
    }

    /// Switch to `trip`, dropping everything loaded for the previous one.
    pub fn select_trip(&mut self, trip: Trip, category: Category) {
        self.trip = Some(trip);
        self.legs.clear();
        self.schedule.clear();
        self.schedule_loaded = false;
        self.grid.clear();
        self.week_offset = 0;
        self.itinerary_day = 0;
        self.selected_category = category;
        self.recompute_window();
    }

    pub fn recompute_window(&mut self) {
        let start = self.trip.as_ref().and_then(|trip| trip.start_date);
        let end = self.trip.as_ref().and_then(|trip| trip.end_date);
        self.window = match start {
            Some(start) => WeekWindow::compute(start, end, self.week_offset),
            None => WeekWindow {
                week_offset: self.week_offset,
                days: Vec::new(),
            },
        };
    }

    pub fn bounds(&self) -> NavigationBounds {
        let trip = self.trip.as_ref();
        navigation_bounds(
            trip.and_then(|t| t.start_date),
            trip.and_then(|t| t.end_date),
            self.week_offset,
        )
    }

    /// Rebuild the grid for the current window from the cached schedule.
    pub fn reload_grid(&mut self) -> LoadSummary {
        let catalog = self.catalog.by_id();
        self.grid.load(self.week_offset, &self.schedule, &catalog)
    }

    /// Move the window by `delta` pages.
    ///
    /// Returns `None` when the move is outside the trip, otherwise whether
    /// unsaved edits were discarded by the switch.
    pub fn shift_window(&mut self, delta: i32) -> Option<bool> {
        let bounds = self.bounds();
        let allowed = match delta.signum() {
            -1 => bounds.can_go_previous,
            1 => bounds.can_go_next,
            _ => false,
        };
        if !allowed {
            return None;
        }

        let discarded = self.grid.is_dirty();
        self.week_offset = self.week_offset.saturating_add(delta);
        self.recompute_window();
        self.reload_grid();
        Some(discarded)
    }

    /// Adopt a fetched schedule. After the first load for a trip the grid is
    /// only rebuilt when it holds no unsaved edits.
    pub fn apply_schedule(&mut self, schedule: Vec<ScheduleEntry>) -> bool {
        let first_load = !self.schedule_loaded;
        self.schedule = schedule;
        self.schedule_loaded = true;
        if self.grid.is_dirty() && !first_load {
            return false;
        }
        self.reload_grid();
        true
    }

    pub fn can_save(&self) -> bool {
        self.schedule_loaded && self.grid.is_dirty()
    }

    pub fn apply_catalog(&mut self, catalog: EventCatalog) -> bool {
        self.catalog = catalog;
        if self.grid.is_dirty() {
            return false;
        }
        self.reload_grid();
        true
    }

    pub fn itinerary_navigation(&self) -> DayNavigation {
        match &self.trip {
            Some(trip) => day_navigation(trip, self.itinerary_day),
            None => DayNavigation {
                date: None,
                can_go_previous: false,
                can_go_next: false,
            },
        }
    }

    pub fn itinerary_stops(&self) -> Vec<ItineraryStop> {
        day_stops(self.itinerary_day, &self.schedule, &self.catalog)
    }
}
