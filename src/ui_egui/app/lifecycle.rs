use super::jobs::{JobResult, JobRunner};
use super::state::BoardState;
use super::toast::ToastManager;
use super::TripPlannerApp;
use crate::models::settings::{AppConfig, Session};
use crate::services::api::client::RestClient;
use crate::services::api::TripApi;
use crate::services::catalog::EventCatalog;
use crate::services::itinerary::open_directions;
use crate::services::storage::{BoardPreferences, JsonFileStore};
use crate::services::sync::{Generation, PersistenceSynchronizer};
use crate::ui_egui::drag::DragManager;
use crate::ui_egui::views::board::{render_board_toolbar, render_catalog_panel, render_week_grid};
use crate::ui_egui::views::itinerary::ItineraryView;
use crate::ui_egui::views::{BoardAction, BoardTab};
use egui::{RichText, Vec2};

impl TripPlannerApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig, session: Session) -> Self {
        if !session.is_signed_in() {
            log::warn!("No session token set, requests will be unauthenticated");
        }

        let (api, startup_error) = match RestClient::new(&config, &session) {
            Ok(client) => {
                log::info!("Using trip backend at {}", client.base_url());
                (Some(client), None)
            }
            Err(err) => {
                log::error!("Failed to create API client: {}", err);
                (None, Some(err.to_string()))
            }
        };

        let preferences = open_preferences(&config);

        let mut app = Self {
            config,
            session,
            jobs: JobRunner::new(api),
            state: BoardState::new(),
            sync: PersistenceSynchronizer::new(),
            trip_generation: Generation::new(),
            window_generation: Generation::new(),
            preferences,
            toasts: ToastManager::new(),
            startup_error,
        };
        app.request_initial_load(&cc.egui_ctx);
        app
    }

    pub(super) fn request_initial_load(&mut self, ctx: &egui::Context) {
        self.jobs
            .spawn(ctx, |api| JobResult::Trips(api.list_trips()));
        self.jobs
            .spawn(ctx, |api| JobResult::Catalog(EventCatalog::load(api)));
    }

    pub(super) fn handle_update(&mut self, ctx: &egui::Context) {
        for result in self.jobs.poll() {
            self.apply_job_result(ctx, result);
        }

        let mut actions = Vec::new();
        self.render_top_bar(ctx, &mut actions);

        if let Some(error) = &self.startup_error {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.centered_and_justified(|ui| {
                    ui.label(RichText::new(format!("Cannot reach the trip backend: {}", error)).strong());
                });
            });
        } else {
            match self.state.tab {
                BoardTab::Board => self.render_board(ctx, &mut actions),
                BoardTab::Itinerary => self.render_itinerary(ctx, &mut actions),
            }
        }

        for action in actions {
            self.handle_action(ctx, action);
        }

        render_drag_preview(ctx);
        // Released outside the grid
        if ctx.input(|i| i.pointer.any_released()) {
            DragManager::cancel(ctx);
        }

        self.toasts.render(ctx);
    }

    fn render_top_bar(&mut self, ctx: &egui::Context, actions: &mut Vec<BoardAction>) {
        egui::TopBottomPanel::top("board_top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let selected_name = self
                    .state
                    .trip
                    .as_ref()
                    .map(|trip| trip.name.clone())
                    .unwrap_or_else(|| "Select a trip".to_string());

                ui.add_enabled_ui(!self.sync.is_saving(), |ui| {
                    egui::ComboBox::from_id_source("trip_selector")
                        .selected_text(selected_name)
                        .show_ui(ui, |ui| {
                            for trip in &self.state.trips {
                                let selected = self.state.trip_id() == Some(trip.id);
                                if ui.selectable_label(selected, &trip.name).clicked() && !selected {
                                    actions.push(BoardAction::SelectTrip(trip.id));
                                }
                            }
                        });
                });

                ui.separator();
                for (tab, label) in [(BoardTab::Board, "Board"), (BoardTab::Itinerary, "Itinerary")] {
                    if ui.selectable_label(self.state.tab == tab, label).clicked() {
                        actions.push(BoardAction::SelectTab(tab));
                    }
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if !self.session.is_signed_in() {
                        ui.label(RichText::new("Not signed in").italics());
                    }
                    if self.jobs.is_busy() {
                        ui.spinner();
                    }
                });
            });
        });
    }

    fn render_board(&mut self, ctx: &egui::Context, actions: &mut Vec<BoardAction>) {
        egui::SidePanel::left("catalog_panel")
            .resizable(true)
            .default_width(240.0)
            .show(ctx, |ui| {
                render_catalog_panel(ui, &self.state.catalog, self.state.selected_category, actions);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(trip_start) = self.state.trip.as_ref().map(|trip| trip.start_date) else {
                ui.centered_and_justified(|ui| {
                    ui.label("Select a trip to start planning");
                });
                return;
            };

            render_board_toolbar(
                ui,
                &self.state.window,
                self.state.bounds(),
                self.state.grid.is_dirty(),
                self.state.can_save(),
                self.sync.is_saving(),
                actions,
            );
            ui.separator();
            if !self.state.schedule_loaded {
                ui.centered_and_justified(|ui| {
                    if self.jobs.is_busy() {
                        ui.spinner();
                    } else {
                        ui.label("Schedule not loaded yet, use ⟳ to reload");
                    }
                });
                return;
            }
            render_week_grid(
                ui,
                &mut self.state.grid,
                &self.state.window,
                trip_start,
                self.config.visible_hours(),
                actions,
            );
        });
    }

    fn render_itinerary(&mut self, ctx: &egui::Context, actions: &mut Vec<BoardAction>) {
        let stops = self.state.itinerary_stops();
        let starred_leg = self
            .state
            .trip_id()
            .and_then(|trip_id| self.preferences.starred_leg(trip_id));

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.trip.is_none() {
                ui.label("Select a trip to see its itinerary");
                return;
            }
            ItineraryView {
                day_offset: self.state.itinerary_day,
                navigation: self.state.itinerary_navigation(),
                stops: &stops,
                legs: &self.state.legs,
                starred_leg,
            }
            .show(ui, actions);
        });
    }

    fn handle_action(&mut self, ctx: &egui::Context, action: BoardAction) {
        match action {
            BoardAction::SelectTrip(trip_id) => self.select_trip(ctx, trip_id),
            BoardAction::SelectTab(tab) => self.state.tab = tab,
            BoardAction::SelectCategory(category) => {
                self.state.selected_category = category;
                if let Some(trip_id) = self.state.trip_id() {
                    self.preferences.set_selected_category(trip_id, category);
                }
            }
            BoardAction::ToggleLockIn(card_id) => self.toggle_lock_in(ctx, card_id),
            BoardAction::Navigate(delta) => self.navigate_window(ctx, delta),
            BoardAction::Save => self.save(ctx),
            BoardAction::Refresh => self.refresh(ctx),
            BoardAction::Dropped(outcome) => log::debug!("Drop applied: {:?}", outcome),
            BoardAction::Removed(key) => log::debug!("Removed placement at {}", key),
            BoardAction::ItineraryDay(day) => self.show_itinerary_day(day),
            BoardAction::OpenDirections => match open_directions(&self.state.itinerary_stops()) {
                Ok(true) => {}
                Ok(false) => self.toasts.warning("No stop on this day has a location"),
                Err(err) => {
                    log::error!("Failed to open directions: {}", err);
                    self.toasts.error("Could not open the browser");
                }
            },
            BoardAction::ToggleStarredLeg(leg_id) => {
                if let Some(trip_id) = self.state.trip_id() {
                    self.preferences.toggle_starred_leg(trip_id, leg_id);
                }
            }
        }
    }
}

fn open_preferences(config: &AppConfig) -> BoardPreferences {
    let Some(path) = config.resolved_state_path() else {
        log::warn!("No data directory available, board preferences will not persist");
        return BoardPreferences::in_memory();
    };
    match JsonFileStore::open(&path) {
        Ok(store) => BoardPreferences::new(Box::new(store)),
        Err(err) => {
            log::warn!("Failed to open board state, using defaults: {}", err);
            BoardPreferences::in_memory()
        }
    }
}

/// Card label following the pointer while a drag is in progress.
fn render_drag_preview(ctx: &egui::Context) {
    let Some(drag) = DragManager::active(ctx) else {
        return;
    };
    let (Some(payload), Some(pos)) = (drag.payload(), ctx.pointer_latest_pos()) else {
        return;
    };

    egui::Area::new(egui::Id::new("board_drag_preview"))
        .fixed_pos(pos + Vec2::new(14.0, 10.0))
        .order(egui::Order::Tooltip)
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                let event = payload.event();
                ui.label(format!("{} {}", event.category.icon(), event.display_title()));
            });
        });
    ctx.request_repaint();
}
