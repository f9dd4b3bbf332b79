mod jobs;
mod lifecycle;
mod navigation;
mod results;
mod state;
mod toast;

use self::jobs::JobRunner;
use self::state::BoardState;
use self::toast::ToastManager;
use crate::models::settings::{AppConfig, Session};
use crate::services::storage::BoardPreferences;
use crate::services::sync::{Generation, PersistenceSynchronizer};

pub struct TripPlannerApp {
    config: AppConfig,
    session: Session,
    jobs: JobRunner,
    state: BoardState,
    sync: PersistenceSynchronizer,
    /// Stamps leg reads; advanced on trip switch
    trip_generation: Generation,
    /// Stamps schedule reads; advanced on trip and window switch
    window_generation: Generation,
    preferences: BoardPreferences,
    toasts: ToastManager,
    /// Shown instead of the board when no client could be built
    startup_error: Option<String>,
}

impl eframe::App for TripPlannerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_update(ctx);
    }
}
