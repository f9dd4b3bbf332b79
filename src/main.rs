// Trip Planner Application
// Main entry point

use anyhow::Result;
use trip_planner::models::settings::{AppConfig, Session};
use trip_planner::ui_egui::TripPlannerApp;

fn load_config() -> Result<AppConfig> {
    let mut config = match AppConfig::default_path() {
        Some(path) => AppConfig::load_from(&path)?,
        None => {
            log::warn!("No config directory available, using defaults");
            AppConfig::default()
        }
    };
    config.apply_env_overrides();
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::init();

    log::info!("Starting Trip Planner");

    let config = load_config()?;
    let session = Session::from_env();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Trip Planner")
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Trip Planner",
        options,
        Box::new(move |cc| Ok(Box::new(TripPlannerApp::new(cc, config, session)))),
    )
    .map_err(|err| anyhow::anyhow!("UI exited with an error: {}", err))
}
