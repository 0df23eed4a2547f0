mod app;
mod color;
mod config;
mod data;
mod report;
mod state;
mod ui;

use std::path::{Path, PathBuf};

use app::OrderLensApp;
use config::{DashboardConfig, CONFIG_FILE};
use eframe::egui;
use report::ReportSettings;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::load_or_default(Path::new(CONFIG_FILE));
    let settings = config.report_settings().unwrap_or_else(|e| {
        log::warn!("{e}; using default report settings");
        ReportSettings::default()
    });

    // `order-lens [CSV_PATH]`
    let data_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| config.data_path.clone());

    let mut state = AppState::new(config, settings);
    ui::panels::load_path(&mut state, &data_path);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Order Lens – Sales Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(OrderLensApp::new(state)))),
    )
}
