mod app;
mod color;
mod config;
mod data;
mod error;
mod state;
mod ui;

use std::path::Path;

use app::MallSpendingApp;
use config::{DashboardConfig, CONFIG_FILE};
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::load_or_default(Path::new(CONFIG_FILE));
    log::info!("Using data file {}", config.data_path.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Mall Spending – Gender & Payment Preferences",
        options,
        Box::new(|_cc| Ok(Box::new(MallSpendingApp::new(config)))),
    )
}
