//! E-Commerce Dashboard - Public Dataset Analysis
//!
//! Best-selling product categories and highest/lowest rated categories,
//! filtered by delivery year.

mod charts;
mod config;
mod data;
mod gui;

use config::DashboardConfig;
use eframe::egui;
use gui::DashboardApp;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = DashboardConfig::default();
    match config.to_json() {
        Ok(json) => log::debug!("Starting with {}", json),
        Err(e) => log::warn!("Could not serialise config: {}", e),
    }

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size)
            .with_title(&config.window_title),
        ..Default::default()
    };

    // Run the application
    let app_name = config.window_title.clone();
    eframe::run_native(
        &app_name,
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, config)))),
    )
}
