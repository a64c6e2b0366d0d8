mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use app::StationPivotApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let mut app = StationPivotApp::default();

    // Optional file to load at startup, same path as the Upload button.
    if let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) {
        if let Err(e) = app.state.upload_path(&path) {
            log::error!("Failed to read {}: {e:#}", path.display());
            app.state.io_error = Some(format!("Error: {e:#}"));
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([700.0, 450.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Station Pivot – Site Data Viewer",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
}
