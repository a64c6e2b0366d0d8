use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use station_pivot::data::export::EXPORT_FILENAME;
use station_pivot::data::loader::FileFormat;
use station_pivot::session::Event;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – station selector
// ---------------------------------------------------------------------------

/// Render the station selector.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Stations");
    ui.separator();

    let stations = state.session.view().stations().to_vec();
    if stations.is_empty() {
        ui.label("No transformed data.");
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.select_all();
        }
        if ui.small_button("None").clicked() {
            state.select_none();
        }
    });
    ui.label(format!(
        "{}/{} selected",
        state.session.selection().len(),
        stations.len()
    ));

    let mut toggled: Option<String> = None;
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for station in &stations {
                let mut checked = state.session.selection().contains(station);
                let text = RichText::new(format!("Station {station}"))
                    .color(state.color_map.color_for(station));
                if ui.checkbox(&mut checked, text).changed() {
                    toggled = Some(station.clone());
                }
            }
        });

    if let Some(station) = toggled {
        state.toggle_station(&station);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the title and the upload / clear buttons.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading("Upload and Visualize Site Data");
    });

    ui.horizontal(|ui: &mut Ui| {
        if ui.button(RichText::new("Upload Data").size(16.0)).clicked() {
            open_file_dialog(state);
        }
        if ui.button(RichText::new("Clear Data").size(16.0)).clicked() {
            state.dispatch(Event::Clear);
        }

        ui.separator();

        if let Some(name) = state.session.filename() {
            ui.label(name);
        }

        let notice = state.session.notice();
        let color = if notice.is_error() {
            Color32::RED
        } else {
            ui.visuals().text_color()
        };
        ui.label(RichText::new(notice.to_string()).color(color));

        if let Some(msg) = &state.io_error {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Upload site data")
        .add_filter("Supported files", FileFormat::EXTENSIONS)
        .add_filter("CSV", &["csv"])
        .add_filter("Excel", &["xls", "xlsx"])
        .pick_file();

    if let Some(path) = file {
        if let Err(e) = state.upload_path(&path) {
            log::error!("Failed to read file: {e:#}");
            state.io_error = Some(format!("Error: {e:#}"));
        }
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Download transformed data")
        .set_file_name(EXPORT_FILENAME)
        .add_filter("Excel", &["xlsx"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.save_export(&path) {
            log::error!("Failed to save export: {e:#}");
            state.io_error = Some(format!("Error: {e:#}"));
        }
    }
}

/// The "Download Transformed Data" button, disabled until a pivot exists.
pub fn download_button(ui: &mut Ui, state: &mut AppState) {
    let ready = state.session.view().table.is_some();
    if ui
        .add_enabled(ready, egui::Button::new("Download Transformed Data"))
        .clicked()
    {
        save_file_dialog(state);
    }
}
