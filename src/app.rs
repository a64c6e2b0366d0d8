use eframe::egui::{self, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::{panels, plot, tables};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct StationPivotApp {
    pub state: AppState,
}

impl eframe::App for StationPivotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title, upload / clear ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: station selector ----
        egui::SidePanel::left("station_panel")
            .default_width(200.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: tables on the left, plot on the right ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.columns(2, |cols| {
                data_column(&mut cols[0], &mut self.state);
                plot::profile_plot(&mut cols[1], &self.state);
            });
        });
    }
}

fn data_column(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .id_salt("data_column")
        .show(ui, |ui: &mut Ui| {
            ui.heading("Raw Data");
            match state.session.view().dataset {
                Some(ds) => tables::raw_table(ui, ds),
                None => {
                    ui.label(state.session.notice().to_string());
                }
            }
            ui.add_space(20.0);

            ui.heading("Transformed Data");
            match state.session.view().table {
                Some(table) => tables::wide_table(ui, table),
                None => {
                    ui.label("No transformed data.");
                }
            }
            ui.add_space(10.0);

            panels::download_button(ui, state);
        });
}
