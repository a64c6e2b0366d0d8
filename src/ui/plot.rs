use eframe::egui::Ui;
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Depth profile plot
// ---------------------------------------------------------------------------

/// Render EPD against depth for the selected stations.
pub fn profile_plot(ui: &mut Ui, state: &AppState) {
    let view = state.session.view();
    if view.table.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Upload a file to plot station profiles");
        });
        return;
    }
    if view.traces.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("Select stations to plot");
        });
        return;
    }

    Plot::new("profile_plot")
        .legend(Legend::default())
        .x_axis_label("EPD (mV)")
        .y_axis_label("Depth (m)")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for trace in view.traces {
                let color = state.color_map.color_for(&trace.station);

                let line = Line::new(PlotPoints::new(trace.points.clone()))
                    .name(&trace.name)
                    .color(color)
                    .width(2.0);
                let markers = Points::new(PlotPoints::new(trace.points.clone()))
                    .name(&trace.name)
                    .color(color)
                    .radius(3.0);

                plot_ui.line(line);
                plot_ui.points(markers);
            }
        });
}
