use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use station_pivot::data::model::{number_label, Dataset};
use station_pivot::data::pivot::WideTable;

const ROW_HEIGHT: f32 = 18.0;
const MAX_HEIGHT: f32 = 200.0;

/// Scrollable grid of the uploaded records, all columns as they came in.
pub fn raw_table(ui: &mut Ui, dataset: &Dataset) {
    ui.push_id("raw_table", |ui: &mut Ui| {
        grid(ui, dataset.columns(), dataset.len(), |row, col| {
            dataset
                .record(row)
                .and_then(|r| r.at(col))
                .map(|v| v.label())
                .unwrap_or_default()
        });
    });
}

/// Scrollable grid of the pivot: depth, then one column per station.
pub fn wide_table(ui: &mut Ui, table: &WideTable) {
    let header = table.header();
    ui.push_id("wide_table", |ui: &mut Ui| {
        grid(ui, &header, table.row_count(), |row, col| {
            let r = &table.rows()[row];
            match col {
                0 => number_label(r.depth),
                _ => r.values[col - 1].map(number_label).unwrap_or_default(),
            }
        });
    });
}

fn grid(ui: &mut Ui, header: &[String], n_rows: usize, cell: impl Fn(usize, usize) -> String) {
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(Column::auto().at_least(60.0), header.len())
        .max_scroll_height(MAX_HEIGHT)
        .header(ROW_HEIGHT + 2.0, |mut row| {
            for name in header {
                row.col(|ui: &mut Ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, n_rows, |mut row| {
                let i = row.index();
                for col in 0..header.len() {
                    row.col(|ui: &mut Ui| {
                        ui.label(cell(i, col));
                    });
                }
            });
        });
}
