use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::stats::{Summary, SUMMARY_ROWS};

/// Descriptive statistics: one row per statistic, one column per variable.
pub fn summary_table(ui: &mut Ui, summary: &Summary) {
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::auto().at_least(60.0))
        .columns(Column::auto().at_least(90.0), summary.columns.len())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("");
            });
            for col in &summary.columns {
                header.col(|ui| {
                    ui.strong(&col.column);
                });
            }
        })
        .body(|mut body| {
            for (stat_idx, label) in SUMMARY_ROWS.iter().enumerate() {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.strong(*label);
                    });
                    for col in &summary.columns {
                        row.col(|ui| {
                            ui.monospace(format_stat(col.cells()[stat_idx]));
                        });
                    }
                });
            }
        });
}

fn format_stat(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{value:.6}")
    }
}
