use eframe::egui::{Color32, RichText, ScrollArea, Ui};

use crate::data::charts::{Rendering, Report};
use crate::state::AppState;

use super::{heatmap, panels, pie, plot, table};

// ---------------------------------------------------------------------------
// Central panel – everything derived from the filtered view
// ---------------------------------------------------------------------------

/// Render the dashboard body for the current rendering outcome.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading(&state.config.title);
            ui.label("Explore healthcare data with various metrics and visualizations.");
            ui.add_space(4.0);
            panels::notices(ui, state.all_notices());

            match &state.rendering {
                None => {}
                Some(Err(msg)) => {
                    ui.label(RichText::new(format!("Error: {msg}")).color(Color32::RED));
                }
                Some(Ok(Rendering::Empty(warning))) => {
                    ui.label(RichText::new(warning.to_string()).color(Color32::from_rgb(230, 160, 30)));
                }
                Some(Ok(Rendering::Report(report))) => report_sections(ui, state, report),
            }
        });
}

fn report_sections(ui: &mut Ui, state: &AppState, report: &Report) {
    let colors = state.color_map.as_ref();

    ui.label(RichText::new(format!("Total Records: {}", report.total_records)).strong());
    ui.separator();

    ui.heading("Visualizations");
    plot::chest_pain_bar(ui, &report.cp_counts);
    ui.add_space(12.0);

    if !report.sex_counts.is_empty() {
        pie::gender_pie(ui, &report.sex_counts, colors);
        ui.add_space(12.0);
    }

    plot::age_chol_scatter(ui, &report.age_chol, colors);
    ui.add_space(12.0);

    plot::trestbps_box(ui, &report.trestbps_by_sex, colors);
    ui.separator();

    ui.heading("Summary Statistics");
    table::summary_table(ui, &report.summary);
    ui.separator();

    ui.heading("Correlation Heatmap");
    heatmap::correlation_heatmap(ui, &report.correlation);
}
