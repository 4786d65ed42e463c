use anyhow::{Context, Result};
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::{AppState, Notice, NoticeLevel};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets and downloads
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter the Data");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            age_range(ui, state);
            ui.separator();
            gender_select(ui, state);
            ui.separator();
            downloads(ui, state);
        });
}

fn age_range(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Select Age Range");
    let (min, max) = state.age_bounds;
    let (mut lo, mut hi) = state.filters.age_range;

    if ui
        .add(egui::Slider::new(&mut lo, min..=max).text("from"))
        .changed()
    {
        state.set_age_low(lo);
    }
    if ui
        .add(egui::Slider::new(&mut hi, min..=max).text("to"))
        .changed()
    {
        state.set_age_high(hi);
    }
}

fn gender_select(ui: &mut Ui, state: &mut AppState) {
    let options = state.gender_options();
    let header = format!(
        "Select Gender  ({}/{})",
        state.filters.genders.len(),
        options.len()
    );
    ui.strong(header);

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.select_all_genders();
        }
        if ui.small_button("None").clicked() {
            state.select_no_genders();
        }
    });

    for val in &options {
        let mut checked = state.filters.genders.contains(val);
        let mut text = RichText::new(val.to_string());
        if let Some(cm) = &state.color_map {
            text = text.color(cm.color_for(val));
        }
        if ui.checkbox(&mut checked, text).changed() {
            state.toggle_gender(val);
        }
    }

    if state.filters.genders.is_empty() {
        ui.weak("Nothing selected: gender filter off");
    }
}

fn downloads(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Export");
    if ui.button("Download Filtered Data").clicked() {
        let result = save_csv(state);
        state.record_export(result);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} records loaded, {} visible",
                ds.len(),
                state.visible_indices.len()
            ));
        }
    });
}

// ---------------------------------------------------------------------------
// Save dialog
// ---------------------------------------------------------------------------

/// Ask where to save the CSV download and write it. Cancelling is not an
/// error.
pub fn save_csv(state: &AppState) -> Result<()> {
    let blob = state.export_blob()?;
    let Some(path) = rfd::FileDialog::new()
        .set_title("Download filtered data")
        .set_file_name(&blob.file_name)
        .add_filter("CSV", &["csv"])
        .save_file()
    else {
        return Ok(());
    };

    std::fs::write(&path, blob.data).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Exported {} rows ({}) to {}", state.visible_indices.len(), blob.mime, path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Notices
// ---------------------------------------------------------------------------

/// Show notices: errors in red, warnings in amber.
pub fn notices<'a>(ui: &mut Ui, notices: impl IntoIterator<Item = &'a Notice>) {
    for notice in notices {
        let color = match notice.level {
            NoticeLevel::Error => Color32::RED,
            NoticeLevel::Warning => Color32::from_rgb(230, 160, 30),
        };
        ui.label(RichText::new(&notice.text).color(color));
    }
}
