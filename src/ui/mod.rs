use eframe::egui::Color32;

use crate::color::ColorMap;
use crate::data::model::CellValue;

pub mod dashboard;
pub mod heatmap;
pub mod panels;
pub mod pie;
pub mod plot;
pub mod table;

/// Colour of a gender group, shared by the pie, scatter and box charts.
pub fn group_color(colors: Option<&ColorMap>, value: &CellValue) -> Color32 {
    colors
        .map(|cm| cm.color_for(value))
        .unwrap_or(Color32::LIGHT_BLUE)
}
