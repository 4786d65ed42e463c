use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Pos2, Sense, Shape, Stroke, Ui, Vec2};

use crate::color::ColorMap;
use crate::data::model::CellValue;

use super::group_color;

const PIE_SIZE: f32 = 220.0;
const ARC_SEGMENTS: usize = 24;

// ---------------------------------------------------------------------------
// Pie chart: gender distribution
// ---------------------------------------------------------------------------

/// Pie of per-gender counts with a legend showing counts and shares.
pub fn gender_pie(ui: &mut Ui, counts: &[(CellValue, usize)], colors: Option<&ColorMap>) {
    ui.strong("Gender Distribution");

    let total: usize = counts.iter().map(|(_, n)| n).sum();
    if total == 0 {
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        let (response, painter) = ui.allocate_painter(Vec2::splat(PIE_SIZE), Sense::hover());
        let center = response.rect.center();
        let radius = PIE_SIZE * 0.45;
        let outline = Stroke::new(1.0, ui.visuals().window_fill);

        let mut start = -FRAC_PI_2;
        for (value, n) in counts {
            let sweep = TAU * (*n as f32 / total as f32);
            let color = group_color(colors, value);
            for wedge in wedges(center, radius, start, sweep) {
                painter.add(Shape::convex_polygon(wedge, color, outline));
            }
            start += sweep;
        }

        ui.vertical(|ui: &mut Ui| {
            for (value, n) in counts {
                let share = 100.0 * *n as f64 / total as f64;
                ui.horizontal(|ui: &mut Ui| {
                    let (swatch, _) = ui.allocate_exact_size(Vec2::splat(12.0), Sense::hover());
                    ui.painter().rect_filled(swatch, 2.0, group_color(colors, value));
                    ui.label(format!("{value}: {n} ({share:.1}%)"));
                });
            }
        });
    });
}

/// Split one slice into polygons of at most a quarter turn so each stays
/// convex.
fn wedges(center: Pos2, radius: f32, start: f32, sweep: f32) -> Vec<Vec<Pos2>> {
    if sweep <= 0.0 {
        return Vec::new();
    }
    let pieces = (sweep / FRAC_PI_2).ceil().max(1.0) as usize;
    let step = sweep / pieces as f32;

    (0..pieces)
        .map(|p| {
            let from = start + step * p as f32;
            std::iter::once(center)
                .chain((0..=ARC_SEGMENTS).map(|s| {
                    let angle = from + step * s as f32 / ARC_SEGMENTS as f32;
                    center + radius * Vec2::angled(angle)
                }))
                .collect()
        })
        .collect()
}
