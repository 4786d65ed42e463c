use eframe::egui::{pos2, vec2, Align2, FontId, Rect, Sense, Ui, Vec2};

use crate::color::{contrast_text, coolwarm};
use crate::data::stats::CorrelationMatrix;

const LABEL_WIDTH: f32 = 90.0;
const LABEL_HEIGHT: f32 = 20.0;
const LEGEND_WIDTH: f32 = 60.0;

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

/// Annotated heatmap of a correlation matrix with a colour bar on the right.
pub fn correlation_heatmap(ui: &mut Ui, corr: &CorrelationMatrix) {
    if corr.is_empty() {
        ui.label("No numeric columns to correlate.");
        return;
    }

    let n = corr.columns.len();
    let cell = ((ui.available_width() - LABEL_WIDTH - LEGEND_WIDTH) / n as f32).clamp(28.0, 64.0);
    let grid = cell * n as f32;
    let size = vec2(LABEL_WIDTH + grid + LEGEND_WIDTH, grid + LABEL_HEIGHT);

    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let origin = response.rect.min + vec2(LABEL_WIDTH, 0.0);
    let font = FontId::proportional(11.0);
    let text_color = ui.visuals().text_color();

    for row in 0..n {
        for col in 0..n {
            let value = corr.get(row, col);
            let rect = Rect::from_min_size(
                origin + vec2(col as f32 * cell, row as f32 * cell),
                Vec2::splat(cell),
            );
            let fill = coolwarm(value);
            painter.rect_filled(rect.shrink(0.5), 0.0, fill);
            if !value.is_nan() {
                painter.text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    format!("{value:.2}"),
                    font.clone(),
                    contrast_text(fill),
                );
            }
        }

        let mid = origin.y + (row as f32 + 0.5) * cell;
        painter.text(
            pos2(origin.x - 4.0, mid),
            Align2::RIGHT_CENTER,
            &corr.columns[row],
            font.clone(),
            text_color,
        );
    }

    for (col, name) in corr.columns.iter().enumerate() {
        painter.text(
            pos2(origin.x + (col as f32 + 0.5) * cell, origin.y + grid + 2.0),
            Align2::CENTER_TOP,
            name,
            font.clone(),
            text_color,
        );
    }

    // Colour bar, +1 at the top.
    let bar_left = origin.x + grid + 12.0;
    let steps = 40;
    let step_h = grid / steps as f32;
    for s in 0..steps {
        let value = 1.0 - 2.0 * (s as f64 + 0.5) / steps as f64;
        let rect = Rect::from_min_size(pos2(bar_left, origin.y + s as f32 * step_h), vec2(12.0, step_h + 0.5));
        painter.rect_filled(rect, 0.0, coolwarm(value));
    }
    for (label, frac) in [("1.0", 0.0), ("0.0", 0.5), ("-1.0", 1.0)] {
        painter.text(
            pos2(bar_left + 16.0, origin.y + frac * grid),
            Align2::LEFT_CENTER,
            label,
            font.clone(),
            text_color,
        );
    }

    if let Some(pointer) = response.hover_pos() {
        let rel = (pointer - origin) / cell;
        if rel.x >= 0.0 && rel.y >= 0.0 && (rel.x as usize) < n && (rel.y as usize) < n {
            let (row, col) = (rel.y as usize, rel.x as usize);
            response.on_hover_text_at_pointer(format!(
                "{} / {}: {:.3}",
                corr.columns[row],
                corr.columns[col],
                corr.get(row, col)
            ));
        }
    }
}
