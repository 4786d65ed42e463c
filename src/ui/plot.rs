use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Plot, PlotPoints, Points};

use crate::color::ColorMap;
use crate::data::charts::{BoxStats, ScatterGroup};
use crate::data::model::CellValue;

use super::group_color;

const CHART_HEIGHT: f32 = 280.0;

/// Label of a category axis tick; blank between categories.
fn category_label(labels: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Bar chart: chest pain type
// ---------------------------------------------------------------------------

pub fn chest_pain_bar(ui: &mut Ui, counts: &[(CellValue, usize)]) {
    ui.strong("Chest Pain Type Distribution");

    let labels: Vec<String> = counts.iter().map(|(v, _)| v.to_string()).collect();
    let bars: Vec<Bar> = counts
        .iter()
        .enumerate()
        .map(|(i, (value, n))| Bar::new(i as f64, *n as f64).name(value).width(0.6))
        .collect();

    Plot::new("cp_bar")
        .height(CHART_HEIGHT)
        .x_axis_label("Chest Pain Type")
        .y_axis_label("Number of Patients")
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .name("Number of Patients")
                    .color(Color32::from_rgb(99, 110, 250)),
            );
        });
}

// ---------------------------------------------------------------------------
// Scatter plot: age vs cholesterol
// ---------------------------------------------------------------------------

pub fn age_chol_scatter(ui: &mut Ui, groups: &[ScatterGroup], colors: Option<&ColorMap>) {
    ui.strong("Age vs Cholesterol");

    Plot::new("age_chol")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("age")
        .y_axis_label("Cholesterol (mg/dl)")
        .show(ui, |plot_ui| {
            for group in groups {
                let points: PlotPoints = group.points.iter().copied().collect();
                plot_ui.points(
                    Points::new(points)
                        .name(&group.group)
                        .color(group_color(colors, &group.group))
                        .radius(3.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Box plot: resting blood pressure by gender
// ---------------------------------------------------------------------------

pub fn trestbps_box(ui: &mut Ui, groups: &[BoxStats], colors: Option<&ColorMap>) {
    ui.strong("Resting Blood Pressure by Gender");

    let labels: Vec<String> = groups.iter().map(|g| g.group.to_string()).collect();

    Plot::new("trestbps_box")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("Gender")
        .y_axis_label("Resting Blood Pressure (mm Hg)")
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .show(ui, |plot_ui| {
            for (i, group) in groups.iter().enumerate() {
                let x = i as f64;
                let color = group_color(colors, &group.group);
                let name = group.group.to_string();

                let spread = BoxSpread::new(
                    group.lower_whisker,
                    group.q1,
                    group.median,
                    group.q3,
                    group.upper_whisker,
                );
                let elem = BoxElem::new(x, spread)
                    .name(&name)
                    .fill(color.gamma_multiply(0.4))
                    .stroke(Stroke::new(1.5, color))
                    .box_width(0.5);
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(&name).color(color));

                if !group.outliers.is_empty() {
                    let outliers: PlotPoints = group.outliers.iter().map(|&v| [x, v]).collect();
                    plot_ui.points(Points::new(outliers).name(&name).color(color).radius(2.5));
                }
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_label_only_on_whole_ticks() {
        let labels = vec!["Female".to_string(), "Male".to_string()];
        assert_eq!(category_label(&labels, 1.0), "Male");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, -1.0), "");
        assert_eq!(category_label(&labels, 2.0), "");
    }
}
