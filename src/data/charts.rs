use std::collections::BTreeMap;

use crate::config::DashboardConfig;
use crate::error::DashboardError;

use super::filter::FilterState;
use super::model::{CellValue, FilteredView};
use super::stats::{self, CorrelationMatrix, Summary};

// ---------------------------------------------------------------------------
// Category counts (bar + pie)
// ---------------------------------------------------------------------------

/// Counts per distinct non-null value, in value order.
pub fn category_counts(view: &FilteredView<'_>, column: usize) -> Vec<(CellValue, usize)> {
    let mut counts: BTreeMap<CellValue, usize> = BTreeMap::new();
    for value in view.values(column).filter(|v| !v.is_null()) {
        *counts.entry(value.clone()).or_default() += 1;
    }
    counts.into_iter().collect()
}

/// Counts per distinct non-null value, most frequent first. Ties keep value
/// order.
pub fn value_counts(view: &FilteredView<'_>, column: usize) -> Vec<(CellValue, usize)> {
    let mut counts = category_counts(view, column);
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

// ---------------------------------------------------------------------------
// Scatter groups
// ---------------------------------------------------------------------------

/// Points of one colour group in a scatter plot.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterGroup {
    pub group: CellValue,
    pub points: Vec<[f64; 2]>,
}

/// Split `(x, y)` points by the value of `group`. Rows where either
/// coordinate is null are left out.
pub fn scatter_groups(
    view: &FilteredView<'_>,
    x: usize,
    y: usize,
    group: usize,
) -> Vec<ScatterGroup> {
    let mut groups: BTreeMap<CellValue, Vec<[f64; 2]>> = BTreeMap::new();
    for row in view.rows() {
        if let (Some(xv), Some(yv)) = (row[x].as_f64(), row[y].as_f64()) {
            groups.entry(row[group].clone()).or_default().push([xv, yv]);
        }
    }
    groups
        .into_iter()
        .map(|(group, points)| ScatterGroup { group, points })
        .collect()
}

// ---------------------------------------------------------------------------
// Box plot groups
// ---------------------------------------------------------------------------

/// Tukey box statistics of one group.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub group: CellValue,
    pub count: usize,
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// `None` when there are no values.
    pub fn from_values(group: CellValue, mut values: Vec<f64>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        values.sort_by(f64::total_cmp);
        let q1 = stats::quantile(&values, 0.25);
        let median = stats::quantile(&values, 0.5);
        let q3 = stats::quantile(&values, 0.75);
        let fence = 1.5 * (q3 - q1);
        let (low_fence, high_fence) = (q1 - fence, q3 + fence);

        let inside = values.iter().filter(|&&v| v >= low_fence && v <= high_fence);
        let lower_whisker = inside.clone().copied().fold(f64::INFINITY, f64::min);
        let upper_whisker = inside.copied().fold(f64::NEG_INFINITY, f64::max);
        let outliers = values
            .iter()
            .copied()
            .filter(|&v| v < low_fence || v > high_fence)
            .collect();

        Some(Self {
            group,
            count: values.len(),
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
            outliers,
        })
    }
}

/// Box statistics of `value` per distinct `group`. Groups without values are
/// omitted.
pub fn box_groups(view: &FilteredView<'_>, value: usize, group: usize) -> Vec<BoxStats> {
    let mut groups: BTreeMap<CellValue, Vec<f64>> = BTreeMap::new();
    for row in view.rows() {
        let values = groups.entry(row[group].clone()).or_default();
        if let Some(v) = row[value].as_f64() {
            values.push(v);
        }
    }
    groups
        .into_iter()
        .filter_map(|(group, values)| BoxStats::from_values(group, values))
        .collect()
}

// ---------------------------------------------------------------------------
// Report – everything drawn for one filtered view
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub total_records: usize,
    /// Bar chart: patients per chest pain type.
    pub cp_counts: Vec<(CellValue, usize)>,
    /// Pie chart: patients per gender.
    pub sex_counts: Vec<(CellValue, usize)>,
    /// Scatter plot: age vs cholesterol, one group per gender.
    pub age_chol: Vec<ScatterGroup>,
    /// Box plot: resting blood pressure per gender.
    pub trestbps_by_sex: Vec<BoxStats>,
    pub summary: Summary,
    pub correlation: CorrelationMatrix,
}

/// Outcome of rendering a filtered view.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendering {
    /// No rows matched; carries the warning naming the filters.
    Empty(DashboardError),
    Report(Report),
}

/// Compute every artifact of the view. An empty view short-circuits to
/// [`Rendering::Empty`] before any column is looked up.
pub fn render(
    view: &FilteredView<'_>,
    filter: &FilterState,
    config: &DashboardConfig,
) -> Result<Rendering, DashboardError> {
    if view.is_empty() {
        return Ok(Rendering::Empty(filter.empty_result()));
    }
    let ds = view.dataset;
    let age = ds.numeric_column(&config.age_column)?;
    let sex = ds.column_index(&config.sex_column)?;
    let cp = ds.column_index(&config.chest_pain_column)?;
    let chol = ds.numeric_column(&config.cholesterol_column)?;
    let trestbps = ds.numeric_column(&config.resting_bp_column)?;

    Ok(Rendering::Report(Report {
        total_records: view.len(),
        cp_counts: category_counts(view, cp),
        sex_counts: value_counts(view, sex),
        age_chol: scatter_groups(view, age, chol, sex),
        trestbps_by_sex: box_groups(view, trestbps, sex),
        summary: stats::describe(view, &config.summary_columns)?,
        correlation: stats::correlation(view),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Dataset;
    use std::collections::BTreeSet;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn heart_table(rows: &[[&str; 7]]) -> Dataset {
        Dataset::from_text_rows(
            ["age", "sex", "cp", "trestbps", "chol", "thalch", "oldpeak"]
                .iter()
                .map(|h| h.to_string())
                .collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    fn sample() -> Dataset {
        heart_table(&[
            ["63", "Male", "typical angina", "145", "233", "150", "2.3"],
            ["67", "Male", "asymptomatic", "160", "286", "108", "1.5"],
            ["41", "Female", "atypical angina", "130", "204", "172", "1.4"],
            ["56", "Female", "asymptomatic", "120", "", "162", "0.8"],
            ["57", "Male", "asymptomatic", "140", "192", "148", "0.4"],
        ])
    }

    #[test]
    fn test_value_counts_most_frequent_first() {
        let ds = sample();
        let view = FilteredView::all(&ds);
        let counts = value_counts(&view, 1);
        assert_eq!(counts, vec![(text("Male"), 3), (text("Female"), 2)]);

        let cp = category_counts(&view, 2);
        assert_eq!(cp[0], (text("asymptomatic"), 3));
        assert_eq!(cp.len(), 3);
    }

    #[test]
    fn test_scatter_skips_missing_coordinates() {
        let ds = sample();
        let view = FilteredView::all(&ds);
        let groups = scatter_groups(&view, 0, 4, 1);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].group, text("Female"));
        assert_eq!(groups[0].points, vec![[41.0, 204.0]]);
        assert_eq!(groups[1].points.len(), 3);
    }

    #[test]
    fn test_box_stats_flag_outliers() {
        let stats = BoxStats::from_values(
            text("Male"),
            vec![120.0, 122.0, 124.0, 126.0, 128.0, 200.0],
        )
        .unwrap();
        assert_eq!(stats.count, 6);
        assert_eq!(stats.outliers, vec![200.0]);
        assert_eq!(stats.lower_whisker, 120.0);
        assert_eq!(stats.upper_whisker, 128.0);
        assert!(stats.q1 <= stats.median && stats.median <= stats.q3);
        assert!(BoxStats::from_values(text("Male"), Vec::new()).is_none());
    }

    #[test]
    fn test_render_report_for_non_empty_view() {
        let ds = sample();
        let config = DashboardConfig::default();
        let view = FilteredView::all(&ds);
        let filter = FilterState {
            age_range: (0, 100),
            genders: BTreeSet::new(),
        };
        let Rendering::Report(report) = render(&view, &filter, &config).unwrap() else {
            panic!("expected a report");
        };
        assert_eq!(report.total_records, 5);
        assert_eq!(report.trestbps_by_sex.len(), 2);
        assert_eq!(report.summary.columns.len(), 5);
        assert_eq!(report.summary.columns[1].count, 4);
        assert_eq!(report.correlation.columns.len(), 5);
    }

    #[test]
    fn test_render_empty_view_warns() {
        let ds = sample();
        let config = DashboardConfig::default();
        let view = FilteredView::new(&ds, Vec::new());
        let filter = FilterState {
            age_range: (100, 110),
            genders: BTreeSet::new(),
        };
        let rendering = render(&view, &filter, &config).unwrap();
        assert!(matches!(
            rendering,
            Rendering::Empty(DashboardError::EmptyResult { lo: 100, hi: 110, .. })
        ));
    }

    #[test]
    fn test_pie_counts_empty_when_sex_is_all_null() {
        let ds = heart_table(&[
            ["63", "", "typical angina", "145", "233", "150", "2.3"],
            ["41", "", "atypical angina", "130", "204", "172", "1.4"],
        ]);
        let view = FilteredView::all(&ds);
        let filter = FilterState {
            age_range: (0, 100),
            genders: BTreeSet::new(),
        };
        let Rendering::Report(report) = render(&view, &filter, &DashboardConfig::default()).unwrap()
        else {
            panic!("expected a report");
        };
        assert_eq!(report.total_records, 2);
        assert!(report.sex_counts.is_empty());
        assert_eq!(report.trestbps_by_sex.len(), 1);
        assert!(report.trestbps_by_sex[0].group.is_null());
    }

    #[test]
    fn test_render_missing_column_propagates() {
        let ds = Dataset::from_text_rows(
            vec!["age".into(), "sex".into()],
            vec![vec!["40".into(), "M".into()]],
        );
        let view = FilteredView::all(&ds);
        let filter = FilterState {
            age_range: (0, 100),
            genders: BTreeSet::new(),
        };
        let err = render(&view, &filter, &DashboardConfig::default()).unwrap_err();
        assert_eq!(err, DashboardError::MissingColumn("cp".into()));
    }
}
