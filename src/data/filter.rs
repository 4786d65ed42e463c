use std::collections::BTreeSet;

use crate::config::DashboardConfig;
use crate::error::DashboardError;

use super::model::{CellValue, Dataset, FilteredView};

// ---------------------------------------------------------------------------
// Filter predicate: age range + selected genders
// ---------------------------------------------------------------------------

/// The user's current filter selections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    /// Inclusive `(lo, hi)` age range.
    pub age_range: (i64, i64),
    /// Selected `sex` values. Empty means "no gender filter" (show all).
    pub genders: BTreeSet<CellValue>,
}

impl FilterState {
    /// Initial filter: the configured default age range clamped into the
    /// dataset's bounds, every gender selected.
    pub fn initial(dataset: &Dataset, config: &DashboardConfig) -> Result<Self, DashboardError> {
        let (min, max) = age_bounds(dataset, config)?;
        let (lo, hi) = config.default_age_range;
        let genders = dataset
            .unique_values
            .get(&config.sex_column)
            .cloned()
            .ok_or_else(|| DashboardError::MissingColumn(config.sex_column.clone()))?;

        Ok(Self {
            age_range: (lo.clamp(min, max), hi.clamp(min, max)),
            genders,
        })
    }

    /// Comma separated labels of the selected genders, for messages.
    pub fn gender_labels(&self) -> String {
        self.genders
            .iter()
            .map(|g| g.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// The warning raised when these filters leave no rows.
    pub fn empty_result(&self) -> DashboardError {
        DashboardError::EmptyResult {
            lo: self.age_range.0,
            hi: self.age_range.1,
            genders: self.gender_labels(),
        }
    }
}

/// Slider bounds: observed min and max age, truncated toward zero.
pub fn age_bounds(dataset: &Dataset, config: &DashboardConfig) -> Result<(i64, i64), DashboardError> {
    let (min, max) = dataset.numeric_bounds(&config.age_column)?;
    Ok((min.trunc() as i64, max.trunc() as i64))
}

/// Return indices of rows that pass the filter.
///
/// A row passes when:
/// * its age is within the inclusive range (a null age never passes), and
/// * the gender selection is empty, or the row's `sex` is in it.
pub fn filtered_indices(
    dataset: &Dataset,
    filter: &FilterState,
    config: &DashboardConfig,
) -> Result<Vec<usize>, DashboardError> {
    let age_idx = dataset.numeric_column(&config.age_column)?;
    let sex_idx = dataset.column_index(&config.sex_column)?;
    let (lo, hi) = (filter.age_range.0 as f64, filter.age_range.1 as f64);

    Ok(dataset
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            let in_range = row[age_idx]
                .as_f64()
                .is_some_and(|age| lo <= age && age <= hi);
            // An empty selection passes every row through.
            in_range && (filter.genders.is_empty() || filter.genders.contains(&row[sex_idx]))
        })
        .map(|(i, _)| i)
        .collect())
}

/// Apply the filter and wrap the surviving rows in a [`FilteredView`].
pub fn apply_filter<'a>(
    dataset: &'a Dataset,
    filter: &FilterState,
    config: &DashboardConfig,
) -> Result<FilteredView<'a>, DashboardError> {
    Ok(FilteredView::new(
        dataset,
        filtered_indices(dataset, filter, config)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(rows: &[(&str, &str)]) -> Dataset {
        Dataset::from_text_rows(
            vec!["age".into(), "sex".into()],
            rows.iter()
                .map(|(a, s)| vec![a.to_string(), s.to_string()])
                .collect(),
        )
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn scenario() -> Dataset {
        dataset(&[("25", "M"), ("30", "M"), ("45", "F"), ("60", "F"), ("70", "M")])
    }

    #[test]
    fn test_range_is_inclusive_and_gender_restricts() {
        let ds = scenario();
        let filter = FilterState {
            age_range: (30, 60),
            genders: [text("F")].into_iter().collect(),
        };
        let idx = filtered_indices(&ds, &filter, &DashboardConfig::default()).unwrap();
        assert_eq!(idx, vec![2, 3]);
    }

    #[test]
    fn test_empty_gender_selection_passes_through() {
        let ds = scenario();
        let config = DashboardConfig::default();
        let none = FilterState {
            age_range: (30, 60),
            genders: BTreeSet::new(),
        };
        let all = FilterState {
            age_range: (30, 60),
            genders: [text("F"), text("M")].into_iter().collect(),
        };
        let idx = filtered_indices(&ds, &none, &config).unwrap();
        assert_eq!(idx, vec![1, 2, 3]);
        assert_eq!(idx, filtered_indices(&ds, &all, &config).unwrap());
    }

    #[test]
    fn test_out_of_range_yields_empty_view() {
        let ds = scenario();
        let filter = FilterState {
            age_range: (100, 110),
            genders: BTreeSet::new(),
        };
        let view = apply_filter(&ds, &filter, &DashboardConfig::default()).unwrap();
        assert!(view.is_empty());
    }

    #[test]
    fn test_null_age_never_matches() {
        let ds = dataset(&[("", "M"), ("40", "M")]);
        let filter = FilterState {
            age_range: (0, 200),
            genders: BTreeSet::new(),
        };
        let idx = filtered_indices(&ds, &filter, &DashboardConfig::default()).unwrap();
        assert_eq!(idx, vec![1]);
    }

    #[test]
    fn test_initial_state_uses_default_range_inside_bounds() {
        let ds = dataset(&[("20", "M"), ("80", "F")]);
        let state = FilterState::initial(&ds, &DashboardConfig::default()).unwrap();
        assert_eq!(state.age_range, (30, 60));
        assert_eq!(state.genders.len(), 2);
    }

    #[test]
    fn test_initial_state_clamps_to_bounds() {
        let ds = dataset(&[("35", "M"), ("50", "F")]);
        let state = FilterState::initial(&ds, &DashboardConfig::default()).unwrap();
        assert_eq!(state.age_range, (35, 50));

        let old = dataset(&[("65", "M"), ("90", "F")]);
        let state = FilterState::initial(&old, &DashboardConfig::default()).unwrap();
        assert_eq!(state.age_range, (65, 65));
    }

    #[test]
    fn test_missing_sex_column_is_an_error() {
        let ds = Dataset::from_text_rows(vec!["age".into()], vec![vec!["40".into()]]);
        let err = FilterState::initial(&ds, &DashboardConfig::default()).unwrap_err();
        assert_eq!(err, DashboardError::MissingColumn("sex".into()));
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let ds = scenario();
        let config = DashboardConfig::default();
        let filter = FilterState::initial(&ds, &config).unwrap();
        let first = filtered_indices(&ds, &filter, &config).unwrap();
        let second = filtered_indices(&ds, &filter, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_result_message_names_filters() {
        let filter = FilterState {
            age_range: (100, 110),
            genders: [text("F"), text("M")].into_iter().collect(),
        };
        assert_eq!(
            filter.empty_result().to_string(),
            "No data available for the selected filters: Age Range = (100, 110), Gender = [F, M]"
        );
    }
}
