use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::charts::{self, Rendering};
use crate::data::export::{self, ExportBlob};
use crate::data::filter::{self, FilterState};
use crate::data::loader;
use crate::data::model::{CellValue, Dataset, FilteredView};
use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// Notices
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Warning,
    Error,
}

/// A message shown to the user above the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

pub const MISSING_VALUES_WARNING: &str =
    "Dataset contains missing values. Please check and clean your data if necessary.";

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The session: one read-only dataset plus the user's filter selections and
/// everything derived from them. Independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// File the dataset was (or failed to be) loaded from.
    pub source: PathBuf,

    /// Loaded dataset (None until a load succeeds).
    pub dataset: Option<Arc<Dataset>>,

    /// Current filter selections.
    pub filters: FilterState,

    /// Observed `(min, max)` age, the slider bounds.
    pub age_bounds: (i64, i64),

    /// Indices of rows passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Artifacts of the filtered view, or the error that aborted them.
    pub rendering: Option<Result<Rendering, String>>,

    /// Colours of the gender groups, shared by every chart.
    pub color_map: Option<ColorMap>,

    /// Load-time messages (missing file, missing values).
    pub notices: Vec<Notice>,

    /// Outcome of the last failed download; replaced by each new attempt.
    pub export_notice: Option<Notice>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DashboardConfig::default())
    }
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            source: config.data_path.clone(),
            config,
            dataset: None,
            filters: FilterState {
                age_range: (0, 0),
                genders: Default::default(),
            },
            age_bounds: (0, 0),
            visible_indices: Vec::new(),
            rendering: None,
            color_map: None,
            notices: Vec::new(),
            export_notice: None,
        }
    }

    /// Load the configured dataset.
    pub fn load_default(&mut self) {
        let path = self.config.data_path.clone();
        self.load(&path);
    }

    /// Load the current source file again.
    pub fn reload(&mut self) {
        let path = self.source.clone();
        self.load(&path);
    }

    /// Load a dataset from disk, replacing the current session. On failure
    /// nothing but the error notice is left to render.
    pub fn load(&mut self, path: &Path) {
        self.source = path.to_path_buf();
        self.dataset = None;
        self.rendering = None;
        self.visible_indices.clear();
        self.notices.clear();
        self.export_notice = None;

        let result = loader::load_file(path).and_then(|ds| self.set_dataset(ds));
        if let Err(e) = result {
            let text = match e.downcast_ref::<DashboardError>() {
                Some(known @ DashboardError::FileNotFound { .. }) => known.to_string(),
                _ => format!("Error: {e:#}"),
            };
            log::error!("Failed to load {}: {e:#}", path.display());
            self.dataset = None;
            self.notices.push(Notice {
                level: NoticeLevel::Error,
                text,
            });
        }
    }

    /// Ingest a newly loaded dataset: check for missing values, initialise
    /// filters and colours, compute the first view.
    pub fn set_dataset(&mut self, dataset: Dataset) -> Result<()> {
        if let Some(warning) = check_missing(&dataset) {
            self.notices.push(warning);
        }
        self.age_bounds = filter::age_bounds(&dataset, &self.config)?;
        self.filters = FilterState::initial(&dataset, &self.config)?;
        self.color_map = dataset
            .unique_values
            .get(&self.config.sex_column)
            .map(|vals| ColorMap::new(&self.config.sex_column, vals));

        self.dataset = Some(Arc::new(dataset));
        self.refilter();
        Ok(())
    }

    /// Recompute `visible_indices` and every derived artifact after a filter
    /// change.
    pub fn refilter(&mut self) {
        let Some(ds) = self.dataset.clone() else {
            return;
        };
        let view = match filter::apply_filter(&ds, &self.filters, &self.config) {
            Ok(view) => view,
            Err(e) => {
                log::error!("Filter failed: {e}");
                self.visible_indices.clear();
                self.rendering = Some(Err(e.to_string()));
                return;
            }
        };
        log::debug!(
            "Filter {:?} / [{}] keeps {} of {} rows",
            self.filters.age_range,
            self.filters.gender_labels(),
            view.len(),
            ds.len()
        );

        self.rendering = Some(match charts::render(&view, &self.filters, &self.config) {
            Ok(rendering) => {
                if let Rendering::Empty(warning) = &rendering {
                    log::warn!("{warning}");
                }
                Ok(rendering)
            }
            Err(e) => {
                log::error!("Render failed: {e}");
                Err(e.to_string())
            }
        });
        self.visible_indices = view.indices;
    }

    /// The current filtered view, if a dataset is loaded.
    pub fn view(&self) -> Option<FilteredView<'_>> {
        self.dataset
            .as_deref()
            .map(|ds| FilteredView::new(ds, self.visible_indices.clone()))
    }

    /// Distinct `sex` values offered by the gender selector.
    pub fn gender_options(&self) -> Vec<CellValue> {
        self.dataset
            .as_ref()
            .and_then(|ds| ds.unique_values.get(&self.config.sex_column))
            .map(|vals| vals.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Move the lower end of the age range, dragging the upper end along if
    /// it would cross.
    pub fn set_age_low(&mut self, lo: i64) {
        let (min, max) = self.age_bounds;
        let lo = lo.clamp(min, max);
        self.filters.age_range = (lo, self.filters.age_range.1.max(lo));
        self.refilter();
    }

    /// Move the upper end of the age range, dragging the lower end along if
    /// it would cross.
    pub fn set_age_high(&mut self, hi: i64) {
        let (min, max) = self.age_bounds;
        let hi = hi.clamp(min, max);
        self.filters.age_range = (self.filters.age_range.0.min(hi), hi);
        self.refilter();
    }

    /// Toggle a single gender in the selection.
    pub fn toggle_gender(&mut self, value: &CellValue) {
        if !self.filters.genders.remove(value) {
            self.filters.genders.insert(value.clone());
        }
        self.refilter();
    }

    pub fn select_all_genders(&mut self) {
        self.filters.genders = self.gender_options().into_iter().collect();
        self.refilter();
    }

    /// Clear the selection. An empty selection does not filter by gender.
    pub fn select_no_genders(&mut self) {
        self.filters.genders.clear();
        self.refilter();
    }

    /// CSV download of the current view. Available for empty views too.
    pub fn export_blob(&self) -> Result<ExportBlob> {
        let view = self.view().context("no dataset loaded")?;
        export::export_blob(&view, &self.config)
    }

    /// Record the outcome of a download attempt. A failure replaces the
    /// previous export notice; a success clears it.
    pub fn record_export(&mut self, result: Result<()>) {
        self.export_notice = match result {
            Ok(()) => None,
            Err(e) => {
                log::error!("Export failed: {e:#}");
                Some(Notice {
                    level: NoticeLevel::Error,
                    text: format!("Export failed: {e:#}"),
                })
            }
        };
    }

    /// Load-time notices followed by the export notice, in display order.
    pub fn all_notices(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter().chain(self.export_notice.as_ref())
    }
}

/// Advisory warning when any cell is null. Never blocks processing.
pub fn check_missing(dataset: &Dataset) -> Option<Notice> {
    if !dataset.has_missing_values() {
        return None;
    }
    log::warn!(
        "Dataset contains {} missing values",
        dataset.missing_count()
    );
    Some(Notice {
        level: NoticeLevel::Warning,
        text: MISSING_VALUES_WARNING.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn heart(rows: &[[&str; 7]]) -> Dataset {
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

    fn session() -> AppState {
        let mut state = AppState::default();
        state
            .set_dataset(heart(&[
                ["25", "M", "1", "120", "200", "150", "1.0"],
                ["30", "M", "2", "130", "210", "160", "0.5"],
                ["45", "F", "1", "125", "220", "155", "1.5"],
                ["60", "F", "3", "140", "240", "140", "2.0"],
                ["70", "M", "4", "150", "260", "130", "2.5"],
            ]))
            .unwrap();
        state
    }

    #[test]
    fn test_initial_view_uses_default_range() {
        let state = session();
        assert_eq!(state.age_bounds, (25, 70));
        assert_eq!(state.filters.age_range, (30, 60));
        assert_eq!(state.visible_indices, vec![1, 2, 3]);
        assert!(state.notices.is_empty());
        assert!(matches!(state.rendering, Some(Ok(Rendering::Report(_)))));
    }

    #[test]
    fn test_gender_toggles() {
        let mut state = session();
        state.toggle_gender(&text("M"));
        assert_eq!(state.visible_indices, vec![2, 3]);

        state.select_no_genders();
        assert_eq!(state.visible_indices, vec![1, 2, 3]);

        state.toggle_gender(&text("M"));
        assert_eq!(state.visible_indices, vec![1]);

        state.select_all_genders();
        assert_eq!(state.filters.genders.len(), 2);
    }

    #[test]
    fn test_age_setters_keep_range_ordered() {
        let mut state = session();
        state.set_age_low(65);
        assert_eq!(state.filters.age_range, (65, 65));
        state.set_age_high(10);
        assert_eq!(state.filters.age_range, (25, 25));
        assert_eq!(state.visible_indices, vec![0]);
    }

    #[test]
    fn test_empty_view_still_exports_header() {
        let mut state = session();
        state.set_age_low(26);
        state.set_age_high(29);
        assert!(state.visible_indices.is_empty());
        assert!(matches!(state.rendering, Some(Ok(Rendering::Empty(_)))));

        let blob = state.export_blob().unwrap();
        assert_eq!(blob.data, "age,sex,cp,trestbps,chol,thalch,oldpeak\n");
    }

    #[test]
    fn test_missing_values_warn_but_continue() {
        let mut state = AppState::default();
        state
            .set_dataset(heart(&[["40", "F", "1", "", "200", "150", "1.0"]]))
            .unwrap();
        assert_eq!(state.notices.len(), 1);
        assert_eq!(state.notices[0].level, NoticeLevel::Warning);
        assert_eq!(state.visible_indices, vec![0]);
    }

    #[test]
    fn test_missing_file_leaves_session_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cleaned_dataset.csv");
        let mut state = AppState::default();
        state.load(&path);

        assert!(state.dataset.is_none());
        assert!(state.rendering.is_none());
        assert_eq!(state.notices[0].level, NoticeLevel::Error);
        assert!(state.notices[0].text.starts_with("File not found"));
        assert!(state.export_blob().is_err());
    }

    #[test]
    fn test_repeated_export_failures_keep_one_notice() {
        let mut state = session();
        state.record_export(Err(anyhow::anyhow!("disk full")));
        state.record_export(Err(anyhow::anyhow!("permission denied")));

        let notices: Vec<&Notice> = state.all_notices().collect();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert_eq!(notices[0].text, "Export failed: permission denied");

        state.record_export(Ok(()));
        assert!(state.export_notice.is_none());
        assert_eq!(state.all_notices().count(), 0);
    }

    #[test]
    fn test_reload_rereads_the_configured_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cleaned_dataset.csv");
        std::fs::write(&path, "age,sex\n40,M\n").unwrap();

        let mut state = AppState::new(DashboardConfig {
            data_path: path.clone(),
            ..DashboardConfig::default()
        });
        state.load_default();
        assert_eq!(state.dataset.as_ref().unwrap().len(), 1);

        std::fs::write(&path, "age,sex\n40,M\n50,F\n").unwrap();
        state.reload();
        assert_eq!(state.source, path);
        assert_eq!(state.dataset.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn test_reload_clears_export_notice() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cleaned_dataset.csv");
        std::fs::write(&path, "age,sex\n40,M\n").unwrap();

        let mut state = AppState::default();
        state.load(&path);
        state.record_export(Err(anyhow::anyhow!("disk full")));
        state.reload();
        assert!(state.export_notice.is_none());
        assert!(state.dataset.is_some());
    }

    #[test]
    fn test_schema_failure_surfaces_as_render_error() {
        let mut state = AppState::default();
        let ds = Dataset::from_text_rows(
            vec!["age".into(), "sex".into()],
            vec![vec!["40".into(), "M".into()]],
        );
        state.set_dataset(ds).unwrap();
        assert!(matches!(&state.rendering, Some(Err(msg)) if msg.contains("'cp'")));
        assert_eq!(state.visible_indices, vec![0]);
        assert_eq!(state.export_blob().unwrap().data, "age,sex\n40,M\n");
    }
}
