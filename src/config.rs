use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Fixed dashboard configuration
// ---------------------------------------------------------------------------

/// Dataset loaded at startup, relative to the working directory.
pub const DATA_FILE: &str = "cleaned_dataset.csv";

/// Suggested file name of the CSV download.
pub const EXPORT_FILE_NAME: &str = "filtered_healthcare_data.csv";

pub const EXPORT_MIME: &str = "text/csv";

/// Columns covered by the summary statistics table.
pub const SUMMARY_COLUMNS: [&str; 5] = ["age", "chol", "trestbps", "thalch", "oldpeak"];

/// Everything the dashboard treats as a constant. There are no CLI flags or
/// environment variables; `Default` is the only source.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub title: String,
    pub data_path: PathBuf,
    pub export_file_name: String,
    pub export_mime: String,
    /// Initial age slider position, clamped into the dataset's bounds.
    pub default_age_range: (i64, i64),
    pub age_column: String,
    pub sex_column: String,
    pub chest_pain_column: String,
    pub cholesterol_column: String,
    pub resting_bp_column: String,
    pub summary_columns: Vec<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "Healthcare Predictive Analytics Dashboard".to_string(),
            data_path: PathBuf::from(DATA_FILE),
            export_file_name: EXPORT_FILE_NAME.to_string(),
            export_mime: EXPORT_MIME.to_string(),
            default_age_range: (30, 60),
            age_column: "age".to_string(),
            sex_column: "sex".to_string(),
            chest_pain_column: "cp".to_string(),
            cholesterol_column: "chol".to_string(),
            resting_bp_column: "trestbps".to_string(),
            summary_columns: SUMMARY_COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }
}
