use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Dashboard errors
// ---------------------------------------------------------------------------

/// Error kinds the dashboard recognises by name.
///
/// `FileNotFound` halts the session, `EmptyResult` is shown as a warning and
/// the rest are schema failures that abort the current render cycle.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DashboardError {
    #[error("File not found. Please upload the file: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("No data available for the selected filters: Age Range = ({lo}, {hi}), Gender = [{genders}]")]
    EmptyResult { lo: i64, hi: i64, genders: String },

    #[error("Column '{0}' not found in dataset")]
    MissingColumn(String),

    #[error("Column '{0}' is not numeric")]
    NotNumeric(String),

    #[error("Column '{0}' has no values")]
    EmptyColumn(String),
}
