//! Healthcare analytics dashboard: load a patient table, filter it by age
//! range and gender, and chart the filtered rows.
//!
//! Everything except the `main` entry point lives here so integration tests
//! can drive the data pipeline and session without a window.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod state;
pub mod ui;
