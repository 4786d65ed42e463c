/// Data layer: table model, loading, filtering and everything derived from
/// the filtered view.
///
/// Architecture:
/// ```text
///  cleaned_dataset.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  age range ∧ gender set → FilteredView
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌──────────┐
///   │  charts   │   │  export   │  CSV download
///   │  + stats  │   └──────────┘
///   └──────────┘
/// ```

pub mod charts;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;
