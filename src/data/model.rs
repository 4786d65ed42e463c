use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring common dataframe dtypes.
/// Used as a key in `BTreeMap` / `BTreeSet` downstream so it must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.4}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

/// A cell serialises as its CSV field text, so the CSV writer can take a row
/// slice directly.
impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_field())
    }
}

impl CellValue {
    /// Numeric value of an `Integer` or `Float` cell.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Text written to a CSV field. Floats always keep a decimal point so the
    /// column is read back as `Float`.
    pub fn to_field(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Integer(i) => i.to_string(),
            CellValue::Float(v) => {
                let s = v.to_string();
                if v.is_finite() && !s.contains('.') {
                    format!("{s}.0")
                } else {
                    s
                }
            }
            CellValue::Bool(b) => if *b { "True" } else { "False" }.to_string(),
            CellValue::Null => String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Columns and kind inference
// ---------------------------------------------------------------------------

/// Markers read as a missing value.
const NA_MARKERS: [&str; 11] = [
    "", "NA", "N/A", "n/a", "NaN", "nan", "null", "NULL", "None", "#N/A", "<NA>",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Bool,
    Text,
}

impl ColumnKind {
    /// Booleans are not numeric, as in a dataframe's `select_dtypes("number")`.
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Float)
    }

    /// Pick the narrowest kind every non-null cell of a raw column fits.
    fn infer<'a>(cells: impl Iterator<Item = &'a str> + Clone) -> ColumnKind {
        let mut present = cells.filter(|s| !is_na(s)).peekable();
        if present.peek().is_none() {
            return ColumnKind::Float;
        }
        if present.clone().all(|s| s.trim().parse::<i64>().is_ok()) {
            ColumnKind::Integer
        } else if present.clone().all(|s| s.trim().parse::<f64>().is_ok()) {
            ColumnKind::Float
        } else if present.all(|s| parse_bool(s).is_some()) {
            ColumnKind::Bool
        } else {
            ColumnKind::Text
        }
    }

    fn parse(self, raw: &str) -> CellValue {
        if is_na(raw) {
            return CellValue::Null;
        }
        let parsed = match self {
            ColumnKind::Integer => raw.trim().parse().ok().map(CellValue::Integer),
            ColumnKind::Float => raw.trim().parse().ok().map(CellValue::Float),
            ColumnKind::Bool => parse_bool(raw).map(CellValue::Bool),
            ColumnKind::Text => None,
        };
        parsed.unwrap_or_else(|| CellValue::Text(raw.to_string()))
    }
}

fn is_na(raw: &str) -> bool {
    NA_MARKERS.contains(&raw.trim())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with a pre-computed distinct-value index.
/// Never mutated after construction.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Columns in file order.
    pub columns: Vec<Column>,
    /// Rows, each aligned with `columns`.
    pub rows: Vec<Vec<CellValue>>,
    /// For each column the sorted set of distinct values (`Null` included).
    pub unique_values: BTreeMap<String, BTreeSet<CellValue>>,
}

impl Dataset {
    /// Build a dataset from raw text cells, inferring one kind per column.
    /// Short rows are padded with nulls.
    pub fn from_text_rows(headers: Vec<String>, raw_rows: Vec<Vec<String>>) -> Self {
        let columns: Vec<Column> = headers
            .into_iter()
            .enumerate()
            .map(|(idx, name)| {
                let kind = if raw_rows.is_empty() {
                    ColumnKind::Text
                } else {
                    ColumnKind::infer(
                        raw_rows
                            .iter()
                            .map(move |r| r.get(idx).map(String::as_str).unwrap_or("")),
                    )
                };
                Column { name, kind }
            })
            .collect();

        let rows = raw_rows
            .iter()
            .map(|raw| {
                columns
                    .iter()
                    .enumerate()
                    .map(|(idx, col)| col.kind.parse(raw.get(idx).map(String::as_str).unwrap_or("")))
                    .collect()
            })
            .collect();

        Self::from_columns(columns, rows)
    }

    /// Build the distinct-value index over already typed rows.
    pub fn from_columns(columns: Vec<Column>, rows: Vec<Vec<CellValue>>) -> Self {
        let mut unique_values: BTreeMap<String, BTreeSet<CellValue>> = columns
            .iter()
            .map(|c| (c.name.clone(), BTreeSet::new()))
            .collect();

        for row in &rows {
            for (col, val) in columns.iter().zip(row) {
                if let Some(set) = unique_values.get_mut(&col.name) {
                    set.insert(val.clone());
                }
            }
        }

        Dataset {
            columns,
            rows,
            unique_values,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column_index(&self, name: &str) -> Result<usize, DashboardError> {
        self.columns
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| DashboardError::MissingColumn(name.to_string()))
    }

    /// Index of a column that has to hold numbers.
    pub fn numeric_column(&self, name: &str) -> Result<usize, DashboardError> {
        let idx = self.column_index(name)?;
        if self.columns[idx].kind.is_numeric() {
            Ok(idx)
        } else {
            Err(DashboardError::NotNumeric(name.to_string()))
        }
    }

    /// Indices of every numeric column, in file order.
    pub fn numeric_columns(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.kind.is_numeric())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn missing_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|r| r.iter())
            .filter(|v| v.is_null())
            .count()
    }

    pub fn has_missing_values(&self) -> bool {
        self.rows.iter().any(|r| r.iter().any(CellValue::is_null))
    }

    /// Observed minimum and maximum of a numeric column, ignoring nulls.
    pub fn numeric_bounds(&self, name: &str) -> Result<(f64, f64), DashboardError> {
        let idx = self.numeric_column(name)?;
        let mut values = self.rows.iter().filter_map(|r| r[idx].as_f64());
        let first = values
            .next()
            .ok_or_else(|| DashboardError::EmptyColumn(name.to_string()))?;
        Ok(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

// ---------------------------------------------------------------------------
// FilteredView – the rows that passed the current filter
// ---------------------------------------------------------------------------

/// A borrowed subset of a [`Dataset`]: the dataset plus the indices of the
/// rows that passed the filter, in dataset order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    pub dataset: &'a Dataset,
    pub indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    pub fn new(dataset: &'a Dataset, indices: Vec<usize>) -> Self {
        Self { dataset, indices }
    }

    /// A view of every row.
    pub fn all(dataset: &'a Dataset) -> Self {
        Self::new(dataset, (0..dataset.len()).collect())
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &'a [CellValue]> + '_ {
        let dataset = self.dataset;
        self.indices.iter().map(move |&i| dataset.rows[i].as_slice())
    }

    /// Cells of one column, in view order.
    pub fn values(&self, column: usize) -> impl Iterator<Item = &'a CellValue> + '_ {
        self.rows().map(move |r| &r[column])
    }

    /// Non-null numbers of one column, in view order.
    pub fn numbers(&self, column: usize) -> Vec<f64> {
        self.values(column).filter_map(CellValue::as_f64).collect()
    }
}
