use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};

use crate::error::DashboardError;

use super::model::Dataset;

/// Load the patient table from a comma separated file. The header row names
/// the columns; every other row is a record. Column kinds are inferred from
/// the whole column.
///
/// A missing file fails with [`DashboardError::FileNotFound`], which callers
/// can recover with `downcast_ref`.
pub fn load_file(path: &Path) -> Result<Dataset> {
    let mut reader = csv::Reader::from_reader(open(path)?);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(|v| v.to_string()).collect());
    }

    let dataset = Dataset::from_text_rows(headers, rows);
    log::info!(
        "Loaded {} rows with columns {:?} from {}",
        dataset.len(),
        dataset.column_names(),
        path.display()
    );
    Ok(dataset)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            anyhow::Error::new(DashboardError::FileNotFound {
                path: path.to_path_buf(),
            })
        } else {
            anyhow::Error::new(e).context(format!("opening {}", path.display()))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_missing_file_is_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cleaned_dataset.csv");
        let err = load_file(&path).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DashboardError>(),
            Some(&DashboardError::FileNotFound { path })
        );
    }

    #[test]
    fn test_load_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "data.csv",
            "age,sex,chol\n63,Male,233\n41,Female,\n",
        );
        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.column_names(), vec!["age", "sex", "chol"]);
        assert_eq!(ds.rows[1][2], CellValue::Null);
        assert!(ds.has_missing_values());
    }

    #[test]
    fn test_ragged_csv_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "bad.csv", "age,sex\n63,Male,extra\n");
        let err = load_file(&path).unwrap_err();
        assert!(err.downcast_ref::<DashboardError>().is_none());
    }

    #[test]
    fn test_every_file_is_read_as_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "data.json", "age,sex\n40,M\n");
        let ds = load_file(&path).unwrap();
        assert_eq!(ds.column_names(), vec!["age", "sex"]);
        assert_eq!(ds.rows[0][0], CellValue::Integer(40));
    }
}
