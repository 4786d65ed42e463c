use std::io::Write;

use anyhow::{Context, Result};

use crate::config::DashboardConfig;

use super::model::FilteredView;

// ---------------------------------------------------------------------------
// Export blob
// ---------------------------------------------------------------------------

/// A downloadable serialisation of the current view.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportBlob {
    pub file_name: String,
    pub mime: String,
    pub data: String,
}

/// Write the view as CSV: header row with every dataset column in file
/// order, then one record per row. No index column, nulls are empty fields.
///
/// Returns the number of data rows written.
pub fn export_csv<W: Write>(view: &FilteredView<'_>, writer: W) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(view.dataset.columns.iter().map(|c| c.name.as_str()))
        .context("writing CSV header")?;

    let mut count = 0;
    for row in view.rows() {
        csv_writer
            .serialize(row)
            .with_context(|| format!("writing CSV row {count}"))?;
        count += 1;
    }

    csv_writer.flush().context("flushing CSV output")?;
    Ok(count)
}

/// Serialise the view into the CSV download offered by the side panel.
pub fn export_blob(view: &FilteredView<'_>, config: &DashboardConfig) -> Result<ExportBlob> {
    let mut buf = Vec::new();
    let rows = export_csv(view, &mut buf)?;
    log::debug!("Serialised {rows} rows for export");

    Ok(ExportBlob {
        file_name: config.export_file_name.clone(),
        mime: config.export_mime.clone(),
        data: String::from_utf8(buf).context("CSV output is not UTF-8")?,
    })
}
