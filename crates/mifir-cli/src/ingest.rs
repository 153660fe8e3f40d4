//! CSV ingestion into the tabular dataset model.
//!
//! Cells stay textual: identifier columns routinely look numeric (LEIs,
//! account numbers) and converting them to floats would corrupt them.
//! Blank cells become `Missing` so sampling skips them.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use mifir_model::{CellValue, Dataset};

/// Reads a CSV file into a [`Dataset`], using the header row as the
/// column list.
pub fn read_csv(path: &Path) -> Result<Dataset> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let dataset = dataset_from_reader(file)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    info!(
        path = %path.display(),
        columns = dataset.columns().len(),
        rows = dataset.row_count(),
        "loaded dataset"
    );
    Ok(dataset)
}

/// Reads CSV content from any reader. Short rows are padded by the
/// dataset; long rows are tolerated and truncated.
pub fn dataset_from_reader<R: Read>(reader: R) -> Result<Dataset> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = csv_reader.headers().context("missing header row")?;
    let mut dataset = Dataset::new(headers.iter().map(str::to_string).collect());

    for record in csv_reader.records() {
        let record = record.context("malformed CSV record")?;
        let cells = record
            .iter()
            .map(|value| {
                if value.trim().is_empty() {
                    CellValue::Missing
                } else {
                    CellValue::Text(value.to_string())
                }
            })
            .collect();
        dataset.push_row(cells);
    }
    Ok(dataset)
}
