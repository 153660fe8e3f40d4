//! In-memory tabular dataset model.
//!
//! The core receives its input as an ordered column list plus ordered
//! rows of loosely-typed cells; parsing (CSV/Excel) happens outside the
//! core. Column names are matched after trimming, since exported files
//! routinely carry padded headers.

use serde::{Deserialize, Serialize};

/// A single cell value from the input dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum CellValue {
    Text(String),
    Number(f64),
    Missing,
}

impl CellValue {
    /// Renders the cell as a trimmed string; `Missing` renders empty.
    ///
    /// Whole numbers print without a trailing `.0` so identifiers read
    /// from numeric columns keep their source shape.
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Text(text) => text.trim().to_string(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
            CellValue::Missing => String::new(),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Text(text) => text.trim().is_empty(),
            CellValue::Number(_) => false,
            CellValue::Missing => true,
        }
    }
}

/// An ordered tabular dataset: one column list, zero or more rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Dataset {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Appends a row, padding or truncating to the column count.
    pub fn push_row(&mut self, mut cells: Vec<CellValue>) {
        cells.resize(self.columns.len(), CellValue::Missing);
        self.rows.push(cells);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> impl Iterator<Item = RowView<'_>> {
        self.rows.iter().map(|cells| RowView {
            columns: &self.columns,
            cells,
        })
    }

    pub fn row(&self, index: usize) -> Option<RowView<'_>> {
        self.rows.get(index).map(|cells| RowView {
            columns: &self.columns,
            cells,
        })
    }

    /// Index of a column, matching trimmed names.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let wanted = name.trim();
        self.columns.iter().position(|c| c.trim() == wanted)
    }

    /// First `limit` distinct non-blank values per column, in dataset
    /// order. Columns with no usable values map to an empty vec.
    pub fn column_samples(&self, limit: usize) -> Vec<(String, Vec<String>)> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let mut samples: Vec<String> = Vec::new();
                for row in &self.rows {
                    if samples.len() >= limit {
                        break;
                    }
                    let Some(cell) = row.get(idx) else { continue };
                    if cell.is_blank() {
                        continue;
                    }
                    let text = cell.as_text();
                    if !samples.contains(&text) {
                        samples.push(text);
                    }
                }
                (column.trim().to_string(), samples)
            })
            .collect()
    }
}

/// Borrowed view of a single dataset row.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    columns: &'a [String],
    cells: &'a [CellValue],
}

impl RowView<'_> {
    /// Cell text for a column, matching trimmed names; empty string when
    /// the column is absent or the cell is missing.
    pub fn value(&self, column: &str) -> String {
        let wanted = column.trim();
        self.columns
            .iter()
            .position(|c| c.trim() == wanted)
            .and_then(|idx| self.cells.get(idx))
            .map(CellValue::as_text)
            .unwrap_or_default()
    }

    /// Concatenation of every cell's text, used for content hashing.
    pub fn fingerprint(&self) -> String {
        let mut out = String::new();
        for (column, cell) in self.columns.iter().zip(self.cells) {
            out.push_str(column.trim());
            out.push('=');
            out.push_str(&cell.as_text());
            out.push(';');
        }
        out
    }
}
