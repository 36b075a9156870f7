// src/grid.rs
use crate::data_types::{CellValue, TabularPayload};

/// Header-decorated projection of a payload, borrowing its rows.
#[derive(Debug, Clone, PartialEq)]
pub struct GridView<'a> {
    pub row_headers: Vec<String>,
    pub column_headers: Vec<String>,
    pub rows: Vec<&'a [CellValue]>,
}

impl<'a> GridView<'a> {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_headers.len()
    }

    /// `None` for positions past the end of a short row.
    pub fn cell(&self, row: usize, column: usize) -> Option<&'a CellValue> {
        self.rows.get(row).and_then(|cells| cells.get(column))
    }

    pub fn display_text(&self, row: usize, column: usize) -> String {
        self.cell(row, column).map(ToString::to_string).unwrap_or_default()
    }
}

/// Row headers are `1..N`; column headers are the payload's labels where it
/// has them and `1..M` by position otherwise.
pub fn render(payload: &TabularPayload) -> GridView<'_> {
    let labels = payload.headers.as_deref().unwrap_or(&[]);
    let column_headers = (0..payload.column_count())
        .map(|i| labels.get(i).cloned().unwrap_or_else(|| (i + 1).to_string()))
        .collect();

    GridView {
        row_headers: (1..=payload.row_count()).map(|i| i.to_string()).collect(),
        column_headers,
        rows: payload.rows.iter().map(Vec::as_slice).collect(),
    }
}
