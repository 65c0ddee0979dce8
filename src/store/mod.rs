//! Row store abstraction
//!
//! The task sheet lives in a workbook: one or more named sheets, each a ragged
//! table of string cells addressed by 1-based row number and column letter.
//! [`RowStore`] is the only surface the repository depends on.
//!
//! Implementations:
//! - [`FileSheet`]: JSON workbook on disk, lock + atomic replace per write
//! - [`MemorySheet`]: in-process workbook with failure injection for tests

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::columns::CellRef;
use crate::error::{Error, Result};

mod file;
mod memory;

pub use file::FileSheet;
pub use memory::{MemorySheet, StoreOp};

/// Sheet name used when the workbook cannot tell us one
pub const FALLBACK_SHEET_NAME: &str = "Sheet1";

/// A ragged table row
pub type Row = Vec<String>;

/// Flat external table of string cells.
#[async_trait]
pub trait RowStore: Send + Sync {
    /// Titles of the sheets in the workbook, in workbook order
    async fn sheet_titles(&self) -> Result<Vec<String>>;

    /// Every row of `sheet`, header included; rows may be short
    async fn fetch_rows(&self, sheet: &str) -> Result<Vec<Row>>;

    /// Append one row after the last row of `sheet`
    async fn append_row(&self, sheet: &str, values: Row) -> Result<()>;

    /// Point write of a single cell
    async fn write_cell(&self, cell: &CellRef, value: &str) -> Result<()>;
}

/// Serialized workbook shared by the file and memory stores
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    #[serde(default)]
    pub sheets: Vec<Sheet>,
}

/// One named sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub title: String,
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl Workbook {
    /// Workbook with a single sheet holding `rows`
    pub fn single(title: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            sheets: vec![Sheet {
                title: title.into(),
                rows,
            }],
        }
    }

    pub fn titles(&self) -> Vec<String> {
        self.sheets.iter().map(|sheet| sheet.title.clone()).collect()
    }

    pub fn sheet(&self, title: &str) -> Result<&Sheet> {
        self.sheets
            .iter()
            .find(|sheet| sheet.title == title)
            .ok_or_else(|| Error::SheetNotFound(title.to_string()))
    }

    fn sheet_mut(&mut self, title: &str) -> Result<&mut Sheet> {
        self.sheets
            .iter_mut()
            .find(|sheet| sheet.title == title)
            .ok_or_else(|| Error::SheetNotFound(title.to_string()))
    }

    pub fn append_row(&mut self, title: &str, values: Row) -> Result<()> {
        self.sheet_mut(title)?.rows.push(values);
        Ok(())
    }

    /// Write one cell, growing the sheet and the row as needed.
    pub fn write_cell(&mut self, cell: &CellRef, value: &str) -> Result<()> {
        let column = cell.column_index().ok_or_else(|| {
            Error::InvalidArgument(format!("invalid column '{}' in {cell}", cell.column))
        })?;
        if cell.row == 0 {
            return Err(Error::InvalidArgument(format!(
                "row numbers start at 1 ({cell})"
            )));
        }

        let sheet = self.sheet_mut(&cell.sheet)?;
        let row_index = cell.row - 1;
        if sheet.rows.len() <= row_index {
            sheet.rows.resize_with(row_index + 1, Vec::new);
        }
        let row = &mut sheet.rows[row_index];
        if row.len() <= column {
            row.resize(column + 1, String::new());
        }
        row[column] = value.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::{COST, HOURS_INVESTED};

    #[test]
    fn write_cell_pads_short_rows() {
        let mut book = Workbook::single("Sheet1", vec![vec!["Timestamp".to_string()]]);
        book.write_cell(&CellRef::new("Sheet1", HOURS_INVESTED, 3), "4")
            .unwrap();

        let sheet = book.sheet("Sheet1").unwrap();
        assert_eq!(sheet.rows.len(), 3);
        assert!(sheet.rows[1].is_empty());
        assert_eq!(sheet.rows[2].len(), 10);
        assert_eq!(sheet.rows[2][9], "4");
    }

    #[test]
    fn write_cell_rejects_unknown_sheet_and_row_zero() {
        let mut book = Workbook::single("Sheet1", Vec::new());
        assert!(matches!(
            book.write_cell(&CellRef::new("Other", COST, 2), "1"),
            Err(Error::SheetNotFound(_))
        ));
        assert!(matches!(
            book.write_cell(&CellRef::new("Sheet1", COST, 0), "1"),
            Err(Error::InvalidArgument(_))
        ));
    }
}
