//! Fixed column layout of the task sheet and A1-style cell addressing.
//!
//! Row 1 of every sheet is the header and is never written by tasksheet.
//! Data starts at row 2, so a 0-based data index maps to row `index + 2`.

use std::fmt;

/// One column of the task sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// 0-based position in a row
    pub index: usize,
    /// Header text written by `tasksheet init`
    pub header: &'static str,
}

impl Column {
    const fn new(index: usize, header: &'static str) -> Self {
        Self { index, header }
    }

    /// Spreadsheet column letter (`A`, `B`, ..., `Z`, `AA`, ...)
    pub fn letter(&self) -> String {
        column_letter(self.index)
    }

    /// Cell value of this column in `row`, empty when the row is short.
    pub fn read<'a>(&self, row: &'a [String]) -> &'a str {
        row.get(self.index).map(String::as_str).unwrap_or("")
    }
}

pub const TIMESTAMP: Column = Column::new(0, "Timestamp");
pub const EMAIL_ADDRESS: Column = Column::new(1, "Email Address");
pub const DATE_REPORTED: Column = Column::new(2, "Date reported");
pub const REPORTED_BY: Column = Column::new(3, "Reported by");
pub const TYPE_CLASSIFICATION: Column = Column::new(4, "Is it a new feature or bug?");
pub const SEVERITY: Column = Column::new(5, "Urgency / Severity");
pub const SCREENSHOT: Column = Column::new(6, "Screenshot");
pub const BUCKET: Column = Column::new(7, "Bucket");
pub const DESCRIPTION: Column = Column::new(8, "Description");
pub const HOURS_INVESTED: Column = Column::new(9, "Hours invested");
pub const RESOLVED_ON: Column = Column::new(10, "Resolved on");
pub const EST_DEADLINE: Column = Column::new(11, "Est. deadline");
/// Present in the sheet but not read into tasks
pub const PRIORITY: Column = Column::new(12, "Priority");
pub const DEVELOPER: Column = Column::new(13, "Developer");
pub const KANBAN_STATUS: Column = Column::new(14, "Kanban status");
pub const DEV_STATUS: Column = Column::new(15, "Dev status");
/// Written when a task moves to done; never read back
pub const COST: Column = Column::new(16, "Cost");

/// Every column in sheet order
pub const COLUMNS: [Column; 17] = [
    TIMESTAMP,
    EMAIL_ADDRESS,
    DATE_REPORTED,
    REPORTED_BY,
    TYPE_CLASSIFICATION,
    SEVERITY,
    SCREENSHOT,
    BUCKET,
    DESCRIPTION,
    HOURS_INVESTED,
    RESOLVED_ON,
    EST_DEADLINE,
    PRIORITY,
    DEVELOPER,
    KANBAN_STATUS,
    DEV_STATUS,
    COST,
];

/// Number of header rows before data
pub const HEADER_ROWS: usize = 1;

/// Header row written when a workbook is created
pub fn header_row() -> Vec<String> {
    COLUMNS.iter().map(|col| col.header.to_string()).collect()
}

/// 1-based sheet row number for a 0-based data index
pub fn row_number(data_index: usize) -> usize {
    data_index + HEADER_ROWS + 1
}

/// Convert a 0-based column index to its letter form.
pub fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

/// Convert column letters (case-insensitive) back to a 0-based index.
pub fn column_index(letters: &str) -> Option<usize> {
    let letters = letters.trim();
    if letters.is_empty() {
        return None;
    }
    let mut n: usize = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        let value = (ch.to_ascii_uppercase() as u8 - b'A' + 1) as usize;
        n = n.checked_mul(26)?.checked_add(value)?;
    }
    Some(n - 1)
}

/// A single cell address: sheet, column letters and 1-based row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRef {
    pub sheet: String,
    pub column: String,
    pub row: usize,
}

impl CellRef {
    pub fn new(sheet: impl Into<String>, column: Column, row: usize) -> Self {
        Self {
            sheet: sheet.into(),
            column: column.letter(),
            row,
        }
    }

    /// 0-based column index of this reference
    pub fn column_index(&self) -> Option<usize> {
        column_index(&self.column)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sheet.contains(' ') {
            write!(f, "'{}'!{}{}", self.sheet, self.column, self.row)
        } else {
            write!(f, "{}!{}{}", self.sheet, self.column, self.row)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_round_trip_across_boundaries() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(701), "ZZ");
        assert_eq!(column_letter(702), "AAA");
        assert_eq!(column_index("a"), Some(0));
        assert_eq!(column_index("AA"), Some(26));
        assert_eq!(column_index("ZZ"), Some(701));
        assert_eq!(column_index("A1"), None);
        assert_eq!(column_index(""), None);
    }

    #[test]
    fn layout_letters_match_positions() {
        assert_eq!(HOURS_INVESTED.letter(), "J");
        assert_eq!(RESOLVED_ON.letter(), "K");
        assert_eq!(KANBAN_STATUS.letter(), "O");
        assert_eq!(DEV_STATUS.letter(), "P");
        assert_eq!(COST.letter(), "Q");
        for (position, column) in COLUMNS.iter().enumerate() {
            assert_eq!(column.index, position);
        }
    }

    #[test]
    fn short_rows_read_as_empty() {
        let row = vec!["2024-05-01T00:00:00Z".to_string()];
        assert_eq!(TIMESTAMP.read(&row), "2024-05-01T00:00:00Z");
        assert_eq!(DEV_STATUS.read(&row), "");
    }

    #[test]
    fn cell_refs_render_a1_notation() {
        assert_eq!(CellRef::new("Sheet1", HOURS_INVESTED, 2).to_string(), "Sheet1!J2");
        assert_eq!(
            CellRef::new("Form Responses 1", COST, row_number(5)).to_string(),
            "'Form Responses 1'!Q7"
        );
    }
}
