//! In-memory workbook.
//!
//! Backs tests and dry runs. Individual operations can be made to fail or
//! stall so callers can exercise error propagation and timeouts.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use super::{Row, RowStore, Workbook};
use crate::columns::CellRef;
use crate::error::{Error, Result};

/// Store operation selector for failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Titles,
    Fetch,
    Append,
    Write,
}

#[derive(Debug, Default)]
struct Faults {
    failing: HashSet<StoreOp>,
    /// Cell writes allowed before every further write fails
    write_budget: Option<usize>,
    stall: Option<(StoreOp, Duration)>,
}

#[derive(Debug, Default)]
pub struct MemorySheet {
    workbook: Mutex<Workbook>,
    faults: Mutex<Faults>,
    writes: Mutex<Vec<(String, String)>>,
    title_lookups: AtomicUsize,
}

impl MemorySheet {
    pub fn new(workbook: Workbook) -> Self {
        Self {
            workbook: Mutex::new(workbook),
            ..Self::default()
        }
    }

    /// Single sheet named `title` holding `rows` (header first).
    pub fn with_rows(title: &str, rows: Vec<Row>) -> Self {
        Self::new(Workbook::single(title, rows))
    }

    /// Workbook seeded with the sample task sheet
    pub fn with_sample() -> Self {
        Self::new(crate::sample::sample_workbook())
    }

    pub fn fail(&self, op: StoreOp) {
        self.faults().failing.insert(op);
    }

    /// Let `n` cell writes succeed, then fail the rest.
    pub fn fail_writes_after(&self, n: usize) {
        self.faults().write_budget = Some(n);
    }

    /// Delay `op` by `duration` before it runs.
    pub fn stall(&self, op: StoreOp, duration: Duration) {
        self.faults().stall = Some((op, duration));
    }

    /// Copy of the rows currently in `title`
    pub fn rows(&self, title: &str) -> Vec<Row> {
        self.book()
            .sheet(title)
            .map(|sheet| sheet.rows.clone())
            .unwrap_or_default()
    }

    /// Successful cell writes so far, as (A1 reference, value)
    pub fn writes(&self) -> Vec<(String, String)> {
        self.writes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// How many times the sheet titles were requested
    pub fn title_lookups(&self) -> usize {
        self.title_lookups.load(Ordering::SeqCst)
    }

    /// Insert a row at 1-based `row_number`, shifting later rows down.
    pub fn insert_row(&self, title: &str, row_number: usize, values: Row) -> Result<()> {
        let mut book = self.book();
        let sheet = book
            .sheets
            .iter_mut()
            .find(|sheet| sheet.title == title)
            .ok_or_else(|| Error::SheetNotFound(title.to_string()))?;
        let index = row_number.saturating_sub(1).min(sheet.rows.len());
        sheet.rows.insert(index, values);
        Ok(())
    }

    fn book(&self) -> MutexGuard<'_, Workbook> {
        self.workbook
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn faults(&self) -> MutexGuard<'_, Faults> {
        self.faults
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn enter(&self, op: StoreOp) -> Result<()> {
        let stall = self
            .faults()
            .stall
            .filter(|(stalled, _)| *stalled == op)
            .map(|(_, duration)| duration);
        if let Some(duration) = stall {
            tokio::time::sleep(duration).await;
        }

        let mut faults = self.faults();
        if faults.failing.contains(&op) {
            return Err(Error::Store(format!("injected {op:?} failure")));
        }
        if op == StoreOp::Write {
            if let Some(budget) = faults.write_budget.as_mut() {
                if *budget == 0 {
                    return Err(Error::Store("injected write failure".to_string()));
                }
                *budget -= 1;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl RowStore for MemorySheet {
    async fn sheet_titles(&self) -> Result<Vec<String>> {
        self.title_lookups.fetch_add(1, Ordering::SeqCst);
        self.enter(StoreOp::Titles).await?;
        Ok(self.book().titles())
    }

    async fn fetch_rows(&self, sheet: &str) -> Result<Vec<Row>> {
        self.enter(StoreOp::Fetch).await?;
        Ok(self.book().sheet(sheet)?.rows.clone())
    }

    async fn append_row(&self, sheet: &str, values: Row) -> Result<()> {
        self.enter(StoreOp::Append).await?;
        self.book().append_row(sheet, values)
    }

    async fn write_cell(&self, cell: &CellRef, value: &str) -> Result<()> {
        self.enter(StoreOp::Write).await?;
        self.book().write_cell(cell, value)?;
        self.writes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((cell.to_string(), value.to_string()));
        Ok(())
    }
}
