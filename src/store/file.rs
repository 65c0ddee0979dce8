//! JSON workbook on the local filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::{Row, RowStore, Workbook};
use crate::columns::CellRef;
use crate::error::{Error, Result};
use crate::lock::{self, FileLock, DEFAULT_LOCK_TIMEOUT_MS};

/// Workbook stored as pretty-printed JSON at `path`.
///
/// Every mutation locks `<path>.lock`, re-reads the file, applies the change
/// and replaces the file atomically. Single cell writes from concurrent
/// processes therefore never lose each other, but nothing here spans more
/// than one call.
#[derive(Debug, Clone)]
pub struct FileSheet {
    path: PathBuf,
    lock_timeout_ms: u64,
}

impl FileSheet {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
        }
    }

    pub fn with_lock_timeout(mut self, timeout_ms: u64) -> Self {
        self.lock_timeout_ms = timeout_ms;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Write a new workbook. Fails if one exists unless `overwrite` is set.
    pub fn create(&self, workbook: &Workbook, overwrite: bool) -> Result<()> {
        let _lock = FileLock::acquire(lock::lock_path_for(&self.path), self.lock_timeout_ms)?;
        if self.path.exists() && !overwrite {
            return Err(Error::InvalidArgument(format!(
                "workbook already exists: {}",
                self.path.display()
            )));
        }
        self.write_workbook(workbook)
    }

    /// Read the workbook without locking.
    pub fn read_workbook(&self) -> Result<Workbook> {
        if !self.path.exists() {
            return Err(Error::Store(format!(
                "workbook not found: {} (run `tasksheet init`)",
                self.path.display()
            )));
        }
        let content = fs::read_to_string(&self.path)?;
        let workbook: Workbook = serde_json::from_str(&content)?;
        Ok(workbook)
    }

    fn write_workbook(&self, workbook: &Workbook) -> Result<()> {
        let json = serde_json::to_string_pretty(workbook)?;
        lock::write_atomic(&self.path, json.as_bytes())
    }

    fn update_workbook<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Workbook) -> Result<T>,
    {
        let _lock = FileLock::acquire(lock::lock_path_for(&self.path), self.lock_timeout_ms)?;
        let mut workbook = self.read_workbook()?;
        let result = f(&mut workbook)?;
        self.write_workbook(&workbook)?;
        Ok(result)
    }

    async fn blocking<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(FileSheet) -> Result<T> + Send + 'static,
    {
        let sheet = self.clone();
        tokio::task::spawn_blocking(move || f(sheet))
            .await
            .map_err(|err| Error::Store(format!("workbook task failed: {err}")))?
    }
}

#[async_trait]
impl RowStore for FileSheet {
    async fn sheet_titles(&self) -> Result<Vec<String>> {
        self.blocking(|sheet| Ok(sheet.read_workbook()?.titles()))
            .await
    }

    async fn fetch_rows(&self, sheet_name: &str) -> Result<Vec<Row>> {
        let sheet_name = sheet_name.to_string();
        let rows = self
            .blocking(move |sheet| Ok(sheet.read_workbook()?.sheet(&sheet_name)?.rows.clone()))
            .await?;
        debug!(path = %self.path.display(), rows = rows.len(), "fetched rows");
        Ok(rows)
    }

    async fn append_row(&self, sheet_name: &str, values: Row) -> Result<()> {
        let sheet_name = sheet_name.to_string();
        self.blocking(move |sheet| {
            sheet.update_workbook(|workbook| workbook.append_row(&sheet_name, values))
        })
        .await?;
        debug!(path = %self.path.display(), "appended row");
        Ok(())
    }

    async fn write_cell(&self, cell: &CellRef, value: &str) -> Result<()> {
        let target = cell.clone();
        let value = value.to_string();
        self.blocking(move |sheet| {
            sheet.update_workbook(|workbook| workbook.write_cell(&target, &value))
        })
        .await?;
        debug!(path = %self.path.display(), %cell, "wrote cell");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::{header_row, KANBAN_STATUS};
    use tempfile::TempDir;

    fn seeded(dir: &TempDir) -> FileSheet {
        let sheet = FileSheet::open(dir.path().join("tasks.sheet.json"));
        sheet
            .create(&Workbook::single("Responses", vec![header_row()]), false)
            .unwrap();
        sheet
    }

    #[tokio::test]
    async fn append_and_write_persist_to_disk() {
        let dir = TempDir::new().unwrap();
        let sheet = seeded(&dir);

        sheet
            .append_row("Responses", vec!["ts".to_string(), "a@x.com".to_string()])
            .await
            .unwrap();
        sheet
            .write_cell(&CellRef::new("Responses", KANBAN_STATUS, 2), "review")
            .await
            .unwrap();

        let reopened = FileSheet::open(sheet.path());
        assert_eq!(reopened.sheet_titles().await.unwrap(), vec!["Responses"]);
        let rows = reopened.fetch_rows("Responses").await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][0], "ts");
        assert_eq!(rows[1][14], "review");
    }

    #[test]
    fn create_refuses_to_clobber() {
        let dir = TempDir::new().unwrap();
        let sheet = seeded(&dir);
        let again = sheet.create(&Workbook::default(), false);
        assert!(matches!(again, Err(Error::InvalidArgument(_))));
        assert!(sheet.create(&Workbook::default(), true).is_ok());
    }

    #[tokio::test]
    async fn missing_workbook_is_a_store_error() {
        let dir = TempDir::new().unwrap();
        let sheet = FileSheet::open(dir.path().join("absent.json"));
        let err = sheet.fetch_rows("Sheet1").await.unwrap_err();
        assert!(matches!(err, Error::Store(_)));
    }

    #[tokio::test]
    async fn held_lock_times_out_writes() {
        let dir = TempDir::new().unwrap();
        let sheet = seeded(&dir).with_lock_timeout(50);
        let _held = FileLock::acquire(lock::lock_path_for(sheet.path()), 1000).unwrap();

        let err = sheet
            .append_row("Responses", vec!["ts".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::LockFailed(_)));
    }
}
