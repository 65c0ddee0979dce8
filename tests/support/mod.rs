#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tasksheet::store::{Row, Workbook};
use tempfile::TempDir;

pub const SHEET_FILE: &str = "tasks.sheet.json";

/// Scratch directory holding a workbook and config
pub struct TestSheet {
    dir: TempDir,
}

impl TestSheet {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    /// Workbook with one sheet holding `rows` (header first)
    pub fn with_rows(title: &str, rows: Vec<Row>) -> Self {
        let sheet = Self::new();
        sheet.write_workbook(&Workbook::single(title, rows));
        sheet
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn sheet_path(&self) -> PathBuf {
        self.dir.path().join(SHEET_FILE)
    }

    pub fn write_file(&self, rel_path: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(rel_path);
        fs::write(&path, contents).expect("write file");
        path
    }

    pub fn write_config(&self, contents: &str) -> PathBuf {
        self.write_file(".tasksheet.toml", contents)
    }

    pub fn write_workbook(&self, workbook: &Workbook) {
        let json = serde_json::to_string_pretty(workbook).expect("serialize workbook");
        fs::write(self.sheet_path(), json).expect("write workbook");
    }

    pub fn read_workbook(&self) -> Workbook {
        let content = fs::read_to_string(self.sheet_path()).expect("read workbook");
        serde_json::from_str(&content).expect("parse workbook")
    }

    pub fn rows(&self, title: &str) -> Vec<Row> {
        self.read_workbook()
            .sheet(title)
            .expect("sheet")
            .rows
            .clone()
    }

    /// Command running in this directory with a clean environment
    pub fn cmd(&self) -> Command {
        let mut cmd = tasksheet_cmd();
        cmd.current_dir(self.path());
        cmd
    }
}

pub fn tasksheet_cmd() -> Command {
    let mut cmd = Command::cargo_bin("tasksheet").expect("binary");
    cmd.env_remove("TASKSHEET_SHEET").env_remove("RUST_LOG");
    cmd
}

pub fn row(cells: &[&str]) -> Row {
    cells.iter().map(|cell| cell.to_string()).collect()
}

pub fn json_stdout(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is json")
}
