//! tasksheet init command implementation
//!
//! Creates the workbook with its header row, and a default config file when
//! none exists yet.

use std::path::{Path, PathBuf};

use super::Session;
use crate::columns::header_row;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput};
use crate::sample::{sample_workbook, SAMPLE_SHEET_NAME};
use crate::store::{FileSheet, Workbook, FALLBACK_SHEET_NAME};

pub struct InitOptions {
    pub sample: bool,
    pub force: bool,
}

#[derive(serde::Serialize)]
struct InitReport {
    sheet_path: PathBuf,
    sheet_name: String,
    tasks: usize,
    created: InitCreated,
}

#[derive(serde::Serialize)]
struct InitCreated {
    workbook: bool,
    config: bool,
}

pub fn run(session: &Session, options: InitOptions) -> Result<()> {
    let (workbook, sheet_name) = if options.sample {
        (sample_workbook(), SAMPLE_SHEET_NAME)
    } else {
        (
            Workbook::single(FALLBACK_SHEET_NAME, vec![header_row()]),
            FALLBACK_SHEET_NAME,
        )
    };
    let tasks = workbook
        .sheet(sheet_name)
        .map(|sheet| sheet.rows.len().saturating_sub(1))
        .unwrap_or_default();

    let store = FileSheet::open(&session.sheet_path);
    let replaced = store.exists();
    store.create(&workbook, options.force)?;
    let created_config = ensure_config(session)?;

    let report = InitReport {
        sheet_path: session.sheet_path.clone(),
        sheet_name: sheet_name.to_string(),
        tasks,
        created: InitCreated {
            workbook: true,
            config: created_config,
        },
    };

    let header = if replaced {
        "tasksheet init: replaced workbook"
    } else {
        "tasksheet init: created workbook"
    };
    let mut human = HumanOutput::new(header);
    human.push_summary("workbook", session.sheet_path.display().to_string());
    human.push_summary("sheet", sheet_name);
    human.push_summary("tasks", tasks.to_string());
    if created_config {
        human.push_summary("config", session.config_path.display().to_string());
    }
    human.push_next_step("tasksheet list");
    if !options.sample {
        human.push_next_step("tasksheet add --description ... --type bug --month ... --developer ...");
    }

    emit_success(session.output, "init", &report, Some(&human))
}

/// Write a default config pointing at the workbook, unless one exists.
fn ensure_config(session: &Session) -> Result<bool> {
    let path: &Path = &session.config_path;
    if path.exists() {
        if !path.is_file() {
            return Err(Error::InvalidConfig(format!(
                "config exists but is not a file: {}",
                path.display()
            )));
        }
        return Ok(false);
    }

    let mut config = session.config.clone();
    config.sheet.path = session.sheet_path.clone();
    config.save(path)?;
    Ok(true)
}
