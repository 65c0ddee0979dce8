//! Task repository over a [`RowStore`].
//!
//! Tasks are addressed by their derived id, which encodes the row position at
//! read time. Every mutation therefore runs a two-phase protocol: list the
//! tasks to find the row, then write the target cells. Nothing prevents the
//! sheet from changing between the two phases; a concurrent insert above the
//! located row makes the write land on the wrong row. Multi-cell updates are
//! not atomic either: a failed cell write is reported, earlier cells stay
//! written.

use std::future::Future;
use std::time::Duration;

use chrono::{Local, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::columns::{self, CellRef, Column, COLUMNS};
use crate::config::Config;
use crate::dates::format_sheet_date;
use crate::error::{Error, Result};
use crate::normalize::{normalize, NormalizeContext};
use crate::store::{RowStore, FALLBACK_SHEET_NAME};
use crate::task::{compute_cost, KanbanStatus, Task, TaskStatus, TaskType, MAX_HOURS};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
const DEFAULT_REPORTER: &str = "Anonymous";
const DEFAULT_SEVERITY: &str = "Medium";
const DEFAULT_BUCKET: &str = "Other";

/// Input for [`TaskRepository::add_task`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewTask {
    pub description: String,
    #[serde(rename = "type")]
    pub task_type: Option<TaskType>,
    pub month: String,
    pub developer: String,
    pub email_address: String,
    /// Defaults to today
    pub date_reported: Option<String>,
    pub reported_by: Option<String>,
    pub severity: Option<String>,
    pub screenshot: Option<String>,
    pub bucket: Option<String>,
    pub hours_invested: f64,
    pub est_deadline: Option<String>,
    pub priority: Option<String>,
    pub kanban_status: Option<KanbanStatus>,
}

impl NewTask {
    /// Names of required fields that are blank or missing
    pub fn missing_fields(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if self.description.trim().is_empty() {
            missing.push("description".to_string());
        }
        if self.task_type.is_none() {
            missing.push("type".to_string());
        }
        if self.month.trim().is_empty() {
            missing.push("month".to_string());
        }
        if self.developer.trim().is_empty() {
            missing.push("developer".to_string());
        }
        missing
    }
}

pub struct TaskRepository<S> {
    store: S,
    timeout: Duration,
    explicit_sheet: Option<String>,
    default_developer: String,
    sheet_name: OnceCell<String>,
}

impl<S: RowStore> TaskRepository<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            timeout: DEFAULT_TIMEOUT,
            explicit_sheet: None,
            default_developer: crate::config::TasksConfig::default().default_developer,
            sheet_name: OnceCell::new(),
        }
    }

    pub fn from_config(store: S, config: &Config) -> Self {
        let mut repo = Self::new(store)
            .with_timeout(config.sheet.timeout())
            .with_default_developer(config.tasks.default_developer.clone());
        if let Some(name) = config.sheet.explicit_name() {
            repo = repo.with_sheet_name(name);
        }
        repo
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Skip sheet discovery and always use `name`.
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.explicit_sheet = Some(name.into());
        self
    }

    pub fn with_default_developer(mut self, developer: impl Into<String>) -> Self {
        self.default_developer = developer.into();
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Normalization context anchored at today's local date
    pub fn context(&self) -> NormalizeContext {
        NormalizeContext::today(self.default_developer.clone())
    }

    /// Name of the sheet holding tasks, resolved once per repository.
    ///
    /// Uses the configured name if any, else the first sheet of the workbook,
    /// else `Sheet1` when the workbook has no sheets or cannot be asked.
    pub async fn sheet_name(&self) -> &str {
        self.sheet_name
            .get_or_init(|| async {
                if let Some(name) = &self.explicit_sheet {
                    return name.clone();
                }
                match self.call("sheet lookup", self.store.sheet_titles()).await {
                    Ok(titles) => match titles.into_iter().next() {
                        Some(title) => {
                            debug!(sheet = %title, "resolved sheet name");
                            title
                        }
                        None => {
                            warn!("workbook has no sheets, using {FALLBACK_SHEET_NAME}");
                            FALLBACK_SHEET_NAME.to_string()
                        }
                    },
                    Err(err) => {
                        warn!(%err, "sheet lookup failed, using {FALLBACK_SHEET_NAME}");
                        FALLBACK_SHEET_NAME.to_string()
                    }
                }
            })
            .await
    }

    /// All tasks in row order. Store failures propagate.
    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        self.list_tasks_with(&self.context()).await
    }

    /// [`list_tasks`](Self::list_tasks) with an explicit normalization context.
    pub async fn list_tasks_with(&self, ctx: &NormalizeContext) -> Result<Vec<Task>> {
        let indexed = self.indexed_tasks(ctx).await?;
        Ok(indexed.into_iter().map(|(_, task)| task).collect())
    }

    /// Normalized tasks paired with their data index in the sheet.
    ///
    /// Dropped rows leave gaps in the indices, so the index and not the
    /// position in the returned list maps to a row number.
    async fn indexed_tasks(&self, ctx: &NormalizeContext) -> Result<Vec<(usize, Task)>> {
        let sheet = self.sheet_name().await;
        let rows = self.call("fetch rows", self.store.fetch_rows(sheet)).await?;

        let Some((header, data)) = rows.split_first() else {
            debug!(sheet, "sheet is empty");
            return Ok(Vec::new());
        };
        debug!(sheet, header = ?header, rows = data.len(), "read sheet");

        let tasks: Vec<(usize, Task)> = data
            .iter()
            .enumerate()
            .filter_map(|(index, row)| normalize(row, index, ctx).map(|task| (index, task)))
            .collect();
        if tasks.len() < data.len() {
            warn!(
                sheet,
                dropped = data.len() - tasks.len(),
                "some rows could not be normalized"
            );
        }
        Ok(tasks)
    }

    /// Tasks whose developer matches exactly
    pub async fn tasks_by_developer(&self, developer: &str) -> Result<Vec<Task>> {
        let tasks = self.list_tasks().await?;
        Ok(tasks
            .into_iter()
            .filter(|task| task.developer == developer)
            .collect())
    }

    /// Append a new task row. Validation failures reject before any write.
    pub async fn add_task(&self, input: NewTask) -> Result<bool> {
        let missing = input.missing_fields();
        if !missing.is_empty() {
            return Err(Error::Validation(missing));
        }
        validate_hours(input.hours_invested)?;

        let row = build_row(&input, &self.default_developer);
        let sheet = self.sheet_name().await;
        self.call("append row", self.store.append_row(sheet, row))
            .await?;

        info!(
            sheet,
            developer = %input.developer,
            month = %input.month,
            "added task"
        );
        Ok(true)
    }

    /// Set the hours of one task. `Ok(false)` when the id is unknown.
    pub async fn update_hours(&self, id: &str, hours: f64) -> Result<bool> {
        validate_hours(hours)?;

        let Some((row, _task)) = self.locate(id).await? else {
            debug!(id, "update hours: task not found");
            return Ok(false);
        };

        let sheet = self.sheet_name().await;
        let cell = CellRef::new(sheet, columns::HOURS_INVESTED, row);
        self.call("write cell", self.store.write_cell(&cell, &format_hours(hours)))
            .await?;

        info!(id, %cell, hours, "updated hours");
        Ok(true)
    }

    /// Move one task to a kanban column. `Ok(false)` when the id is unknown.
    ///
    /// Moving to done also stamps the resolved date, marks the row completed
    /// and writes the cost; moving away from done clears the resolved date and
    /// marks the row pending again.
    pub async fn update_kanban_status(&self, id: &str, status: KanbanStatus) -> Result<bool> {
        let Some((row, task)) = self.locate(id).await? else {
            debug!(id, "update status: task not found");
            return Ok(false);
        };

        let mut cells: Vec<(Column, String)> =
            vec![(columns::KANBAN_STATUS, status.as_str().to_string())];
        if status == KanbanStatus::Done {
            let cost = compute_cost(task.task_type, task.hours_invested);
            cells.push((columns::RESOLVED_ON, format_sheet_date(Local::now().date_naive())));
            cells.push((columns::DEV_STATUS, TaskStatus::Completed.as_str().to_string()));
            cells.push((columns::COST, cost.to_string()));
        } else {
            cells.push((columns::RESOLVED_ON, String::new()));
            cells.push((columns::DEV_STATUS, TaskStatus::Pending.as_str().to_string()));
        }

        let sheet = self.sheet_name().await;
        let mut written: Vec<String> = Vec::with_capacity(cells.len());
        for (column, value) in &cells {
            let cell = CellRef::new(sheet, *column, row);
            if let Err(err) = self.call("write cell", self.store.write_cell(&cell, value)).await {
                if !written.is_empty() {
                    warn!(id, %cell, written = ?written, "status update partially applied");
                }
                return Err(err);
            }
            written.push(cell.to_string());
        }

        info!(id, status = %status, row, "updated kanban status");
        Ok(true)
    }

    /// Row number and current snapshot of the task with `id`.
    async fn locate(&self, id: &str) -> Result<Option<(usize, Task)>> {
        let tasks = self.indexed_tasks(&self.context()).await?;
        Ok(tasks
            .into_iter()
            .find(|(_, task)| task.id == id)
            .map(|(index, task)| (columns::row_number(index), task)))
    }

    async fn call<T, F>(&self, operation: &'static str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout {
                operation,
                after: self.timeout,
            }),
        }
    }
}

fn validate_hours(hours: f64) -> Result<()> {
    if !hours.is_finite() || hours < 0.0 {
        return Err(Error::InvalidArgument(format!(
            "hours must be a non-negative number, got {hours}"
        )));
    }
    if hours > MAX_HOURS {
        return Err(Error::InvalidArgument(format!(
            "hours must be at most {MAX_HOURS}, got {hours}"
        )));
    }
    Ok(())
}

fn format_hours(hours: f64) -> String {
    format!("{hours}")
}

/// Full sheet row for a new task, in column order.
fn build_row(input: &NewTask, default_developer: &str) -> Vec<String> {
    let today = Local::now().date_naive();
    let task_type = input.task_type.unwrap_or(TaskType::Feature);
    let kanban = input.kanban_status.unwrap_or(KanbanStatus::Todo);
    let done = kanban == KanbanStatus::Done;

    let pick = |value: &Option<String>, default: &str| -> String {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
            .to_string()
    };
    let developer = if input.developer.trim().is_empty() {
        default_developer.to_string()
    } else {
        input.developer.trim().to_string()
    };

    let mut row = vec![String::new(); COLUMNS.len()];
    let mut set = |column: Column, value: String| row[column.index] = value;
    set(
        columns::TIMESTAMP,
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    );
    set(columns::EMAIL_ADDRESS, input.email_address.trim().to_string());
    set(
        columns::DATE_REPORTED,
        pick(&input.date_reported, &format_sheet_date(today)),
    );
    set(columns::REPORTED_BY, pick(&input.reported_by, DEFAULT_REPORTER));
    set(columns::TYPE_CLASSIFICATION, task_type.as_str().to_string());
    set(columns::SEVERITY, pick(&input.severity, DEFAULT_SEVERITY));
    set(columns::SCREENSHOT, pick(&input.screenshot, ""));
    set(columns::BUCKET, pick(&input.bucket, DEFAULT_BUCKET));
    set(columns::DESCRIPTION, input.description.trim().to_string());
    set(columns::HOURS_INVESTED, format_hours(input.hours_invested));
    set(
        columns::RESOLVED_ON,
        if done { format_sheet_date(today) } else { String::new() },
    );
    set(columns::EST_DEADLINE, pick(&input.est_deadline, ""));
    set(columns::PRIORITY, pick(&input.priority, ""));
    set(columns::DEVELOPER, developer);
    set(columns::KANBAN_STATUS, kanban.as_str().to_string());
    set(
        columns::DEV_STATUS,
        if done {
            TaskStatus::Completed.as_str().to_string()
        } else {
            TaskStatus::Pending.as_str().to_string()
        },
    );
    set(
        columns::COST,
        compute_cost(task_type, input.hours_invested).to_string(),
    );
    row
}
