//! Row to [`Task`] normalization.
//!
//! Columns are read by position (see [`crate::columns`]). Missing cells read
//! as empty and fall back to per-field defaults. A row that cannot be derived
//! is logged and dropped; it never aborts the rest of a listing.

use chrono::{Local, NaiveDate};
use thiserror::Error;
use tracing::warn;

use crate::columns;
use crate::dates::{month_name, parse_date};
use crate::task::{
    compute_cost, KanbanStatus, Task, TaskStatus, TaskType, DEADLINE_MET, MAX_HOURS,
};

const DEFAULT_SEVERITY: &str = "Medium";
const DEFAULT_BUCKET: &str = "Other";

/// Inputs that are not part of the row: the reference date and the
/// placeholder developer for unassigned rows.
#[derive(Debug, Clone)]
pub struct NormalizeContext {
    pub today: NaiveDate,
    pub default_developer: String,
}

impl NormalizeContext {
    pub fn new(today: NaiveDate, default_developer: impl Into<String>) -> Self {
        Self {
            today,
            default_developer: default_developer.into(),
        }
    }

    /// Context anchored at the local calendar date.
    pub fn today(default_developer: impl Into<String>) -> Self {
        Self::new(Local::now().date_naive(), default_developer)
    }
}

/// Why a row could not be turned into a task
#[derive(Debug, Error, PartialEq)]
pub enum RowError {
    #[error("hours cell '{0}' is negative")]
    NegativeHours(String),

    #[error("hours cell '{0}' is out of range")]
    HoursOutOfRange(String),
}

/// Normalize one data row; `None` when the row is malformed.
pub fn normalize(row: &[String], data_index: usize, ctx: &NormalizeContext) -> Option<Task> {
    match derive_task(row, data_index, ctx) {
        Ok(task) => Some(task),
        Err(err) => {
            warn!(row = data_index, cells = ?row, %err, "dropping malformed row");
            None
        }
    }
}

/// Derive a task from a row, reporting why it failed instead of logging.
pub fn derive_task(
    row: &[String],
    data_index: usize,
    ctx: &NormalizeContext,
) -> Result<Task, RowError> {
    let timestamp = columns::TIMESTAMP.read(row).to_string();
    let task_type = TaskType::classify(columns::TYPE_CLASSIFICATION.read(row));
    let hours_invested = parse_hours(columns::HOURS_INVESTED.read(row))?;
    let resolved_on = columns::RESOLVED_ON.read(row).to_string();
    let resolved = !resolved_on.trim().is_empty();
    let date_reported = columns::DATE_REPORTED.read(row).to_string();
    let est_deadline = columns::EST_DEADLINE.read(row).to_string();

    let kanban_status = derive_kanban_status(
        columns::KANBAN_STATUS.read(row),
        columns::DEV_STATUS.read(row),
        resolved,
    );
    let days_until_deadline = if resolved || kanban_status == KanbanStatus::Done {
        Some(DEADLINE_MET)
    } else {
        parse_date(&est_deadline).map(|deadline| (deadline - ctx.today).num_days())
    };
    let month = derive_month(&date_reported, ctx.today);

    Ok(Task {
        id: format!("{timestamp}-{data_index}"),
        timestamp,
        email_address: columns::EMAIL_ADDRESS.read(row).to_string(),
        date_reported,
        reported_by: columns::REPORTED_BY.read(row).to_string(),
        task_type,
        severity: or_default(columns::SEVERITY.read(row), DEFAULT_SEVERITY),
        screenshot: columns::SCREENSHOT.read(row).to_string(),
        bucket: or_default(columns::BUCKET.read(row), DEFAULT_BUCKET),
        description: columns::DESCRIPTION.read(row).to_string(),
        month,
        developer: or_default(columns::DEVELOPER.read(row), &ctx.default_developer),
        hours_invested,
        status: TaskStatus::from_resolved_on(&resolved_on),
        resolved_on,
        est_deadline,
        days_until_deadline,
        cost: compute_cost(task_type, hours_invested),
        kanban_status,
    })
}

/// Kanban column for a row.
///
/// A resolved row is always done. Otherwise an in-progress/review value in the
/// board cell beats the same in the dev cell, then `done` in either cell, then
/// `todo`.
pub fn derive_kanban_status(board_cell: &str, dev_cell: &str, resolved: bool) -> KanbanStatus {
    if resolved {
        return KanbanStatus::Done;
    }

    let board = KanbanStatus::from_cell(board_cell);
    let dev = KanbanStatus::from_cell(dev_cell);

    if let Some(active) = [board, dev]
        .into_iter()
        .flatten()
        .find(|status| matches!(status, KanbanStatus::InProgress | KanbanStatus::Review))
    {
        return active;
    }

    if board == Some(KanbanStatus::Done) || dev == Some(KanbanStatus::Done) {
        return KanbanStatus::Done;
    }

    KanbanStatus::Todo
}

/// Long month name of the reported date; the current month when unparseable.
pub fn derive_month(date_reported: &str, today: NaiveDate) -> String {
    let date = parse_date(date_reported).unwrap_or(today);
    month_name(date).to_string()
}

/// Hours from a cell. Unparseable text counts as zero; a leading number is
/// accepted the way spreadsheet users type it (`"3 hrs"`).
pub fn parse_hours(raw: &str) -> Result<f64, RowError> {
    let trimmed = raw.trim();
    let hours = trimmed
        .parse::<f64>()
        .ok()
        .or_else(|| leading_number(trimmed))
        .filter(|value| value.is_finite())
        .unwrap_or(0.0);

    if hours < 0.0 {
        return Err(RowError::NegativeHours(raw.to_string()));
    }
    if hours > MAX_HOURS {
        return Err(RowError::HoursOutOfRange(raw.to_string()));
    }
    Ok(hours)
}

/// Longest `-?digits[.digits]` prefix; a second `.` ends the number.
fn leading_number(raw: &str) -> Option<f64> {
    let mut seen_dot = false;
    let mut end = 0;
    for (idx, ch) in raw.char_indices() {
        let accept = match ch {
            '0'..='9' => true,
            '-' => idx == 0,
            '.' if !seen_dot => {
                seen_dot = true;
                true
            }
            _ => false,
        };
        if !accept {
            break;
        }
        end = idx + ch.len_utf8();
    }
    raw[..end].parse::<f64>().ok()
}

fn or_default(raw: &str, default: &str) -> String {
    if raw.trim().is_empty() {
        default.to_string()
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> NormalizeContext {
        NormalizeContext::new(NaiveDate::from_ymd_opt(2024, 5, 3).unwrap(), "unassigned")
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|cell| cell.to_string()).collect()
    }

    fn login_bug() -> Vec<String> {
        row(&[
            "2024-05-01T00:00:00Z",
            "a@x.com",
            "5/1/2024",
            "Alice",
            "bug report",
            "High",
            "",
            "Frontend",
            "Login broken",
            "3",
            "",
            "5/10/2024",
            "",
            "Bob",
            "",
            "",
        ])
    }

    #[test]
    fn login_bug_scenario() {
        let task = normalize(&login_bug(), 0, &ctx()).unwrap();
        assert_eq!(task.id, "2024-05-01T00:00:00Z-0");
        assert_eq!(task.task_type, TaskType::Bug);
        assert_eq!(task.severity, "High");
        assert_eq!(task.hours_invested, 3.0);
        assert_eq!(task.resolved_on, "");
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.kanban_status, KanbanStatus::Todo);
        assert_eq!(task.cost, 600);
        assert_eq!(task.month, "May");
        assert_eq!(task.developer, "Bob");
        assert_eq!(task.days_until_deadline, Some(7));
    }

    #[test]
    fn resolved_row_is_done_with_met_deadline() {
        let mut cells = login_bug();
        cells[10] = "5/5/2024".to_string();
        let task = normalize(&cells, 0, &ctx()).unwrap();
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.kanban_status, KanbanStatus::Done);
        assert_eq!(task.days_until_deadline, Some(DEADLINE_MET));
    }

    #[test]
    fn resolved_wins_over_active_board_cell() {
        let mut cells = login_bug();
        cells[10] = "5/5/2024".to_string();
        cells[14] = "review".to_string();
        let task = normalize(&cells, 0, &ctx()).unwrap();
        assert_eq!(task.kanban_status, KanbanStatus::Done);
    }

    #[test]
    fn feature_cost_uses_feature_rate() {
        let mut cells = login_bug();
        cells[4] = "New Feature".to_string();
        cells[9] = "2".to_string();
        let task = normalize(&cells, 0, &ctx()).unwrap();
        assert_eq!(task.task_type, TaskType::Feature);
        assert_eq!(task.cost, 600);
    }

    #[test]
    fn stored_cost_cell_is_ignored() {
        let mut cells = login_bug();
        cells.push("9999".to_string());
        let task = normalize(&cells, 0, &ctx()).unwrap();
        assert_eq!(task.cost, 600);
    }

    #[test]
    fn blank_report_date_falls_back_to_current_month() {
        let mut cells = login_bug();
        cells[2] = String::new();
        let task = normalize(&cells, 0, &ctx()).unwrap();
        assert_eq!(task.month, "May");

        let december = NormalizeContext::new(NaiveDate::from_ymd_opt(2023, 12, 1).unwrap(), "x");
        assert_eq!(normalize(&cells, 0, &december).unwrap().month, "December");
    }

    #[test]
    fn invalid_deadline_leaves_day_count_absent() {
        let mut cells = login_bug();
        cells[11] = "2024-13-40".to_string();
        let task = normalize(&cells, 0, &ctx()).unwrap();
        assert_eq!(task.days_until_deadline, None);
        assert_eq!(task.est_deadline, "2024-13-40");
    }

    #[test]
    fn short_row_gets_defaults() {
        let task = normalize(&row(&["ts"]), 4, &ctx()).unwrap();
        assert_eq!(task.id, "ts-4");
        assert_eq!(task.severity, "Medium");
        assert_eq!(task.bucket, "Other");
        assert_eq!(task.developer, "unassigned");
        assert_eq!(task.task_type, TaskType::Feature);
        assert_eq!(task.hours_invested, 0.0);
        assert_eq!(task.cost, 0);
        assert_eq!(task.kanban_status, KanbanStatus::Todo);
        assert_eq!(task.days_until_deadline, None);
    }

    #[test]
    fn negative_hours_drop_the_row() {
        let mut cells = login_bug();
        cells[9] = "-4".to_string();
        assert_eq!(
            derive_task(&cells, 0, &ctx()),
            Err(RowError::NegativeHours("-4".to_string()))
        );
        assert!(normalize(&cells, 0, &ctx()).is_none());
    }

    #[test]
    fn hours_parsing_is_lenient() {
        assert_eq!(parse_hours(""), Ok(0.0));
        assert_eq!(parse_hours("abc"), Ok(0.0));
        assert_eq!(parse_hours("2.5"), Ok(2.5));
        assert_eq!(parse_hours(" 3 hrs"), Ok(3.0));
        assert_eq!(parse_hours("NaN"), Ok(0.0));
        assert_eq!(parse_hours("inf"), Ok(0.0));
        assert_eq!(parse_hours("3.5.2 hrs"), Ok(3.5));
        assert_eq!(parse_hours("1.2.3"), Ok(1.2));
        assert_eq!(parse_hours("-1.5h"), Err(RowError::NegativeHours("-1.5h".to_string())));
    }

    #[test]
    fn huge_hours_drop_the_row() {
        let mut cells = login_bug();
        cells[9] = "1e300".to_string();
        assert_eq!(
            derive_task(&cells, 0, &ctx()),
            Err(RowError::HoursOutOfRange("1e300".to_string()))
        );
        assert!(normalize(&cells, 0, &ctx()).is_none());
        assert_eq!(parse_hours("1000000"), Ok(MAX_HOURS));
    }

    #[test]
    fn kanban_precedence() {
        use KanbanStatus::*;
        assert_eq!(derive_kanban_status("in-progress", "review", false), InProgress);
        assert_eq!(derive_kanban_status("done", "review", false), Review);
        assert_eq!(derive_kanban_status("", "in-progress", false), InProgress);
        assert_eq!(derive_kanban_status("todo", "done", false), Done);
        assert_eq!(derive_kanban_status("pending", "completed", false), Todo);
        assert_eq!(derive_kanban_status("", "", true), Done);
    }

    #[test]
    fn done_board_cell_forces_deadline_sentinel() {
        let mut cells = login_bug();
        cells[14] = "done".to_string();
        let task = normalize(&cells, 0, &ctx()).unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.days_until_deadline, Some(DEADLINE_MET));
    }

    #[test]
    fn normalization_does_not_touch_input() {
        let cells = login_bug();
        let before = cells.clone();
        let first = normalize(&cells, 2, &ctx());
        let second = normalize(&cells, 2, &ctx());
        assert_eq!(cells, before);
        assert_eq!(first, second);
    }
}
