//! The normalized task model.
//!
//! A [`Task`] is never stored as one unit. It is rebuilt from a sheet row on
//! every read, and the derived fields (`cost`, `status`, `kanban_status`,
//! `days_until_deadline`) are recomputed each time from the raw cells.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Day count reported once a task is resolved or done, regardless of deadline.
pub const DEADLINE_MET: i64 = 100;

/// Largest hours value accepted from a cell or a command.
pub const MAX_HOURS: f64 = 1_000_000.0;

/// Bug or feature, inferred from the free-text classification cell.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Bug,
    Feature,
}

impl TaskType {
    /// Substring match, case-insensitive; anything unrecognised is a feature.
    pub fn classify(raw: &str) -> Self {
        let lowered = raw.to_lowercase();
        if lowered.contains("bug") {
            TaskType::Bug
        } else {
            TaskType::Feature
        }
    }

    /// Billing rate per hour for this kind of work.
    pub fn hourly_rate(self) -> f64 {
        match self {
            TaskType::Bug => 200.0,
            TaskType::Feature => 300.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskType::Bug => "bug",
            TaskType::Feature => "feature",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bug" => Ok(TaskType::Bug),
            "feature" => Ok(TaskType::Feature),
            other => Err(Error::InvalidArgument(format!(
                "invalid task type '{other}' (expected bug|feature)"
            ))),
        }
    }
}

/// Billing status, implied entirely by the resolved-on cell.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl TaskStatus {
    pub fn from_resolved_on(resolved_on: &str) -> Self {
        if resolved_on.trim().is_empty() {
            TaskStatus::Pending
        } else {
            TaskStatus::Completed
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
        }
    }
}

/// Workflow column on the kanban board.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum KanbanStatus {
    Todo,
    InProgress,
    Review,
    Done,
}

impl KanbanStatus {
    pub const ALL: [KanbanStatus; 4] = [
        KanbanStatus::Todo,
        KanbanStatus::InProgress,
        KanbanStatus::Review,
        KanbanStatus::Done,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            KanbanStatus::Todo => "todo",
            KanbanStatus::InProgress => "in-progress",
            KanbanStatus::Review => "review",
            KanbanStatus::Done => "done",
        }
    }

    /// Exact match after trimming, ignoring ASCII case.
    pub fn from_cell(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
    }
}

impl fmt::Display for KanbanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KanbanStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_cell(s).ok_or_else(|| {
            Error::InvalidArgument(format!(
                "invalid kanban status '{}' (expected todo|in-progress|review|done)",
                s.trim()
            ))
        })
    }
}

/// Cost of `hours` of work of the given type, rounded to whole currency units.
pub fn compute_cost(task_type: TaskType, hours: f64) -> i64 {
    (task_type.hourly_rate() * hours).round() as i64
}

/// A task as reconstructed from one sheet row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// `{timestamp}-{data index}`; unique per snapshot, not stable across edits
    pub id: String,
    pub timestamp: String,
    pub email_address: String,
    pub date_reported: String,
    pub reported_by: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub severity: String,
    pub screenshot: String,
    pub bucket: String,
    pub description: String,
    pub month: String,
    pub developer: String,
    pub hours_invested: f64,
    pub resolved_on: String,
    pub est_deadline: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_until_deadline: Option<i64>,
    pub cost: i64,
    pub status: TaskStatus,
    pub kanban_status: KanbanStatus,
}

impl Task {
    pub fn is_resolved(&self) -> bool {
        !self.resolved_on.trim().is_empty()
    }
}
