//! Task list and mutation commands.

use serde::Serialize;

use super::{GroupBy, Session};
use crate::aggregate::{self, TaskGroups};
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput};
use crate::repository::{NewTask, TaskRepository};
use crate::store::RowStore;
use crate::task::{compute_cost, KanbanStatus, Task, TaskType};

pub struct ListOptions {
    pub developer: Option<String>,
    pub group_by: Option<GroupBy>,
}

pub struct AddOptions {
    pub description: Option<String>,
    pub task_type: Option<TaskType>,
    pub month: Option<String>,
    pub developer: Option<String>,
    pub email: Option<String>,
    pub date_reported: Option<String>,
    pub reported_by: Option<String>,
    pub severity: Option<String>,
    pub screenshot: Option<String>,
    pub bucket: Option<String>,
    pub hours: f64,
    pub deadline: Option<String>,
    pub priority: Option<String>,
    pub status: Option<KanbanStatus>,
}

pub struct HoursOptions {
    pub id: String,
    pub hours: f64,
}

pub struct StatusOptions {
    pub id: String,
    pub status: KanbanStatus,
}

#[derive(Serialize)]
struct TaskListOutput {
    total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    developer: Option<String>,
    tasks: Vec<Task>,
}

#[derive(Serialize)]
struct TaskGroupsOutput {
    total: usize,
    group_by: &'static str,
    groups: TaskGroups,
}

#[derive(Serialize)]
struct TaskAddedOutput {
    added: bool,
    sheet: String,
}

#[derive(Serialize)]
struct HoursUpdatedOutput {
    id: String,
    hours: f64,
}

#[derive(Serialize)]
struct StatusUpdatedOutput {
    id: String,
    status: KanbanStatus,
    /// True when the cost cell was rewritten
    price_updated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    cost: Option<i64>,
}

pub async fn run_list<S: RowStore>(
    repo: &TaskRepository<S>,
    session: &Session,
    options: ListOptions,
) -> Result<()> {
    let tasks = match options.developer.as_deref() {
        Some(developer) => repo.tasks_by_developer(developer).await?,
        None => repo.list_tasks().await?,
    };

    if let Some(group_by) = options.group_by {
        let (label, groups) = match group_by {
            GroupBy::Month => ("month", aggregate::group_by_month(&tasks)),
            GroupBy::Bucket => ("bucket", aggregate::group_by_bucket(&tasks)),
        };

        let mut human = HumanOutput::new(format!("Tasks by {label}"));
        human.push_summary("Total", tasks.len().to_string());
        for (key, members) in groups.iter() {
            human.push_detail(format!(
                "{key}: {} tasks, {}h, cost {}",
                members.len(),
                aggregate::total_hours(members),
                aggregate::pending_money(members)
            ));
        }

        let output = TaskGroupsOutput {
            total: tasks.len(),
            group_by: label,
            groups,
        };
        return emit_success(session.output, "list", &output, Some(&human));
    }

    let mut human = HumanOutput::new("Tasks");
    human.push_summary("Total", tasks.len().to_string());
    if let Some(developer) = options.developer.as_deref() {
        human.push_summary("Developer", developer);
    }
    for task in &tasks {
        human.push_detail(format_task_line(task));
    }
    if tasks.is_empty() {
        human.push_next_step("tasksheet add --help");
    }

    let output = TaskListOutput {
        total: tasks.len(),
        developer: options.developer,
        tasks,
    };
    emit_success(session.output, "list", &output, Some(&human))
}

pub async fn run_add<S: RowStore>(
    repo: &TaskRepository<S>,
    session: &Session,
    options: AddOptions,
) -> Result<()> {
    let input = NewTask {
        description: options.description.unwrap_or_default(),
        task_type: options.task_type,
        month: options.month.unwrap_or_default(),
        developer: options.developer.unwrap_or_default(),
        email_address: options.email.unwrap_or_default(),
        date_reported: options.date_reported,
        reported_by: options.reported_by,
        severity: options.severity,
        screenshot: options.screenshot,
        bucket: options.bucket,
        hours_invested: options.hours,
        est_deadline: options.deadline,
        priority: options.priority,
        kanban_status: options.status,
    };
    let summary_type = input.task_type;
    let developer = input.developer.clone();

    let added = repo.add_task(input).await?;
    let sheet = repo.sheet_name().await.to_string();

    let mut human = HumanOutput::new("Task added");
    human.push_summary("Sheet", sheet.clone());
    human.push_summary("Developer", developer);
    if let Some(task_type) = summary_type {
        human.push_summary("Type", task_type.to_string());
        human.push_summary("Cost", compute_cost(task_type, options.hours).to_string());
    }
    human.push_next_step("tasksheet list");

    emit_success(
        session.output,
        "add",
        &TaskAddedOutput { added, sheet },
        Some(&human),
    )
}

pub async fn run_hours<S: RowStore>(
    repo: &TaskRepository<S>,
    session: &Session,
    options: HoursOptions,
) -> Result<()> {
    if !repo.update_hours(&options.id, options.hours).await? {
        return Err(Error::NotFound(options.id));
    }

    let mut human = HumanOutput::new("Hours updated");
    human.push_summary("ID", options.id.clone());
    human.push_summary("Hours", options.hours.to_string());

    emit_success(
        session.output,
        "hours",
        &HoursUpdatedOutput {
            id: options.id,
            hours: options.hours,
        },
        Some(&human),
    )
}

pub async fn run_status<S: RowStore>(
    repo: &TaskRepository<S>,
    session: &Session,
    options: StatusOptions,
) -> Result<()> {
    if !repo.update_kanban_status(&options.id, options.status).await? {
        return Err(Error::NotFound(options.id));
    }

    let price_updated = options.status == KanbanStatus::Done;
    // Re-read so the reported cost matches what the sheet now derives.
    let cost = if price_updated {
        repo.list_tasks()
            .await?
            .into_iter()
            .find(|task| task.id == options.id)
            .map(|task| task.cost)
    } else {
        None
    };

    let mut human = HumanOutput::new("Task status updated");
    human.push_summary("ID", options.id.clone());
    human.push_summary("Status", options.status.to_string());
    if let Some(cost) = cost {
        human.push_summary("Cost", cost.to_string());
    }

    emit_success(
        session.output,
        "status",
        &StatusUpdatedOutput {
            id: options.id,
            status: options.status,
            price_updated,
            cost,
        },
        Some(&human),
    )
}

fn format_task_line(task: &Task) -> String {
    let mut line = format!(
        "[{}][{}] {} {}",
        task.kanban_status, task.task_type, task.id, task.description
    );
    line.push_str(&format!(
        " ({}, {}h, cost {})",
        task.developer, task.hours_invested, task.cost
    ));
    if let Some(days) = task.days_until_deadline {
        if !task.is_resolved() && days < 0 {
            line.push_str(&format!(" (overdue {}d)", -days));
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{normalize, NormalizeContext};
    use chrono::NaiveDate;

    #[test]
    fn task_line_flags_overdue_work() {
        let ctx = NormalizeContext::new(NaiveDate::from_ymd_opt(2024, 5, 20).unwrap(), "dev");
        let row: Vec<String> = [
            "ts", "", "5/1/2024", "", "bug", "", "", "", "Login", "2", "", "5/10/2024",
        ]
        .iter()
        .map(|c| c.to_string())
        .collect();
        let task = normalize(&row, 0, &ctx).unwrap();
        assert_eq!(
            format_task_line(&task),
            "[todo][bug] ts-0 Login (dev, 2h, cost 400) (overdue 10d)"
        );
    }
}
