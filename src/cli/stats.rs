//! tasksheet stats command implementation

use serde::Serialize;

use super::Session;
use crate::aggregate;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput};
use crate::repository::TaskRepository;
use crate::store::RowStore;
use crate::task::KanbanStatus;

pub struct StatsOptions {
    pub pending: bool,
    pub hours: bool,
}

#[derive(Serialize)]
struct PendingMoneyOutput {
    pending_money: i64,
}

#[derive(Serialize)]
struct TotalHoursOutput {
    total_hours: f64,
}

pub async fn run<S: RowStore>(
    repo: &TaskRepository<S>,
    session: &Session,
    options: StatsOptions,
) -> Result<()> {
    let tasks = repo.list_tasks().await?;

    if options.pending {
        let pending_money = aggregate::pending_money(&tasks);
        let human = HumanOutput::new(pending_money.to_string());
        return emit_success(
            session.output,
            "stats",
            &PendingMoneyOutput { pending_money },
            Some(&human),
        );
    }

    if options.hours {
        let total_hours = aggregate::total_hours(&tasks);
        let human = HumanOutput::new(total_hours.to_string());
        return emit_success(
            session.output,
            "stats",
            &TotalHoursOutput { total_hours },
            Some(&human),
        );
    }

    let summary = aggregate::summary(&tasks);
    let mut human = HumanOutput::new("Task stats");
    human.push_summary("Tasks", summary.total.to_string());
    human.push_summary("Pending", summary.pending.to_string());
    human.push_summary("Completed", summary.completed.to_string());
    human.push_summary("Total hours", summary.total_hours.to_string());
    human.push_summary("Pending money", summary.pending_money.to_string());
    let columns: Vec<String> = KanbanStatus::ALL
        .iter()
        .map(|status| format!("{status}={}", summary.kanban.get(*status)))
        .collect();
    human.push_detail(format!("Kanban: {}", columns.join(", ")));

    emit_success(session.output, "stats", &summary, Some(&human))
}
