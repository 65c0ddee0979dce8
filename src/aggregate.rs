//! Pure reductions over task lists.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::task::{KanbanStatus, Task, TaskStatus};

/// Tasks grouped by key, keys kept in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskGroups {
    groups: Vec<(String, Vec<Task>)>,
}

impl TaskGroups {
    fn push(&mut self, key: &str, task: Task) {
        match self.groups.iter_mut().find(|(existing, _)| existing == key) {
            Some((_, tasks)) => tasks.push(task),
            None => self.groups.push((key.to_string(), vec![task])),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(key, _)| key.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&[Task]> {
        self.groups
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, tasks)| tasks.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Task])> {
        self.groups
            .iter()
            .map(|(key, tasks)| (key.as_str(), tasks.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl Serialize for TaskGroups {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (key, tasks) in &self.groups {
            map.serialize_entry(key, tasks)?;
        }
        map.end()
    }
}

fn group_by(tasks: &[Task], key: impl Fn(&Task) -> &str) -> TaskGroups {
    let mut groups = TaskGroups::default();
    for task in tasks {
        groups.push(key(task), task.clone());
    }
    groups
}

pub fn group_by_month(tasks: &[Task]) -> TaskGroups {
    group_by(tasks, |task| task.month.as_str())
}

pub fn group_by_bucket(tasks: &[Task]) -> TaskGroups {
    group_by(tasks, |task| task.bucket.as_str())
}

/// Sum of cost over every task, resolved or not. Saturates instead of
/// overflowing.
pub fn pending_money(tasks: &[Task]) -> i64 {
    tasks
        .iter()
        .fold(0i64, |total, task| total.saturating_add(task.cost))
}

pub fn total_hours(tasks: &[Task]) -> f64 {
    tasks.iter().map(|task| task.hours_invested).sum()
}

/// Task counts per kanban column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct KanbanCounts {
    pub todo: usize,
    pub in_progress: usize,
    pub review: usize,
    pub done: usize,
}

impl KanbanCounts {
    pub fn get(&self, status: KanbanStatus) -> usize {
        match status {
            KanbanStatus::Todo => self.todo,
            KanbanStatus::InProgress => self.in_progress,
            KanbanStatus::Review => self.review,
            KanbanStatus::Done => self.done,
        }
    }

    fn bump(&mut self, status: KanbanStatus) {
        let slot = match status {
            KanbanStatus::Todo => &mut self.todo,
            KanbanStatus::InProgress => &mut self.in_progress,
            KanbanStatus::Review => &mut self.review,
            KanbanStatus::Done => &mut self.done,
        };
        *slot += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
    pub kanban: KanbanCounts,
    pub pending_money: i64,
    pub total_hours: f64,
}

pub fn summary(tasks: &[Task]) -> Summary {
    let mut kanban = KanbanCounts::default();
    let mut completed = 0;
    for task in tasks {
        kanban.bump(task.kanban_status);
        if task.status == TaskStatus::Completed {
            completed += 1;
        }
    }

    Summary {
        total: tasks.len(),
        pending: tasks.len() - completed,
        completed,
        kanban,
        pending_money: pending_money(tasks),
        total_hours: total_hours(tasks),
    }
}
