//! Seed data for `tasksheet init --sample` and tests.

use crate::columns::{header_row, COLUMNS};
use crate::store::{Row, Workbook};

/// Sheet title used by sample workbooks, as created by a form export
pub const SAMPLE_SHEET_NAME: &str = "Form Responses 1";

struct SampleTask {
    timestamp: &'static str,
    email: &'static str,
    date_reported: &'static str,
    reported_by: &'static str,
    task_type: &'static str,
    severity: &'static str,
    bucket: &'static str,
    description: &'static str,
    hours: &'static str,
    resolved_on: &'static str,
    est_deadline: &'static str,
    kanban: &'static str,
    cost: &'static str,
}

const SAMPLE_TASKS: [SampleTask; 9] = [
    SampleTask {
        timestamp: "2023-05-01T09:12:00Z",
        email: "john@example.com",
        date_reported: "2023-05-01",
        reported_by: "John Doe",
        task_type: "Bug",
        severity: "High",
        bucket: "Frontend",
        description: "Login page not working on mobile devices",
        hours: "3.5",
        resolved_on: "5/5/2023",
        est_deadline: "5/8/2023",
        kanban: "done",
        cost: "700",
    },
    SampleTask {
        timestamp: "2023-05-15T14:03:00Z",
        email: "sarah@example.com",
        date_reported: "2023-05-15",
        reported_by: "Sarah Smith",
        task_type: "New feature",
        severity: "Medium",
        bucket: "Backend",
        description: "Add export to CSV functionality",
        hours: "5",
        resolved_on: "5/20/2023",
        est_deadline: "5/31/2023",
        kanban: "done",
        cost: "1500",
    },
    SampleTask {
        timestamp: "2023-06-05T08:40:00Z",
        email: "mike@example.com",
        date_reported: "2023-06-05",
        reported_by: "Mike Johnson",
        task_type: "Bug",
        severity: "Critical",
        bucket: "Database",
        description: "Data not saving to database intermittently",
        hours: "8",
        resolved_on: "",
        est_deadline: "6/12/2023",
        kanban: "todo",
        cost: "",
    },
    SampleTask {
        timestamp: "2023-06-15T11:25:00Z",
        email: "lisa@example.com",
        date_reported: "2023-06-15",
        reported_by: "Lisa Wong",
        task_type: "New feature",
        severity: "Low",
        bucket: "UI/UX",
        description: "Improve dashboard layout for mobile",
        hours: "6.5",
        resolved_on: "6/25/2023",
        est_deadline: "6/30/2023",
        kanban: "done",
        cost: "1950",
    },
    SampleTask {
        timestamp: "2023-07-01T16:50:00Z",
        email: "alex@example.com",
        date_reported: "2023-07-01",
        reported_by: "Alex Kim",
        task_type: "Bug",
        severity: "Medium",
        bucket: "Authentication",
        description: "Password reset emails not sending correctly",
        hours: "2.5",
        resolved_on: "",
        est_deadline: "",
        kanban: "todo",
        cost: "",
    },
    SampleTask {
        timestamp: "2023-07-20T10:05:00Z",
        email: "jamie@example.com",
        date_reported: "2023-07-20",
        reported_by: "Jamie Taylor",
        task_type: "New feature",
        severity: "High",
        bucket: "Performance",
        description: "Optimize database queries for faster loading",
        hours: "10",
        resolved_on: "",
        est_deadline: "8/15/2023",
        kanban: "in-progress",
        cost: "",
    },
    SampleTask {
        timestamp: "2023-08-05T13:30:00Z",
        email: "chris@example.com",
        date_reported: "2023-08-05",
        reported_by: "Chris Lee",
        task_type: "Bug",
        severity: "Urgent",
        bucket: "Security",
        description: "Security vulnerability in login process",
        hours: "9",
        resolved_on: "",
        est_deadline: "8/7/2023",
        kanban: "review",
        cost: "",
    },
    SampleTask {
        timestamp: "2023-09-10T09:00:00Z",
        email: "pat@example.com",
        date_reported: "2023-09-10",
        reported_by: "Pat Rivera",
        task_type: "New feature",
        severity: "Medium",
        bucket: "Frontend",
        description: "Add dark mode support",
        hours: "7",
        resolved_on: "9/20/2023",
        est_deadline: "9/30/2023",
        kanban: "done",
        cost: "2100",
    },
    SampleTask {
        timestamp: "2023-10-05T15:45:00Z",
        email: "logo@example.com",
        date_reported: "2023-10-05",
        reported_by: "Logo Team",
        task_type: "New feature",
        severity: "High",
        bucket: "Design",
        description: "Create new company logo for website header",
        hours: "5",
        resolved_on: "",
        est_deadline: "10/20/2023",
        kanban: "todo",
        cost: "",
    },
];

const SAMPLE_DEVELOPER: &str = "destinpq";

/// Header plus nine sample rows covering every kanban column
pub fn sample_rows() -> Vec<Row> {
    let mut rows = vec![header_row()];
    rows.extend(SAMPLE_TASKS.iter().map(|task| {
        let dev_status = if task.resolved_on.is_empty() {
            "pending"
        } else {
            "completed"
        };
        let row = vec![
            task.timestamp,
            task.email,
            task.date_reported,
            task.reported_by,
            task.task_type,
            task.severity,
            "",
            task.bucket,
            task.description,
            task.hours,
            task.resolved_on,
            task.est_deadline,
            "",
            SAMPLE_DEVELOPER,
            task.kanban,
            dev_status,
            task.cost,
        ];
        debug_assert_eq!(row.len(), COLUMNS.len());
        row.into_iter().map(str::to_string).collect()
    }));
    rows
}

pub fn sample_workbook() -> Workbook {
    Workbook::single(SAMPLE_SHEET_NAME, sample_rows())
}
