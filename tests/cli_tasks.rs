mod support;

use predicates::str::contains;
use serde_json::Value;

use support::{json_stdout, row, TestSheet};
use tasksheet::columns::header_row;
use tasksheet::sample::SAMPLE_SHEET_NAME;

const DATABASE_BUG: &str = "2023-06-05T08:40:00Z-2";

fn sampled() -> TestSheet {
    let sheet = TestSheet::new();
    sheet.cmd().args(["init", "--sample"]).assert().success();
    sheet
}

#[test]
fn init_creates_workbook_and_config() {
    let sheet = TestSheet::new();
    let output = sheet
        .cmd()
        .args(["init", "--sample", "--json"])
        .output()
        .expect("run");
    assert!(output.status.success());

    let json = json_stdout(&output);
    assert_eq!(json["schema_version"], "tasksheet.v1");
    assert_eq!(json["command"], "init");
    assert_eq!(json["status"], "success");
    assert_eq!(json["data"]["tasks"], 9);
    assert_eq!(json["data"]["sheet_name"], SAMPLE_SHEET_NAME);
    assert_eq!(json["data"]["created"]["config"], true);

    assert!(sheet.path().join(".tasksheet.toml").exists());
    assert_eq!(sheet.rows(SAMPLE_SHEET_NAME).len(), 10);
}

#[test]
fn init_refuses_to_replace_without_force() {
    let sheet = sampled();
    sheet
        .cmd()
        .arg("init")
        .assert()
        .failure()
        .code(2)
        .stderr(contains("workbook already exists"));

    sheet.cmd().args(["init", "--force"]).assert().success();
    assert_eq!(sheet.rows("Sheet1"), vec![header_row()]);
}

#[test]
fn list_reports_derived_fields() {
    let sheet = sampled();
    let output = sheet.cmd().args(["list", "--json"]).output().expect("run");
    assert!(output.status.success());

    let json = json_stdout(&output);
    let data = &json["data"];
    assert_eq!(data["total"], 9);

    let first = &data["tasks"][0];
    assert_eq!(first["id"], "2023-05-01T09:12:00Z-0");
    assert_eq!(first["type"], "bug");
    assert_eq!(first["cost"], 700);
    assert_eq!(first["status"], "completed");
    assert_eq!(first["kanbanStatus"], "done");
    assert_eq!(first["daysUntilDeadline"], 100);
    assert_eq!(first["month"], "May");

    let review = &data["tasks"][6];
    assert_eq!(review["kanbanStatus"], "review");
    assert_eq!(review["status"], "pending");
}

#[test]
fn list_filters_by_developer() {
    let sheet = sampled();
    let output = sheet
        .cmd()
        .args(["list", "--developer", "nobody", "--json"])
        .output()
        .expect("run");
    assert_eq!(json_stdout(&output)["data"]["total"], 0);

    sheet
        .cmd()
        .args(["list", "--developer", "destinpq"])
        .assert()
        .success()
        .stdout(contains("Total: 9"));
}

#[test]
fn list_groups_by_month_in_sheet_order() {
    let sheet = sampled();
    let output = sheet
        .cmd()
        .args(["list", "--group-by", "month", "--json"])
        .output()
        .expect("run");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout.clone()).expect("utf8");
    let positions: Vec<usize> = ["\"May\"", "\"June\"", "\"July\"", "\"August\"", "\"October\""]
        .iter()
        .map(|key| stdout.find(key).expect("group key"))
        .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));

    let json = json_stdout(&output);
    assert_eq!(json["data"]["group_by"], "month");
    assert_eq!(json["data"]["groups"]["July"].as_array().map(Vec::len), Some(2));
}

#[test]
fn hours_update_rewrites_the_cell() {
    let sheet = sampled();
    sheet
        .cmd()
        .args(["hours", DATABASE_BUG, "4"])
        .assert()
        .success()
        .stdout(contains("Hours updated"));

    assert_eq!(sheet.rows(SAMPLE_SHEET_NAME)[3][9], "4");
}

#[test]
fn status_done_stamps_resolution_and_cost() {
    let sheet = sampled();
    let output = sheet
        .cmd()
        .args(["status", DATABASE_BUG, "done", "--json"])
        .output()
        .expect("run");
    assert!(output.status.success());

    let json = json_stdout(&output);
    assert_eq!(json["data"]["price_updated"], true);
    assert_eq!(json["data"]["cost"], 1600);

    let rows = sheet.rows(SAMPLE_SHEET_NAME);
    assert_eq!(rows[3][14], "done");
    assert!(!rows[3][10].is_empty());
    assert_eq!(rows[3][15], "completed");
    assert_eq!(rows[3][16], "1600");

    sheet
        .cmd()
        .args(["status", DATABASE_BUG, "in-progress"])
        .assert()
        .success();
    let rows = sheet.rows(SAMPLE_SHEET_NAME);
    assert_eq!(rows[3][10], "");
    assert_eq!(rows[3][15], "pending");
}

#[test]
fn unknown_id_is_a_user_error() {
    let sheet = sampled();
    let output = sheet
        .cmd()
        .args(["hours", "missing-42", "1", "--json"])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(2));

    let json = json_stdout(&output);
    assert_eq!(json["status"], "error");
    assert_eq!(json["command"], "hours");
    assert_eq!(json["error"]["kind"], "user_error");
    assert_eq!(json["error"]["details"]["id"], "missing-42");
}

#[test]
fn negative_hours_are_rejected() {
    let sheet = sampled();
    sheet
        .cmd()
        .args(["hours", DATABASE_BUG, "-1"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("non-negative"));
    assert_eq!(sheet.rows(SAMPLE_SHEET_NAME)[3][9], "8");
}

#[test]
fn add_validates_required_fields() {
    let sheet = sampled();
    let output = sheet
        .cmd()
        .args(["add", "--description", "Fix footer", "--json"])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(2));

    let json = json_stdout(&output);
    let missing: Vec<Value> = json["error"]["details"]["missing"]
        .as_array()
        .cloned()
        .unwrap_or_default();
    assert_eq!(missing, vec!["type", "month", "developer"]);
    assert_eq!(sheet.rows(SAMPLE_SHEET_NAME).len(), 10);
}

#[test]
fn added_task_appears_in_list() {
    let sheet = sampled();
    sheet
        .cmd()
        .args([
            "add",
            "--description",
            "Fix footer links",
            "--type",
            "bug",
            "--month",
            "June",
            "--developer",
            "ana",
            "--hours",
            "1.5",
            "--date-reported",
            "6/20/2023",
        ])
        .assert()
        .success()
        .stdout(contains("Task added"));

    let output = sheet
        .cmd()
        .args(["list", "--developer", "ana", "--json"])
        .output()
        .expect("run");
    let json = json_stdout(&output);
    assert_eq!(json["data"]["total"], 1);
    let task = &json["data"]["tasks"][0];
    assert_eq!(task["description"], "Fix footer links");
    assert_eq!(task["cost"], 300);
    assert_eq!(task["month"], "June");
    assert_eq!(task["reportedBy"], "Anonymous");
    assert_eq!(task["kanbanStatus"], "todo");
}

#[test]
fn stats_totals() {
    let sheet = sampled();
    sheet
        .cmd()
        .args(["stats", "--pending"])
        .assert()
        .success()
        .stdout("14650\n");
    sheet
        .cmd()
        .args(["stats", "--hours"])
        .assert()
        .success()
        .stdout("56.5\n");

    let output = sheet.cmd().args(["stats", "--json"]).output().expect("run");
    let json = json_stdout(&output);
    assert_eq!(json["data"]["total"], 9);
    assert_eq!(json["data"]["completed"], 4);
    assert_eq!(json["data"]["kanban"]["in-progress"], 1);
}

#[test]
fn missing_workbook_points_at_init() {
    let sheet = TestSheet::new();
    sheet
        .cmd()
        .arg("list")
        .assert()
        .failure()
        .code(4)
        .stderr(contains("tasksheet init"));
}

#[test]
fn sheet_flag_and_env_select_the_workbook() {
    let sheet = TestSheet::with_rows(
        "Bugs",
        vec![
            header_row(),
            row(&["t1", "", "5/1/2024", "", "bug", "", "", "", "Crash", "2"]),
        ],
    );
    let other = sheet.path().join("elsewhere.json");
    std::fs::rename(sheet.sheet_path(), &other).expect("move workbook");

    sheet
        .cmd()
        .args(["list", "--sheet"])
        .arg(&other)
        .assert()
        .success()
        .stdout(contains("t1-0 Crash"));

    sheet
        .cmd()
        .env("TASKSHEET_SHEET", &other)
        .args(["stats", "--pending"])
        .assert()
        .success()
        .stdout("400\n");
}

#[test]
fn configured_sheet_name_must_exist() {
    let sheet = sampled();
    sheet.write_config("[sheet]\nname = \"Archive\"\n");
    sheet
        .cmd()
        .arg("list")
        .assert()
        .failure()
        .code(2)
        .stderr(contains("Sheet not found: Archive"));
}

#[test]
fn quiet_suppresses_human_output() {
    let sheet = sampled();
    sheet
        .cmd()
        .args(["--quiet", "hours", DATABASE_BUG, "3"])
        .assert()
        .success()
        .stdout("");
}
