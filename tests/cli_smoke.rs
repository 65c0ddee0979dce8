mod support;

use predicates::str::contains;

#[test]
fn tasksheet_help_works() {
    support::tasksheet_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("task tracking over a spreadsheet"));
}

#[test]
fn subcommand_help_works() {
    let subcommands = ["init", "list", "stats", "add", "hours", "status"];

    for cmd in subcommands {
        support::tasksheet_cmd()
            .arg(cmd)
            .arg("--help")
            .assert()
            .success();
    }
}

#[test]
fn unknown_kanban_column_is_rejected_by_parser() {
    support::tasksheet_cmd()
        .args(["status", "abc-0", "doing"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("invalid kanban status"));
}
