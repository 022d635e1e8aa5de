use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

fn cli(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("budget_planner_cli").unwrap();
    cmd.env("BUDGET_PLANNER_CLI_SCRIPT", "1")
        .env("BUDGET_PLANNER_HOME", home.path());
    cmd
}

#[test]
fn script_mode_prints_receipts() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("init 1 1000\nspend 1 general 500\ncheck 1\nalert 1 groceries 80\nexit\n")
        .assert()
        .success()
        .stdout(contains("ok true"))
        .stdout(contains("ok false"))
        .stdout(contains("ok 1"));
}

#[test]
fn script_mode_reports_rejections_and_continues() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("check 9\ninit one 5\nlist\n")
        .assert()
        .success()
        .stdout(contains("err budget-not-found"))
        .stdout(contains("budget id must be a non-negative integer"))
        .stdout(contains("No budgets initialized."));
}

#[test]
fn save_writes_snapshot_under_home() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("init 2 300\nsave\n")
        .assert()
        .success()
        .stdout(contains("Ledger saved to"));

    let json = std::fs::read_to_string(home.path().join("ledger.json")).unwrap();
    assert!(json.contains("\"total\": 300"));
}
