//! End-to-end tests for the `tasks` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::{tempdir, TempDir};

/// Data dir plus a config with an instant, always-succeeding remote.
fn workspace() -> TempDir {
    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join("tasks.toml"),
        "[remote]\nmin_latency_ms = 0\nmax_latency_ms = 0\n",
    )
    .unwrap();
    dir
}

fn tasks(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tasks").unwrap();
    cmd.arg("--config")
        .arg(dir.join("tasks.toml"))
        .arg("--data-dir")
        .arg(dir.join("data"));
    cmd
}

fn first_task_id(dir: &Path) -> String {
    let output = tasks(dir).args(["list", "--json"]).output().unwrap();
    let view: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    view["tasks"][0]["id"].to_string()
}

#[test]
fn help_lists_commands() {
    Command::cargo_bin("tasks")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("session"))
        .stdout(predicate::str::contains("sync"));
}

#[test]
fn offline_add_is_pending() {
    let dir = workspace();

    tasks(dir.path())
        .args(["--offline", "add", "buy", "milk"])
        .assert()
        .success()
        .stdout(predicate::str::contains("buy milk"))
        .stdout(predicate::str::contains("(pending)"))
        .stdout(predicate::str::contains("1 change(s) queued"));
}

#[test]
fn list_shows_saved_tasks() {
    let dir = workspace();
    tasks(dir.path())
        .args(["--offline", "add", "water plants"])
        .assert()
        .success();

    tasks(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("water plants"));

    tasks(dir.path())
        .args(["list", "--filter", "completed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(no tasks)"));
}

#[test]
fn invalid_id_is_rejected() {
    let dir = workspace();

    tasks(dir.path())
        .args(["toggle", "not-a-number"])
        .assert()
        .failure();
}

#[test]
fn unknown_id_fails() {
    let dir = workspace();

    tasks(dir.path())
        .args(["--offline", "delete", "12345"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No task with id 12345"));
}

#[test]
fn status_reports_queue() {
    let dir = workspace();
    tasks(dir.path())
        .args(["--offline", "add", "a"])
        .assert()
        .success();

    tasks(dir.path())
        .args(["--offline", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("offline (forced)"))
        .stdout(predicate::str::contains("1 change(s) queued"));
}

#[test]
fn sync_replays_offline_changes() {
    let dir = workspace();
    tasks(dir.path())
        .args(["--offline", "add", "a"])
        .assert()
        .success();
    let id = first_task_id(dir.path());
    tasks(dir.path())
        .args(["--offline", "toggle", &id])
        .assert()
        .success();

    tasks(dir.path())
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("Synced 2 offline changes"));

    tasks(dir.path())
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to sync"));
}

#[test]
fn session_reads_commands_from_stdin() {
    let dir = workspace();

    tasks(dir.path())
        .args(["--offline", "session"])
        .write_stdin("add from session\nfly\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("from session"))
        .stdout(predicate::str::contains("unknown command: fly"))
        .stdout(predicate::str::contains("will sync next time"));
}
