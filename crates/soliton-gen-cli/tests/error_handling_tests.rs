//! Exit codes and error messages.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn soliton(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("soliton-gen").unwrap();
    cmd.env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join(".config"))
        .env("NO_COLOR", "1")
        .current_dir(dir.path());
    cmd
}

#[test]
fn unknown_flag_exits_with_usage_error() {
    let temp = TempDir::new().unwrap();
    soliton(&temp).args(["domain", "Order", "--bogus"]).assert().code(2);
}

#[test]
fn missing_subcommand_exits_with_usage_error() {
    let temp = TempDir::new().unwrap();
    soliton(&temp).assert().code(2);
}

#[test]
fn outside_a_project_reports_layout_error() {
    let temp = TempDir::new().unwrap();
    soliton(&temp)
        .args(["domain", "Order"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("go.mod"));
}

#[test]
fn invalid_project_name_fails() {
    let temp = TempDir::new().unwrap();
    soliton(&temp)
        .args(["init", "bad name"])
        .assert()
        .code(1)
        .stderr(predicate::str::is_empty().not());
}

#[test]
fn delete_of_missing_domain_fails() {
    let temp = TempDir::new().unwrap();
    soliton(&temp).args(["init", "shop"]).assert().success();
    soliton(&temp)
        .args(["--dir", "shop", "domain", "delete", "ghost", "-y"])
        .assert()
        .code(1);
}

#[test]
fn explicit_missing_config_file_fails() {
    let temp = TempDir::new().unwrap();
    soliton(&temp)
        .args(["--config", "/nope/soliton.toml", "config", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("configuration"));
}
