//! End-to-end tests for the `soliton-gen` binary against a temp directory.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

/// A command isolated from the user's config and environment.
fn soliton(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("soliton-gen").unwrap();
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .current_dir(home);
    cmd
}

fn init_shop(temp: &TempDir) {
    soliton(temp.path()).args(["init", "shop"]).assert().success();
}

#[test]
fn help_lists_subcommands() {
    let temp = TempDir::new().unwrap();
    soliton(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("domain"))
        .stdout(predicate::str::contains("event-handler"))
        .stdout(predicate::str::contains("serve"));
}

#[test]
fn version_flag() {
    let temp = TempDir::new().unwrap();
    soliton(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn init_creates_project() {
    let temp = TempDir::new().unwrap();
    soliton(temp.path())
        .args(["init", "shop"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[NEW]"));

    let root = temp.path().join("shop");
    assert!(root.join("internal/domain").is_dir());
    let go_mod = fs::read_to_string(root.join("go.mod")).unwrap();
    assert!(go_mod.contains("module github.com/soliton-go/shop"));
}

#[test]
fn init_preview_writes_nothing() {
    let temp = TempDir::new().unwrap();
    soliton(temp.path())
        .args(["init", "shop", "--preview"])
        .assert()
        .success()
        .stdout(predicate::str::contains("go.mod"));
    assert!(!temp.path().join("shop").exists());
}

#[test]
fn domain_generate_then_list() {
    let temp = TempDir::new().unwrap();
    init_shop(&temp);
    let shop = temp.path().join("shop");

    soliton(temp.path())
        .args(["--dir", shop.to_str().unwrap()])
        .args(["domain", "Order", "-f", "status:enum(pending|paid),total:int64", "--wire"])
        .assert()
        .success();

    let entity = fs::read_to_string(shop.join("internal/domain/order/order.go")).unwrap();
    assert!(entity.contains("type Order struct"));

    soliton(&shop)
        .args(["domain", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Order"));
}

#[test]
fn domain_list_as_json() {
    let temp = TempDir::new().unwrap();
    init_shop(&temp);
    let shop = temp.path().join("shop");
    soliton(&shop).args(["domain", "Order", "-f", "total:int64"]).assert().success();

    let output = soliton(&shop)
        .args(["--output-format", "json", "domain", "list"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let domains: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(domains[0]["name"], "Order");
}

#[test]
fn commands_find_the_project_from_a_nested_directory() {
    let temp = TempDir::new().unwrap();
    init_shop(&temp);
    let shop = temp.path().join("shop");
    soliton(&shop).args(["domain", "Order"]).assert().success();

    let nested = shop.join("internal/domain/order");
    soliton(temp.path())
        .current_dir(&nested)
        .args(["domain", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Order"));
    soliton(temp.path())
        .current_dir(&nested)
        .args(["vo", "order", "Money", "-f", "amount:int64"])
        .assert()
        .success();
    assert!(shop.join("internal/domain/order/value_object_money.go").is_file());
}

#[test]
fn domain_named_like_a_subcommand() {
    let temp = TempDir::new().unwrap();
    init_shop(&temp);
    let shop = temp.path().join("shop");

    soliton(&shop).args(["domain", "--name", "show", "-f", "title"]).assert().success();
    assert!(shop.join("internal/domain/show/show.go").is_file());
    soliton(&shop)
        .args(["domain", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--name"));
}

#[test]
fn domain_preview_writes_nothing() {
    let temp = TempDir::new().unwrap();
    init_shop(&temp);
    let shop = temp.path().join("shop");

    soliton(&shop)
        .args(["domain", "Order", "--preview"])
        .assert()
        .success()
        .stdout(predicate::str::contains("type Order struct"));
    assert!(!shop.join("internal/domain/order").exists());
}

#[test]
fn value_object_and_ddd_list() {
    let temp = TempDir::new().unwrap();
    init_shop(&temp);
    let shop = temp.path().join("shop");
    soliton(&shop).args(["domain", "Order"]).assert().success();

    soliton(&shop)
        .args(["vo", "order", "Money", "-f", "amount:int64,currency:string"])
        .assert()
        .success();
    soliton(&shop)
        .args(["ddd", "list", "order"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Money"));
}

#[test]
fn completions_for_bash() {
    let temp = TempDir::new().unwrap();
    soliton(temp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("soliton-gen"));
}

#[test]
fn config_path_and_get() {
    let temp = TempDir::new().unwrap();
    soliton(temp.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
    soliton(temp.path())
        .args(["config", "get", "server.port"])
        .env("SOLITON_GEN__SERVER__PORT", "9100")
        .assert()
        .success()
        .stdout(predicate::str::contains("9100"));
}

#[test]
fn config_init_local_refuses_to_overwrite() {
    let temp = TempDir::new().unwrap();
    soliton(temp.path()).args(["config", "init", "--local"]).assert().success();
    assert!(temp.path().join(".soliton-gen.toml").is_file());

    soliton(temp.path())
        .args(["config", "init", "--local"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--force"));
}
