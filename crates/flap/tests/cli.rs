//! Tests driving the `flap` binary.

mod common;

use assert_cmd::Command;
use predicates::prelude::*;

use common::TestHarness;

fn flap() -> Command {
    let mut cmd = Command::cargo_bin("flap").unwrap();
    cmd.env_remove("RUST_LOG").env_remove("FLAP_LOG");
    cmd
}

#[test]
fn test_no_command_exits_with_usage() {
    flap()
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Usage: flap"));
}

#[test]
fn test_missing_program_fails_to_start() {
    flap()
        .arg("/nonexistent/flap-child")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error starting command"));
}

#[test]
fn test_annotates_child_output() {
    let harness = TestHarness::new();
    let input = harness.write_child_output(&[
        "hello",
        "@foo: bad",
        "@write[10, 2]: abc",
        "@un_read[123, 4]: payload",
        "@un_read[999, 1]: payload",
        "@ungrouped[5, 6]: p",
    ]);

    flap()
        .arg("--ordered")
        .arg("--resolver")
        .arg("sh")
        .arg("--resolver-arg")
        .arg(&harness.resolver_script)
        .arg("cat")
        .arg(&input)
        .assert()
        .success()
        .stdout(
            "hello\n@write[10, 2]: abc\n@read[/var/log/app.log]: payload\n@read[999::1]: payload\n@ungrouped[/x]: p\n",
        );
}

#[test]
fn test_config_file_is_used() {
    let harness = TestHarness::new();
    let config_path = harness.write_config(&harness.config(2, true));

    flap()
        .arg("-c")
        .arg(&config_path)
        .args(["sh", "-c", "echo '@un_read[123, 4]: a'; echo b"])
        .assert()
        .success()
        .stdout("@read[/var/log/app.log]: a\nb\n");

    assert_eq!(harness.resolver_calls(), vec!["123 4"]);
}

#[test]
fn test_child_failure_exits_one_after_output() {
    flap()
        .args(["sh", "-c", "echo still-here; exit 3"])
        .assert()
        .code(1)
        .stdout("still-here\n")
        .stderr(predicate::str::contains("failed"));
}

#[test]
fn test_child_arguments_are_not_parsed() {
    flap()
        .args(["--ordered", "sh", "-c", "echo \"$0\"", "-v"])
        .assert()
        .success()
        .stdout("-v\n");
}

#[test]
fn test_invalid_config_exits_one() {
    let harness = TestHarness::new();
    let path = harness.temp_path().join("bad.json");
    std::fs::write(&path, r#"{ "worker_count": 0 }"#).unwrap();

    flap()
        .arg("--config")
        .arg(&path)
        .arg("true")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("worker_count"));
}

#[test]
fn test_help_exits_zero() {
    flap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("COMMAND"));
}
