// Smoke tests for the servmon binary

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn version_flag_prints_name() {
    Command::cargo_bin("servmon")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("servmon v"));
}

#[test]
fn build_info_flag_prints_metadata() {
    Command::cargo_bin("servmon")
        .unwrap()
        .arg("--build-info")
        .assert()
        .success()
        .stdout(predicate::str::contains("Target:"));
}

#[test]
fn help_lists_one_shot_actions() {
    Command::cargo_bin("servmon")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("--restart")
                .and(predicate::str::contains("--once"))
                .and(predicate::str::contains("--list")),
        );
}
