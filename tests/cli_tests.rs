//! Smoke tests for the binary surface.
//!
//! These stay off the encryption path on purpose: the production KDF profile
//! is deliberately expensive, so anything touching a real journal lives in
//! the library tests with light parameters instead.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_all_subcommands() {
    Command::cargo_bin("vellum")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("add")
                .and(predicate::str::contains("list"))
                .and(predicate::str::contains("show"))
                .and(predicate::str::contains("latest"))
                .and(predicate::str::contains("delete")),
        );
}

#[test]
fn missing_subcommand_fails() {
    Command::cargo_bin("vellum")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn unknown_subcommand_fails() {
    Command::cargo_bin("vellum")
        .unwrap()
        .arg("frobnicate")
        .assert()
        .failure();
}

#[test]
fn show_rejects_non_numeric_timestamp() {
    Command::cargo_bin("vellum")
        .unwrap()
        .args(["show", "yesterday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn version_flag_works() {
    Command::cargo_bin("vellum")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("vellum"));
}
