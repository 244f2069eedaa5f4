use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

#[test]
fn check_passes_for_valid_document() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("oc-compile"));
    cmd.arg("check")
        .arg(fixture("fixtures/intent.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("result errors=0"));
}

#[test]
fn check_reports_missing_prefix_set() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("oc-compile"));
    cmd.arg("check")
        .arg(fixture("fixtures/missing_ref.json"))
        .assert()
        .failure()
        .stdout(predicate::str::contains("missing_reference"))
        .stdout(predicate::str::contains("PFX-MISSING"))
        .stderr(predicate::str::contains("check failed"));
}

#[test]
fn check_reports_bad_range() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("oc-compile"));
    cmd.arg("check")
        .arg(fixture("fixtures/bad_range.json"))
        .args(["--format", "json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"code\": \"invalid_range\""));
}

#[test]
fn apply_refuses_bad_range() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("oc-compile"));
    cmd.arg("apply")
        .arg(fixture("fixtures/bad_range.json"))
        .args(["--vendor", "sonic"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("invalid masklength range '16..24'"));
}

#[test]
fn check_accepts_toml_document() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("oc-compile"));
    cmd.arg("check")
        .arg(fixture("fixtures/intent.toml"))
        .assert()
        .success();
}
