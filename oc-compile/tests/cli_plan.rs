use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

#[test]
fn plan_keeps_up_neighbor_under_down_only_rule() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("oc-compile"));
    cmd.arg("plan-removal")
        .arg(fixture("fixtures/intent.json"))
        .arg("--device")
        .arg(fixture("fixtures/device.json"))
        .arg("--safeguards")
        .arg(fixture("fixtures/safeguards.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("192.0.2.2 state=down"))
        .stdout(predicate::str::contains("192.0.2.3 state=up"))
        .stdout(predicate::str::contains("result remove=2 keep=1"));
}

#[test]
fn plan_without_rules_removes_every_extra() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("oc-compile"));
    cmd.arg("plan-removal")
        .arg(fixture("fixtures/intent.json"))
        .arg("--device")
        .arg(fixture("fixtures/device.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("result remove=3 keep=0"));
}

#[test]
fn plan_json_lists_sessions() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("oc-compile"));
    let output = cmd
        .arg("plan-removal")
        .arg(fixture("fixtures/intent.json"))
        .arg("--device")
        .arg(fixture("fixtures/device.json"))
        .args(["--format", "json"])
        .arg("--safeguards")
        .arg(fixture("fixtures/safeguards.toml"))
        .output()
        .expect("run");
    assert!(output.status.success());

    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    let removed: Vec<&str> = plan["remove"]
        .as_array()
        .expect("remove array")
        .iter()
        .filter_map(|n| n["remote_address"].as_str())
        .collect();
    assert_eq!(removed, vec!["192.0.2.2", "198.51.100.7"]);
    assert_eq!(plan["keep"][0]["remote_address"], "192.0.2.3");
}

#[test]
fn malformed_safeguards_fail() {
    let dir = tempdir().expect("tempdir");
    let rules = dir.path().join("rules.toml");
    fs::write(&rules, "[[safeguards]]\nfield = \"hostname\"\ncontains = \"x\"\nminimum_up = 1\n")
        .expect("write");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("oc-compile"));
    cmd.arg("plan-removal")
        .arg(fixture("fixtures/intent.json"))
        .arg("--device")
        .arg(fixture("fixtures/device.json"))
        .arg("--safeguards")
        .arg(&rules)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid safeguards"));
}
