//! CLI tests for the rfm-oec binary
//!
//! Test the rates-ratio report in text and JSON form, config loading and
//! error exits.

use predicates::prelude::*;
use std::io::Write;

fn counts(cmd: &mut assert_cmd::Command) -> &mut assert_cmd::Command {
    cmd.args([
        "--num-a", "1000", "--num-b", "1000", "--pos-a", "50", "--pos-b", "60",
    ])
}

#[test]
fn test_text_report_fail_to_reject() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("rfm-oec");
    counts(&mut cmd)
        .args(["--hypo", "[None, 1.5]"])
        .assert()
        .success()
        .stdout(predicate::str::contains("NOT REJECTED"))
        .stdout(predicate::str::contains("Observed ratio: 1.2"))
        .stdout(predicate::str::contains("[None, 1.5]"));
}

#[test]
fn test_text_report_reject() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("rfm-oec");
    cmd.args([
        "--num-a", "1000", "--num-b", "1000", "--pos-a", "50", "--pos-b", "150", "--hypo",
        "[None, 1.5]",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("NULL HYPOTHESIS REJECTED"));
}

#[test]
fn test_text_report_abstain() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("rfm-oec");
    cmd.args([
        "--num-a", "50", "--num-b", "1000", "--pos-a", "5", "--pos-b", "60",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("INSUFFICIENT DATA"))
    .stdout(predicate::str::contains("Observed ratio").not());
}

#[test]
fn test_json_output() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("rfm-oec");
    let output = counts(&mut cmd)
        .args(["--hypo", "[None, 1.5]", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["reject"], false);
    assert_eq!(json["ratio_ci"]["lower"], "-inf");
    assert_eq!(json["alpha"], 0.05);
}

#[test]
fn test_missing_count_fails() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("rfm-oec");
    cmd.args(["--num-a", "1000", "--num-b", "1000", "--pos-a", "50"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("pos_b"));
}

#[test]
fn test_both_bounds_missing_fails() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("rfm-oec");
    counts(&mut cmd)
        .args(["--hypo", "[None, None]"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("both values are missing"));
}

#[test]
fn test_unparsable_hypothesis_rejected_by_parser() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("rfm-oec");
    counts(&mut cmd)
        .args(["--hypo", "[one, two]"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--hypo"));
}

#[test]
fn test_strict_preset_alpha() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("rfm-oec");
    counts(&mut cmd)
        .args(["--strict", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"alpha\": 0.01"));
}

#[test]
fn test_config_file_alpha_and_flag_override() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[rates_ratio]\nalpha = 0.10").unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("rfm-oec");
    counts(&mut cmd)
        .arg("--config")
        .arg(file.path())
        .args(["--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"alpha\": 0.1"));

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("rfm-oec");
    counts(&mut cmd)
        .arg("--config")
        .arg(file.path())
        .args(["--alpha", "0.02", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"alpha\": 0.02"));
}

#[test]
fn test_invalid_config_fails() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[rates_ratio]\nalpha = 2.0").unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("rfm-oec");
    counts(&mut cmd)
        .arg("--config")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("alpha must be in (0, 1)"));
}

#[test]
fn test_invalid_alpha_flag_fails() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("rfm-oec");
    counts(&mut cmd)
        .args(["--alpha", "1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("alpha"));
}

#[test]
fn test_debug_flag_traces_to_stderr() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("rfm-oec");
    counts(&mut cmd)
        .arg("--debug")
        .assert()
        .success()
        .stderr(predicate::str::contains("rates ratio test"));
}

#[test]
fn test_preset_with_config_file_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[rates_ratio]\nalpha = 0.10").unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("rfm-oec");
    counts(&mut cmd)
        .arg("--config")
        .arg(file.path())
        .arg("--strict")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_json_infinite_hypothesis_bound() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("rfm-oec");
    let output = counts(&mut cmd)
        .args(["--hypo", "[1, inf]", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["ratio_hypo"], serde_json::json!([1.0, "inf"]));
    assert_eq!(
        json["hypothesis"],
        serde_json::json!({"two_sided": {"lower": 1.0, "upper": "inf"}})
    );
    assert_eq!(json["ratio_ci"]["upper"], "inf");
}
