use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_instant_run_prints_lines_and_completion() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("unveil")
        .env("UNVEIL_HOME", dir.path())
        .args(["run", "--instant", "--script", "kopitiam-intel"])
        .assert()
        .success()
        .stdout(predicate::str::contains("▸ "))
        .stdout(predicate::str::contains("  $ "))
        .stdout(predicate::str::contains("complete"))
        .stdout(predicate::str::contains("Predicted ROI  340%"));
}

#[test]
fn test_instant_run_json_reports_final_state() {
    let dir = tempdir().unwrap();

    let output = cargo_bin_cmd!("unveil")
        .env("UNVEIL_HOME", dir.path())
        .args(["run", "--instant", "--json", "--script", "mamak-workshop"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let state: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(state["phase"], "complete");
    assert_eq!(state["is_playing"], false);
    assert!(!state["completed_stages"].as_array().unwrap().is_empty());
    assert_eq!(state["results"][0]["label"], "Localized");
    assert_eq!(state["results"][0]["value"], "Manglish");
}

#[test]
fn test_run_plays_a_file_in_real_time() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("quick.yaml");
    fs::write(
        &path,
        "id: quick\ntitle: Quick\nstages:\n  - name: Only\n    lines:\n      - text: \"$ hi\"\n        typing_delay_ms: 5\n",
    )
    .unwrap();

    cargo_bin_cmd!("unveil")
        .env("UNVEIL_HOME", dir.path())
        .args(["run", "--file"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("▸  Only"))
        .stdout(predicate::str::contains("  $ hi"))
        .stdout(predicate::str::contains("✓ Quick complete"));
}

#[test]
fn test_run_unknown_script_fails() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("unveil")
        .env("UNVEIL_HOME", dir.path())
        .args(["run", "--instant", "--script", "missing"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unknown script `missing`"));
}

#[test]
fn test_script_and_file_conflict() {
    cargo_bin_cmd!("unveil")
        .args(["run", "--script", "a", "--file", "b.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_options_before_run_apply_to_it() {
    let dir = tempdir().unwrap();

    let output = cargo_bin_cmd!("unveil")
        .env("UNVEIL_HOME", dir.path())
        .args(["--script", "mamak-workshop", "run", "--instant", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let state: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(state["results"][0]["label"], "Localized");
}

#[test]
fn test_options_before_run_still_conflict() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("unveil")
        .env("UNVEIL_HOME", dir.path())
        .args(["--script", "kopitiam-intel", "run", "--file", "demo.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_source_options_rejected_for_other_commands() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("unveil")
        .env("UNVEIL_HOME", dir.path())
        .args(["--autoplay", "scripts", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("only apply to `play` and `run`"));
}

#[test]
fn test_player_requires_terminal() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("unveil")
        .env("UNVEIL_HOME", dir.path())
        .arg("play")
        .assert()
        .failure()
        .stderr(predicate::str::contains("needs a terminal"));
}
