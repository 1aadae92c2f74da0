use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_ask_answers_from_rules() {
    cargo_bin_cmd!("unveil")
        .args(["ask", "what", "SKILLS", "do", "you", "have"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Buckle up."))
        .stdout(predicate::str::contains("→ "));
}

#[test]
fn test_ask_requires_text() {
    cargo_bin_cmd!("unveil").arg("ask").assert().failure();
}

#[test]
fn test_mode_defaults_to_dark() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("unveil")
        .env("UNVEIL_HOME", dir.path())
        .arg("mode")
        .assert()
        .success()
        .stdout("dark\n");
}

#[test]
fn test_mode_is_persisted() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("unveil")
        .env("UNVEIL_HOME", dir.path())
        .args(["mode", "light"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Light mode"));

    let saved = fs::read_to_string(dir.path().join("prefs.toml")).unwrap();
    assert!(saved.contains("light"));

    cargo_bin_cmd!("unveil")
        .env("UNVEIL_HOME", dir.path())
        .arg("mode")
        .assert()
        .success()
        .stdout("light\n");
}
