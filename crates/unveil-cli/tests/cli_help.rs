use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("unveil")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("play"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("scripts"))
        .stdout(predicate::str::contains("mode"))
        .stdout(predicate::str::contains("ask"));
}

#[test]
fn test_scripts_help_shows_subcommands() {
    cargo_bin_cmd!("unveil")
        .args(["scripts", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("validate"));
}

#[test]
fn test_run_help_shows_flags() {
    cargo_bin_cmd!("unveil")
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--instant"))
        .stdout(predicate::str::contains("--json"))
        .stdout(predicate::str::contains("--profile"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("unveil")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1"));
}

#[test]
fn test_unknown_profile_is_rejected() {
    cargo_bin_cmd!("unveil")
        .args(["run", "--profile", "glacial"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown timing profile"));
}
