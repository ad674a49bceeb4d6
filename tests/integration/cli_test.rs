//! CLI integration tests driving the built binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn rawcache() -> Command {
    Command::cargo_bin("rawcache").expect("binary builds")
}

#[test]
fn help_lists_the_commands() {
    rawcache()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("scan"))
        .stdout(predicate::str::contains("probe"))
        .stdout(predicate::str::contains("warm"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn version_flag_prints_a_version() {
    rawcache()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rawcache"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn scan_reports_when_nothing_is_found() {
    let temp = TempDir::new().unwrap();
    rawcache()
        .arg("scan")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No raw files found"));
}

#[test]
fn scan_lists_raw_files_in_a_table() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("shot.nef"), b"fake").unwrap();
    std::fs::write(temp.path().join("notes.txt"), b"skip").unwrap();

    rawcache()
        .arg("scan")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Raw files: 1 total"))
        .stdout(predicate::str::contains("shot.nef"))
        .stdout(predicate::str::contains("notes.txt").not());
}

#[test]
fn scan_json_is_parseable() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("shot.arw"), vec![0u8; 64]).unwrap();

    let output = rawcache()
        .arg("scan")
        .arg(temp.path())
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let entries: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["size_bytes"], 64);
}

#[test]
fn scan_json_of_empty_dir_is_an_empty_array() {
    let temp = TempDir::new().unwrap();
    let output = rawcache()
        .arg("scan")
        .arg(temp.path())
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let entries: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert!(entries.as_array().unwrap().is_empty());
}

#[test]
fn probe_fails_on_a_missing_file() {
    rawcache()
        .arg("probe")
        .arg("/nonexistent/missing.nef")
        .assert()
        .failure();
}

#[test]
fn probe_fails_on_a_file_that_is_not_raw() {
    let temp = TempDir::new().unwrap();
    let bogus = temp.path().join("bogus.nef");
    std::fs::write(&bogus, b"this is not a raw file").unwrap();

    rawcache().arg("probe").arg(&bogus).assert().failure();
}

#[test]
fn config_show_prints_both_sections() {
    rawcache()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[decode]"))
        .stdout(predicate::str::contains("[scan]"));
}

#[test]
fn warm_on_an_empty_directory_exits_cleanly() {
    let temp = TempDir::new().unwrap();
    rawcache()
        .arg("warm")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No raw files found"));
}

#[test]
fn warm_reports_undecodable_files_as_unfinished() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("broken.nef"), b"garbage").unwrap();

    let output = rawcache()
        .arg("warm")
        .arg(temp.path())
        .args(["--idle-timeout", "1", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(report["files"], 1);
    assert_eq!(report["previews_loaded"], 0);
    assert_eq!(report["unfinished"], 1);
    assert_eq!(report["stalled"], true);
}

#[test]
fn completions_generate_for_bash() {
    rawcache()
        .args(["completions", "--shell", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rawcache"));
}
