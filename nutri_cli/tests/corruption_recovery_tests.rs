//! Corruption recovery tests for the nutri binary.
//!
//! These tests verify the system can handle:
//! - Corrupted store files
//! - Missing data directories
//! - Empty files
//! - Unreadable store files

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("nutri"))
}

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

fn save_entry(data_dir: &Path, name: &str) {
    cli()
        .arg("calc")
        .arg("--data-dir")
        .arg(data_dir)
        .args(["--height-cm", "160", "--weight-kg", "55", "--age-years", "50"])
        .args(["--gender", "female", "--activity-level", "sedentary"])
        .args(["--name", name, "--save"])
        .assert()
        .success();
}

#[test]
fn test_corrupted_store_lists_as_empty() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    let store_path = data_dir.join("users.json");
    fs::write(&store_path, "{ invalid json }}}}").expect("Failed to write corrupted store");

    cli()
        .arg("list")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved entries yet."));

    // Listing leaves the damaged file alone
    assert_eq!(fs::read_to_string(&store_path).unwrap(), "{ invalid json }}}}");
}

#[test]
fn test_save_over_corrupted_store_recovers() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    fs::write(data_dir.join("users.json"), "[{\"name\": \"trunc").unwrap();

    save_entry(&data_dir, "fresh");

    cli()
        .arg("list")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved entries (1 of 1)"))
        .stdout(predicate::str::contains("fresh"));

    // The unreadable bytes were kept aside
    let backups: Vec<_> = fs::read_dir(&data_dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with("users.json.corrupt-"))
        .collect();
    assert_eq!(backups.len(), 1);
    assert_eq!(
        fs::read_to_string(backups[0].path()).unwrap(),
        "[{\"name\": \"trunc"
    );
}

#[test]
fn test_wrong_shape_json_is_treated_as_corrupt() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    // Valid JSON, but not an array of entries
    fs::write(data_dir.join("users.json"), r#"{"name": "not a list"}"#).unwrap();

    cli()
        .arg("list")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved entries yet."));
}

#[test]
fn test_missing_data_dir_is_created() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("does").join("not").join("exist");

    save_entry(&data_dir, "first");

    assert!(data_dir.join("users.json").exists());
}

#[test]
fn test_empty_store_file() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    fs::write(data_dir.join("users.json"), "").unwrap();

    save_entry(&data_dir, "after-empty");

    let contents = fs::read_to_string(data_dir.join("users.json")).unwrap();
    let parsed: Vec<serde_json::Value> = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed.len(), 1);
}

#[test]
fn test_unreadable_store_lists_as_empty() {
    // Skip on Windows (permission model is different)
    if cfg!(windows) {
        return;
    }

    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    let store_path = data_dir.join("users.json");
    fs::write(&store_path, "[]").unwrap();

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(&store_path).unwrap().permissions();
        perms.set_mode(0o000); // No permissions
        fs::set_permissions(&store_path, perms).unwrap();

        // Unreadable content degrades to an empty listing
        cli()
            .arg("list")
            .arg("--data-dir")
            .arg(&data_dir)
            .assert()
            .success()
            .stdout(predicate::str::contains("No saved entries yet."));

        // Clean up permissions for temp dir cleanup
        let mut perms = fs::metadata(&store_path).unwrap().permissions();
        perms.set_mode(0o644);
        fs::set_permissions(&store_path, perms).unwrap();
    }
}
