//! Concurrency tests for the nutri binary.
//!
//! These tests verify that multiple processes can safely:
//! - Append entries to the same store simultaneously (file locking)
//! - List entries while others are writing

use assert_cmd::Command;
use std::path::Path;
use std::thread;
use std::time::Duration;
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
        .args(["--height-cm", "175", "--weight-kg", "72", "--age-years", "28"])
        .args(["--gender", "female", "--activity-level", "very"])
        .args(["--name", name, "--save"])
        .timeout(Duration::from_secs(10))
        .assert()
        .success();
}

fn stored_names(data_dir: &Path) -> Vec<String> {
    let contents =
        std::fs::read_to_string(data_dir.join("users.json")).expect("Failed to read store");
    let entries: Vec<serde_json::Value> =
        serde_json::from_str(&contents).expect("Store contains invalid JSON");
    entries
        .iter()
        .map(|e| e["name"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[test]
fn test_sequential_saves_accumulate() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    for i in 0..5 {
        save_entry(&data_dir, &format!("user{}", i));
    }

    let names = stored_names(&data_dir);
    assert_eq!(names, vec!["user0", "user1", "user2", "user3", "user4"]);
}

#[test]
fn test_no_lost_entries_under_concurrent_saves() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    // Every process rewrites the whole file; none may clobber another
    let handles: Vec<_> = (0..10)
        .map(|i| {
            let data_dir = data_dir.clone();
            thread::spawn(move || save_entry(&data_dir, &format!("writer{}", i)))
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    let mut names = stored_names(&data_dir);
    names.sort();
    let mut expected: Vec<_> = (0..10).map(|i| format!("writer{}", i)).collect();
    expected.sort();
    assert_eq!(names, expected, "Expected all 10 concurrent entries to survive");
}

#[test]
fn test_listing_while_writing() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    save_entry(&data_dir, "initial");

    let writer_dir = data_dir.clone();
    let writer = thread::spawn(move || {
        for i in 0..3 {
            save_entry(&writer_dir, &format!("later{}", i));
        }
    });

    // Readers never see a torn file
    for _ in 0..5 {
        cli()
            .arg("list")
            .arg("--data-dir")
            .arg(&data_dir)
            .timeout(Duration::from_secs(10))
            .assert()
            .success();
        thread::sleep(Duration::from_millis(5));
    }

    writer.join().expect("Writer thread panicked");

    assert_eq!(stored_names(&data_dir).len(), 4);

    // Only the store and its lock file remain
    let mut files: Vec<_> = std::fs::read_dir(&data_dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    files.sort();
    assert_eq!(files, vec!["users.json", "users.json.lock"]);
}
