//! End-to-end tests for the `tc` binary
//!
//! Every run gets its own temp dir for logs, config lookup and the text
//! mirror, and publishes to stdout so no clipboard tool is needed.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn tc(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tc").expect("binary built");
    cmd.current_dir(home)
        .env("HOME", home)
        .env("XDG_DATA_HOME", home.join("data"))
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("TMPDIR", home)
        .env("NO_COLOR", "1");
    cmd
}

fn write_input(home: &Path, text: &str) -> String {
    let path = home.join("input.txt");
    std::fs::write(&path, text).expect("write input");
    path.to_string_lossy().to_string()
}

#[test]
fn test_help() {
    let temp = TempDir::new().unwrap();
    tc(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--chunk-size"))
        .stdout(predicate::str::contains("--tail"));
}

#[test]
fn test_empty_file_fails() {
    let temp = TempDir::new().unwrap();
    let input = write_input(temp.path(), "");
    tc(temp.path())
        .args(["--sink", "stdout", &input])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No text loaded"));
}

#[test]
fn test_head_mode_navigation() {
    let temp = TempDir::new().unwrap();
    let input = write_input(temp.path(), "ABCDEFGHIJ");
    tc(temp.path())
        .args(["-s", "3", "--sink", "stdout", "--no-dedup", "--no-mirror", &input])
        .write_stdin("n\nn\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("ABC"))
        .stdout(predicate::str::contains("DEF"))
        .stdout(predicate::str::contains("GHI"))
        .stdout(predicate::str::contains("Chunk 3/4"));
}

#[test]
fn test_tail_dedup_session_auto_exits() {
    let temp = TempDir::new().unwrap();
    let input = write_input(temp.path(), "ABCDEFGHIJ");
    tc(temp.path())
        .args(["-t", "-s", "3", "--sink", "stdout", "--no-mirror", &input])
        .write_stdin("\n\n\n\n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("HIJ"))
        .stdout(predicate::str::contains("BCD"))
        .stdout(predicate::str::contains("All chunks processed"))
        .stdout(predicate::str::contains("Processed 4/4 chunks"));
}

#[test]
fn test_single_chunk_completes_immediately() {
    let temp = TempDir::new().unwrap();
    let input = write_input(temp.path(), "short text");
    tc(temp.path())
        .args(["-s", "100", "--sink", "stdout", "--no-mirror", &input])
        .assert()
        .success()
        .stdout(predicate::str::contains("short text"))
        .stdout(predicate::str::contains("Session completed successfully!"));
}

#[test]
fn test_resize_and_mirror() {
    let temp = TempDir::new().unwrap();
    let input = write_input(temp.path(), "ABCDEFGHIJ");
    tc(temp.path())
        .args(["-s", "3", "--sink", "stdout", &input])
        .write_stdin("$99\n$5\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid chunk size 99"))
        .stdout(predicate::str::contains("Changing chunk size from 3 to 5 bytes"))
        .stdout(predicate::str::contains("Temp file preserved at:"));

    let mirrored: Vec<_> = std::fs::read_dir(temp.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with("textchunker_"))
        .collect();
    assert_eq!(mirrored.len(), 1);
    assert_eq!(std::fs::read(mirrored[0].path()).unwrap(), b"ABCDEFGHIJ");
}

#[test]
fn test_config_file_sets_chunk_size() {
    let temp = TempDir::new().unwrap();
    let input = write_input(temp.path(), "ABCDEFGHIJ");
    let config = temp.path().join("custom.yml");
    std::fs::write(&config, "chunk_size: 4\nsink: stdout\nmirror:\n  enabled: false\n").unwrap();

    tc(temp.path())
        .args(["-c", &config.to_string_lossy(), &input])
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Chunk 1/3"));
}
