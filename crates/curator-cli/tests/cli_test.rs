//! Command-line tests for the `curator` binary.
//!
//! Each run starts from an empty environment inside a temp directory, so no
//! `.env` file or real API key is picked up.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn curator(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_curator"));
    cmd.env_clear().current_dir(dir);
    cmd
}

fn is_empty_dir(dir: &Path) -> bool {
    fs::read_dir(dir).map(|mut d| d.next().is_none()).unwrap_or(false)
}

#[test]
fn test_missing_topic_is_usage_error() {
    let dir = TempDir::new().unwrap();

    curator(dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("a TOPIC is required"));
}

#[test]
fn test_blank_topic_is_usage_error() {
    let dir = TempDir::new().unwrap();

    curator(dir.path()).arg("   ").assert().code(2);
}

#[test]
fn test_missing_credentials_abort_without_output() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("output");
    fs::create_dir(&output).unwrap();

    curator(dir.path())
        .arg("Python decorators")
        .env("OUTPUT_DIR", &output)
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "Error: Configuration error: Missing required environment variables: \
             OPENAI_API_KEY, SERPER_API_KEY, GOOGLE_API_KEY",
        ));

    assert!(is_empty_dir(&output));
}

#[test]
fn test_partial_credentials_name_only_missing_keys() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("output");
    fs::create_dir(&output).unwrap();

    curator(dir.path())
        .args(["Rust", "--create-structure", "--no-balance"])
        .env("OPENAI_API_KEY", "sk-test")
        .env("OUTPUT_DIR", &output)
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Missing required environment variables: SERPER_API_KEY, GOOGLE_API_KEY",
        ));

    assert!(is_empty_dir(&output));
}

#[test]
fn test_unknown_tool_fails() {
    let dir = TempDir::new().unwrap();

    curator(dir.path())
        .args(["tool", "teleport", "now"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown tool: teleport"));
}

#[test]
fn test_validate_reports_placeholder_urls_offline() {
    let dir = TempDir::new().unwrap();
    let report = dir.path().join("course_Rust_20240309_140509.markdown");
    fs::write(
        &report,
        "**URL:** https://example.com/rust\n**URL:** https://site.dev/placeholder-link\n",
    )
    .unwrap();

    curator(dir.path())
        .args(["validate", "--json", "--pause-ms", "0"])
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::contains("https://example.com/rust"))
        .stdout(predicate::str::contains("\"fake\": 2"))
        .stdout(predicate::str::contains("\"reachable\": 0"));
}
