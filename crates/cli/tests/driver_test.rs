//! End-to-end tests for the iter-dist driver and the iter-dist-report tool,
//! run as real processes inside throwaway directories.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use uuid::Uuid;

use iterdist_core::{parse_log, SchedulePolicy};

// ============================================================================
// Test Helpers
// ============================================================================

/// Create a unique temp directory for each test.
fn test_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("iterdist-test-{}", Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn command(bin: &str, dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new(bin);
    cmd.args(args)
        .current_dir(dir)
        .env_remove("ITERDIST_LOG_FILE")
        .env_remove("ITERDIST_PAYLOAD_SCALE")
        .env_remove("RUST_LOG");
    cmd
}

fn run(bin: &str, dir: &Path, args: &[&str]) -> Output {
    command(bin, dir, args).output().unwrap()
}

fn driver(dir: &Path, args: &[&str]) -> Output {
    run(env!("CARGO_BIN_EXE_iter-dist"), dir, args)
}

fn report(dir: &Path, args: &[&str]) -> Output {
    run(env!("CARGO_BIN_EXE_iter-dist-report"), dir, args)
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

// ============================================================================
// Driver
// ============================================================================

#[test]
fn invalid_values_fall_back_to_defaults() {
    let dir = test_dir();
    let output = driver(&dir, &["abc", "0"]);
    assert!(output.status.success(), "{:?}", output);

    let out = stdout(&output);
    assert!(out.contains("num_iterations is set to default: 65"));
    assert!(out.contains("num_threads is set to default: 4"));

    let text = std::fs::read_to_string(dir.join("logs.txt")).unwrap();
    let sections = parse_log(&text).unwrap();
    let policies: Vec<SchedulePolicy> = sections.iter().map(|s| s.policy).collect();
    assert_eq!(policies, SchedulePolicy::comparison_set());

    for section in &sections {
        assert_eq!(section.events.len(), 65, "{}", section.policy.label());
        let indices: HashSet<usize> = section.events.iter().map(|e| e.iteration).collect();
        assert_eq!(indices, (0..65).collect::<HashSet<_>>());
        assert!(section.events.iter().all(|e| e.worker < 4));
    }

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn wrong_argument_count_exits_with_one() {
    let dir = test_dir();

    let output = driver(&dir, &["10"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("<num_iterations> <num_threads>"));
    assert!(!dir.join("logs.txt").exists());

    let output = driver(&dir, &[]);
    assert_eq!(output.status.code(), Some(1));

    let output = driver(&dir, &["1", "2", "3"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(!dir.join("logs.txt").exists());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn negative_values_are_values_not_flags() {
    let dir = test_dir();
    let output = driver(&dir, &["-5", "2"]);
    assert!(output.status.success(), "{:?}", output);
    assert!(stdout(&output).contains("num_iterations is set to default: 65"));
    assert!(!stdout(&output).contains("num_threads is set to default"));
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn hyphen_prefixed_garbage_falls_back() {
    let dir = test_dir();

    let output = driver(&dir, &["-abc", "4"]);
    assert!(output.status.success(), "{:?}", output);
    let out = stdout(&output);
    assert!(out.contains("num_iterations is set to default: 65"));
    assert!(!out.contains("num_threads is set to default"));
    let sections = parse_log(&std::fs::read_to_string(dir.join("logs.txt")).unwrap()).unwrap();
    assert!(sections.iter().all(|s| s.events.len() == 65));

    let output = driver(&dir, &["10", "-x"]);
    assert!(output.status.success(), "{:?}", output);
    let out = stdout(&output);
    assert!(out.contains("num_threads is set to default: 4"));
    assert!(!out.contains("num_iterations is set to default"));
    let sections = parse_log(&std::fs::read_to_string(dir.join("logs.txt")).unwrap()).unwrap();
    assert!(sections.iter().all(|s| s.events.len() == 10));
    assert!(sections.iter().flat_map(|s| &s.events).all(|e| e.worker < 4));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn log_file_from_environment() {
    let dir = test_dir();
    let output = command(env!("CARGO_BIN_EXE_iter-dist"), &dir, &["12", "2"])
        .env("ITERDIST_LOG_FILE", "env.log")
        .output()
        .unwrap();
    assert!(output.status.success(), "{:?}", output);
    assert!(dir.join("env.log").exists());
    assert!(!dir.join("logs.txt").exists());

    // The flag wins over the environment.
    let output = command(
        env!("CARGO_BIN_EXE_iter-dist"),
        &dir,
        &["--log-file", "flag.log", "12", "2"],
    )
    .env("ITERDIST_LOG_FILE", "env.log")
    .output()
    .unwrap();
    assert!(output.status.success(), "{:?}", output);
    assert!(dir.join("flag.log").exists());

    let output = command(env!("CARGO_BIN_EXE_iter-dist-report"), &dir, &["--json"])
        .env("ITERDIST_LOG_FILE", "env.log")
        .output()
        .unwrap();
    assert!(output.status.success(), "{:?}", output);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn custom_log_path_and_summary() {
    let dir = test_dir();
    let output = driver(&dir, &["40", "3", "--log-file", "dist.log", "--summary"]);
    assert!(output.status.success(), "{:?}", output);

    let out = stdout(&output);
    assert_eq!(out.lines().filter(|l| l.contains("imbalance=")).count(), 7);
    assert!(!dir.join("logs.txt").exists());

    let text = std::fs::read_to_string(dir.join("dist.log")).unwrap();
    let sections = parse_log(&text).unwrap();
    assert_eq!(sections.len(), 7);
    assert!(sections.iter().all(|s| s.events.len() == 40));
    assert!(sections
        .iter()
        .flat_map(|s| &s.events)
        .all(|e| e.worker < 3));

    std::fs::remove_dir_all(&dir).ok();
}

// ============================================================================
// Report
// ============================================================================

#[test]
fn report_reads_driver_output_as_json() {
    let dir = test_dir();
    assert!(driver(&dir, &["32", "4"]).status.success());

    let output = report(&dir, &["--json"]);
    assert!(output.status.success(), "{:?}", output);
    let reports: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let reports = reports.as_array().unwrap();
    assert_eq!(reports.len(), 7);
    assert_eq!(reports[0]["label"], "Default schedule");
    assert_eq!(reports[0]["events"], 32);
    // Default splits 32 over 4 evenly, one block each.
    assert_eq!(reports[0]["imbalance"], 1.0);
    assert_eq!(reports[0]["observed_chunks"]["0"], 1);
    assert_eq!(reports[2]["label"], "Static schedule, chunk=4");
    assert_eq!(reports[2]["observed_chunks"]["1"], 2);

    assert!(dir.join("logs.txt").exists());
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn report_text_and_removal() {
    let dir = test_dir();
    assert!(driver(&dir, &["20", "2"]).status.success());

    let output = report(&dir, &["--remove-log-file"]);
    assert!(output.status.success(), "{:?}", output);
    let out = stdout(&output);
    assert!(out.contains("Guided schedule, chunk=4 (20 iterations"));
    assert!(out.contains("thread   0"));
    assert!(!dir.join("logs.txt").exists());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn report_on_missing_log_fails() {
    let dir = test_dir();
    let output = report(&dir, &[]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Log file does not exist"));
    std::fs::remove_dir_all(&dir).ok();
}
