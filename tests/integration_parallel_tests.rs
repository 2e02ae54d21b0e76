//! # Parallel Execution Integration Tests / 并行执行集成测试
//!
//! Tests for parallel cell execution: bounded parallelism, cell independence
//! (no fail-fast) and the per-cell archive namespace.
//!
//! 并行单元执行的测试：受限并行度、单元独立性（无快速失败）
//! 以及每单元的归档命名空间。

#![cfg(unix)]

mod common;

use assert_cmd::prelude::*;
use common::{write_matrix_toml, write_sample_suite};
use predicates::prelude::*;
use std::process::Command;
use std::time::Instant;
use tempfile::tempdir;

#[test]
fn test_parallel_execution_with_multiple_jobs() {
    let project = tempdir().unwrap();
    write_sample_suite(project.path());
    let config_path = write_matrix_toml(
        project.path(),
        &["linux-a", "linux-b"],
        &["3.10", "3.11"],
        "sh -c \"sleep 0.2\"",
        "true",
        "true",
    );

    let mut cmd = Command::cargo_bin("baseline-runner").unwrap();
    cmd.arg("run")
        .arg("--config")
        .arg(&config_path)
        .arg("--project-dir")
        .arg(project.path())
        .arg("--jobs")
        .arg("4");

    let start_time = Instant::now();
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("ALL MATRIX CELLS PASSED"));
    let duration = start_time.elapsed();

    assert!(
        duration.as_secs() < 30,
        "Parallel execution took too long: {:?}",
        duration
    );

    // Every cell owns its own archive entry.
    for cell_id in [
        "baseline-linux-a-3.10",
        "baseline-linux-a-3.11",
        "baseline-linux-b-3.10",
        "baseline-linux-b-3.11",
    ] {
        assert!(project.path().join("artifacts").join(cell_id).is_dir());
    }
}

/// One failing cell must not cancel or alter the other cells: the summary
/// reports every cell, and the passing cells still archive.
#[test]
fn test_cell_failure_does_not_propagate() {
    let project = tempdir().unwrap();
    write_sample_suite(project.path());
    // The {os} placeholder makes the standard suite fail only on `bad-os`.
    let config_path = write_matrix_toml(
        project.path(),
        &["good-os", "bad-os"],
        &["3.11"],
        "sh -c \"test {os} != bad-os\"",
        "true",
        "true",
    );

    let mut cmd = Command::cargo_bin("baseline-runner").unwrap();
    cmd.arg("run")
        .arg("--config")
        .arg(&config_path)
        .arg("--project-dir")
        .arg(project.path())
        .arg("--jobs")
        .arg("2");

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("PASSED").and(predicate::str::contains("FAILED")))
        .stderr(predicate::str::contains("1 of 2 matrix cell(s) failed"));

    // Both cells archived, independent of their verdicts.
    assert!(project.path().join("artifacts/baseline-good-os-3.11").is_dir());
    assert!(project.path().join("artifacts/baseline-bad-os-3.11").is_dir());
}

#[test]
fn test_single_job_execution() {
    let project = tempdir().unwrap();
    write_sample_suite(project.path());
    let config_path = write_matrix_toml(
        project.path(),
        &["linux-a", "linux-b"],
        &["3.11"],
        "true",
        "true",
        "true",
    );

    let mut cmd = Command::cargo_bin("baseline-runner").unwrap();
    cmd.arg("run")
        .arg("--config")
        .arg(&config_path)
        .arg("--project-dir")
        .arg(project.path())
        .arg("--jobs")
        .arg("1");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("ALL MATRIX CELLS PASSED"));
}

/// The deadline cancels in-flight cells, the run fails, and the archive
/// step is still attempted for every cell.
#[test]
fn test_deadline_cancels_but_still_archives() {
    let project = tempdir().unwrap();
    write_sample_suite(project.path());
    let config_path = write_matrix_toml(
        project.path(),
        &["linux-ci"],
        &["3.11"],
        "sh -c \"sleep 30\"",
        "sh -c \"sleep 30\"",
        "true",
    );

    let mut cmd = Command::cargo_bin("baseline-runner").unwrap();
    cmd.arg("run")
        .arg("--config")
        .arg(&config_path)
        .arg("--project-dir")
        .arg(project.path())
        .arg("--deadline-secs")
        .arg("1");

    let start_time = Instant::now();
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("Deadline of 1s reached"));

    assert!(
        start_time.elapsed().as_secs() < 25,
        "deadline did not interrupt the in-flight cell"
    );
    assert!(project.path().join("artifacts/baseline-linux-ci-3.11").is_dir());
}
