//! CLI-level tests driving the compiled `baseline-runner` binary against a
//! temporary project, asserting exit codes and summary output.
//!
//! 驱动已编译的 `baseline-runner` 二进制针对临时项目运行的 CLI 级测试，
//! 断言退出码与摘要输出。

#![cfg(unix)]

mod common;

use assert_cmd::prelude::*;
use common::{write_matrix_toml, write_sample_suite};
use predicates::prelude::*;
use std::process::Command;
use tempfile::tempdir;

/// Runs the full matrix with commands that always succeed and asserts the
/// command exits zero with the success banner.
#[test]
fn test_successful_run() {
    let project = tempdir().unwrap();
    write_sample_suite(project.path());
    let config_path = write_matrix_toml(
        project.path(),
        &["linux-ci"],
        &["3.11"],
        "true",
        "true",
        "touch {baseline_dir}/generated.png",
    );

    let mut cmd = Command::cargo_bin("baseline-runner").unwrap();
    cmd.arg("run")
        .arg("--config")
        .arg(&config_path)
        .arg("--project-dir")
        .arg(project.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("ALL MATRIX CELLS PASSED"));
}

/// A failing visual suite must fail the run, while the regenerated baselines
/// are archived under the cell identifier.
#[test]
fn test_visual_failure_sets_exit_code_and_archives() {
    let project = tempdir().unwrap();
    write_sample_suite(project.path());
    let config_path = write_matrix_toml(
        project.path(),
        &["linux-ci"],
        &["3.11"],
        "true",
        "false",
        "touch {baseline_dir}/generated.png",
    );

    let mut cmd = Command::cargo_bin("baseline-runner").unwrap();
    cmd.arg("run")
        .arg("--config")
        .arg(&config_path)
        .arg("--project-dir")
        .arg(project.path());

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("FAILED"))
        .stdout(predicate::str::contains("Visual Suite Log"));

    assert!(
        project
            .path()
            .join("artifacts/baseline-linux-ci-3.11/generated.png")
            .exists(),
        "artifacts must be inspectable even when the run failed"
    );
}

/// A missing configuration file is reported as an error.
#[test]
fn test_missing_config_file() {
    let project = tempdir().unwrap();

    let mut cmd = Command::cargo_bin("baseline-runner").unwrap();
    cmd.arg("run")
        .arg("--config")
        .arg(project.path().join("nope.toml"))
        .arg("--project-dir")
        .arg(project.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}

/// An axis filter not present in the matrix is rejected.
#[test]
fn test_unknown_axis_filter_is_rejected() {
    let project = tempdir().unwrap();
    write_sample_suite(project.path());
    let config_path = write_matrix_toml(
        project.path(),
        &["linux-ci"],
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
        .arg("--os")
        .arg("windows-2022");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("does not appear"));
}

/// `init --non-interactive` writes a default configuration file.
#[test]
fn test_init_non_interactive_writes_default_config() {
    let dir = tempdir().unwrap();

    let mut cmd = Command::cargo_bin("baseline-runner").unwrap();
    cmd.arg("init").arg("--non-interactive").current_dir(dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Created"));

    let written = std::fs::read_to_string(dir.path().join("BaselineMatrix.toml")).unwrap();
    assert!(written.contains("mpl_image_compare"));
    assert!(written.contains("[matrix]"));
}
