// Shared test helpers for integration tests
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

use baseline_runner::core::config::{CommandTemplates, MatrixAxes, MatrixConfig, SuiteConfig};

/// Creates a temporary project with a small discoverable suite:
/// two standard tests and one visual test carrying the marker.
pub fn setup_project() -> TempDir {
    let temp_dir = tempdir().expect("Failed to create temporary directory");
    write_sample_suite(temp_dir.path());
    temp_dir
}

pub fn write_sample_suite(project_root: &Path) {
    let tests_dir = project_root.join("tests");
    fs::create_dir_all(&tests_dir).expect("Failed to create tests directory");

    let core_tests = r#"
def test_addition():
    assert 1 + 1 == 2

def test_subtraction():
    assert 2 - 1 == 1
"#;
    fs::write(tests_dir.join("test_core.py"), core_tests).expect("Failed to write test_core.py");

    let plot_tests = r#"
import pytest

@pytest.mark.mpl_image_compare(baseline_dir="remote_baseline")
def test_energy_plot():
    return make_figure()
"#;
    fs::write(tests_dir.join("test_plots.py"), plot_tests).expect("Failed to write test_plots.py");
}

/// A single-cell matrix configuration with the given command templates.
/// The suite layout uses the defaults (tests/, tests/remote_baseline,
/// artifacts/), all relative to the project root.
pub fn single_cell_config(standard: &str, visual: &str, generate: &str) -> MatrixConfig {
    MatrixConfig {
        matrix: MatrixAxes {
            os: vec!["linux-ci".to_string()],
            runtime: vec!["3.11".to_string()],
        },
        suite: SuiteConfig::default(),
        commands: CommandTemplates {
            standard: standard.to_string(),
            visual: visual.to_string(),
            generate: generate.to_string(),
        },
        deadline_secs: None,
    }
}

/// Writes a matrix configuration TOML for CLI-level tests and returns its path.
pub fn write_matrix_toml(
    dir: &Path,
    os_axis: &[&str],
    runtime_axis: &[&str],
    standard: &str,
    visual: &str,
    generate: &str,
) -> PathBuf {
    let config_path = dir.join("BaselineMatrix.toml");
    let os_list = toml_list(os_axis);
    let runtime_list = toml_list(runtime_axis);
    let content = format!(
        r#"[matrix]
os = [{os_list}]
runtime = [{runtime_list}]

[commands]
standard = {standard:?}
visual = {visual:?}
generate = {generate:?}
"#
    );
    fs::write(&config_path, content).expect("Failed to write BaselineMatrix.toml");
    config_path
}

fn toml_list(items: &[&str]) -> String {
    items
        .iter()
        .map(|item| format!("{item:?}"))
        .collect::<Vec<_>>()
        .join(", ")
}
