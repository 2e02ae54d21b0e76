//! # Config Module Unit Tests / Config 模块单元测试
//!
//! Tests for configuration loading, serde defaults and command-template
//! rendering.
//!
//! 配置加载、serde 默认值与命令模板渲染的测试。

use baseline_runner::core::config::{self, MatrixConfig, TemplateContext};
use std::fs;
use tempfile::tempdir;

fn context<'a>() -> TemplateContext<'a> {
    TemplateContext {
        tests_root: "tests",
        marker: "mpl_image_compare",
        baseline_dir: "tests/remote_baseline",
        os: "ubuntu-latest",
        runtime: "3.11",
    }
}

mod parsing_tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let content = r#"
deadline_secs = 5400

[matrix]
os = ["ubuntu-latest", "macos-14"]
runtime = ["3.10", "3.11"]

[suite]
tests_root = "pkg/tests"
marker = "image_compare"
baseline_dir = "pkg/tests/baseline"
archive_dir = "out"

[commands]
standard = "pytest {tests_root} -m \"not {marker}\""
visual = "pytest {tests_root} -m \"{marker}\""
generate = "pytest {tests_root} --mpl-generate-path={baseline_dir}"
"#;
        let parsed: MatrixConfig = toml::from_str(content).unwrap();
        assert_eq!(parsed.matrix.os.len(), 2);
        assert_eq!(parsed.matrix.runtime, vec!["3.10", "3.11"]);
        assert_eq!(parsed.suite.marker, "image_compare");
        assert_eq!(parsed.suite.tests_root.to_str(), Some("pkg/tests"));
        assert_eq!(parsed.suite.archive_dir.to_str(), Some("out"));
        assert_eq!(parsed.deadline_secs, Some(5400));
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let content = r#"
[matrix]
os = ["ubuntu-latest"]
runtime = ["3.11"]
"#;
        let parsed: MatrixConfig = toml::from_str(content).unwrap();
        assert_eq!(parsed.suite.marker, "mpl_image_compare");
        assert_eq!(parsed.suite.tests_root.to_str(), Some("tests"));
        assert_eq!(
            parsed.suite.baseline_dir.to_str(),
            Some("tests/remote_baseline")
        );
        assert_eq!(parsed.suite.archive_dir.to_str(), Some("artifacts"));
        assert!(parsed.commands.standard.contains("not {marker}"));
        assert!(parsed.commands.generate.contains("--mpl-generate-path"));
        assert_eq!(parsed.deadline_secs, None);
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        let content = r#"
[matrix
os = ["ubuntu-latest"]
"#;
        assert!(toml::from_str::<MatrixConfig>(content).is_err());
    }

    #[test]
    fn test_missing_matrix_section_is_rejected() {
        let content = r#"
[suite]
marker = "mpl_image_compare"
"#;
        assert!(toml::from_str::<MatrixConfig>(content).is_err());
    }

    #[test]
    fn test_load_reports_missing_file() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = config::load(&missing).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_load_reads_file_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("BaselineMatrix.toml");
        fs::write(
            &path,
            "[matrix]\nos = [\"ubuntu-latest\"]\nruntime = [\"3.11\"]\n",
        )
        .unwrap();
        let (parsed, canonical) = config::load(&path).unwrap();
        assert_eq!(parsed.matrix.os, vec!["ubuntu-latest"]);
        assert!(canonical.is_absolute());
    }

    #[test]
    fn test_default_config_round_trips() {
        let rendered = config::default_config_toml();
        let parsed: MatrixConfig = toml::from_str(&rendered).unwrap();
        assert!(!parsed.matrix.os.is_empty());
        assert!(!parsed.matrix.runtime.is_empty());
        assert_eq!(parsed.suite.marker, "mpl_image_compare");
    }
}

mod template_tests {
    use super::*;

    #[test]
    fn test_render_substitutes_all_placeholders() {
        let rendered = config::render_template(
            "pytest {tests_root} -m \"not {marker}\" --os={os} --rt={runtime} --out={baseline_dir}",
            &context(),
        );
        assert_eq!(
            rendered,
            "pytest tests -m \"not mpl_image_compare\" --os=ubuntu-latest --rt=3.11 \
             --out=tests/remote_baseline"
        );
    }

    #[test]
    fn test_render_leaves_unknown_placeholders_untouched() {
        let rendered = config::render_template("pytest {tests_root} {unknown}", &context());
        assert_eq!(rendered, "pytest tests {unknown}");
    }

    #[test]
    fn test_render_without_placeholders_is_identity() {
        let rendered = config::render_template("pytest -x", &context());
        assert_eq!(rendered, "pytest -x");
    }
}
