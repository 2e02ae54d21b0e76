use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Represents the entire matrix configuration, loaded from a TOML file.
/// It contains the environment axes, the suite layout and the external
/// command templates.
/// 代表从 TOML 文件加载的整个矩阵配置。
/// 它包含环境轴、测试套件布局和外部命令模板。
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatrixConfig {
    /// The environment axes that are cross-producted into cells.
    /// 交叉乘积为单元的环境轴。
    pub matrix: MatrixAxes,
    /// Where the suite lives and which marker splits it.
    /// 套件所在位置以及用于划分它的标记。
    #[serde(default)]
    pub suite: SuiteConfig,
    /// The external test command templates.
    /// 外部测试命令模板。
    #[serde(default)]
    pub commands: CommandTemplates,
    /// Optional wall-clock budget for the whole run, in seconds.
    /// Cancelled cells still attempt their archive step.
    /// 整个运行的可选挂钟预算（秒）。被取消的单元仍会尝试其归档步骤。
    #[serde(default)]
    pub deadline_secs: Option<u64>,
}

/// The two environment axes of the matrix. A cell is one point of
/// `os` × `runtime`.
/// 矩阵的两个环境轴。一个单元是 `os` × `runtime` 中的一个点。
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatrixAxes {
    /// Operating system identifiers (e.g. "ubuntu-latest", "macos-14").
    /// 操作系统标识符（例如 "ubuntu-latest"、"macos-14"）。
    pub os: Vec<String>,
    /// Language-runtime version strings (e.g. "3.10", "3.11").
    /// 语言运行时版本字符串（例如 "3.10"、"3.11"）。
    pub runtime: Vec<String>,
}

/// Layout of the test suite on disk and the marker predicate that
/// partitions it into standard and visual subsets.
/// 测试套件在磁盘上的布局，以及将其划分为普通与视觉子集的标记谓词。
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SuiteConfig {
    /// Root path under which test files are discovered.
    /// 在其下发现测试文件的根路径。
    #[serde(default = "default_tests_root")]
    pub tests_root: PathBuf,
    /// Marker name identifying visual-regression tests.
    /// 标识视觉回归测试的标记名称。
    #[serde(default = "default_marker")]
    pub marker: String,
    /// Directory the generate-mode run writes reference images into.
    /// This is the single shared contract between regeneration and archival.
    /// 生成模式运行写入参考图像的目录。这是再生成与归档之间唯一的共享契约。
    #[serde(default = "default_baseline_dir")]
    pub baseline_dir: PathBuf,
    /// Root directory under which per-cell archive entries are created.
    /// 在其下创建每单元归档条目的根目录。
    #[serde(default = "default_archive_dir")]
    pub archive_dir: PathBuf,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            tests_root: default_tests_root(),
            marker: default_marker(),
            baseline_dir: default_baseline_dir(),
            archive_dir: default_archive_dir(),
        }
    }
}

/// The three external command templates. Placeholders `{tests_root}`,
/// `{marker}`, `{baseline_dir}`, `{os}` and `{runtime}` are substituted
/// before the command line is parsed. The exact command syntax belongs to
/// the external test tool, not to this crate.
/// 三个外部命令模板。占位符在解析命令行之前被替换。
/// 具体命令语法属于外部测试工具，而非本 crate。
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CommandTemplates {
    /// Runs the standard subset (marker excluded).
    /// 运行普通子集（排除标记）。
    #[serde(default = "default_standard_command")]
    pub standard: String,
    /// Runs the visual subset (marker included) in compare mode.
    /// 以比较模式运行视觉子集（包含标记）。
    #[serde(default = "default_visual_command")]
    pub visual: String,
    /// Re-runs the visual subset in generate mode, writing baselines
    /// into `{baseline_dir}` instead of comparing.
    /// 以生成模式重新运行视觉子集，将基准写入 `{baseline_dir}` 而非进行比较。
    #[serde(default = "default_generate_command")]
    pub generate: String,
}

impl Default for CommandTemplates {
    fn default() -> Self {
        Self {
            standard: default_standard_command(),
            visual: default_visual_command(),
            generate: default_generate_command(),
        }
    }
}

fn default_tests_root() -> PathBuf {
    PathBuf::from("tests")
}

fn default_marker() -> String {
    "mpl_image_compare".to_string()
}

fn default_baseline_dir() -> PathBuf {
    PathBuf::from("tests/remote_baseline")
}

fn default_archive_dir() -> PathBuf {
    PathBuf::from("artifacts")
}

fn default_standard_command() -> String {
    "pytest {tests_root} -m \"not {marker}\"".to_string()
}

fn default_visual_command() -> String {
    "pytest {tests_root} --mpl -m \"{marker}\"".to_string()
}

fn default_generate_command() -> String {
    "pytest {tests_root} -m \"{marker}\" --mpl-generate-path={baseline_dir}".to_string()
}

/// The substitution values for one cell's command templates.
/// 一个单元命令模板的替换值。
#[derive(Debug, Clone)]
pub struct TemplateContext<'a> {
    pub tests_root: &'a str,
    pub marker: &'a str,
    pub baseline_dir: &'a str,
    pub os: &'a str,
    pub runtime: &'a str,
}

/// Substitutes the known placeholders in a command template.
/// Unknown placeholders are left untouched for the external tool to see.
pub fn render_template(template: &str, ctx: &TemplateContext) -> String {
    template
        .replace("{tests_root}", ctx.tests_root)
        .replace("{marker}", ctx.marker)
        .replace("{baseline_dir}", ctx.baseline_dir)
        .replace("{os}", ctx.os)
        .replace("{runtime}", ctx.runtime)
}

/// Loads and parses the matrix configuration file.
/// Returns the parsed config together with the canonicalized path for
/// display purposes.
pub fn load(config_path_arg: &Path) -> Result<(MatrixConfig, PathBuf)> {
    let config_path = fs::canonicalize(config_path_arg).with_context(|| {
        format!(
            "Failed to read config file: {}",
            config_path_arg.display()
        )
    })?;

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

    let config: MatrixConfig = toml::from_str(&config_content)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

    Ok((config, config_path))
}

/// Produces the default configuration file contents written by `init`.
pub fn default_config_toml() -> String {
    let defaults = MatrixConfig {
        matrix: MatrixAxes {
            os: vec!["ubuntu-latest".to_string(), "macos-14".to_string()],
            runtime: vec!["3.10".to_string(), "3.11".to_string()],
        },
        suite: SuiteConfig::default(),
        commands: CommandTemplates::default(),
        deadline_secs: None,
    };
    // Serialization of the default config cannot fail.
    toml::to_string_pretty(&defaults).unwrap_or_default()
}
