//! # Matrix Initialization Module / 矩阵初始化模块
//!
//! This module creates a new `BaselineMatrix.toml` configuration, either from
//! a short interactive wizard or, with `--non-interactive`, from the built-in
//! defaults. Existing configurations are only overwritten after confirmation.
//!
//! 此模块创建新的 `BaselineMatrix.toml` 配置：可通过简短的交互式向导，
//! 或使用 `--non-interactive` 直接写入内置默认值。
//! 已有配置只有在确认后才会被覆盖。

use anyhow::{Context, Result};
use colored::*;
use dialoguer::{Confirm, Input, theme::ColorfulTheme};
use std::fs;
use std::path::Path;

use crate::core::config::{self, CommandTemplates, MatrixAxes, MatrixConfig, SuiteConfig};

pub fn run_init_wizard(non_interactive: bool) -> Result<()> {
    let config_path = Path::new("BaselineMatrix.toml");
    let theme = ColorfulTheme::default();

    if !non_interactive {
        println!("\n{}", "Baseline Runner setup".cyan().bold());
        println!("This wizard creates a BaselineMatrix.toml for your project.");
    }

    if config_path.exists() && !non_interactive {
        let confirmation = Confirm::with_theme(&theme)
            .with_prompt(format!(
                "{} already exists. Overwrite it?",
                config_path.display()
            ))
            .default(false)
            .interact()
            .context("Failed to read confirmation")?;
        if !confirmation {
            println!("Aborted; existing configuration left untouched.");
            return Ok(());
        }
    }

    if non_interactive {
        write_config(config_path, &config::default_config_toml())?;
        return Ok(());
    }

    let os_axis: String = Input::with_theme(&theme)
        .with_prompt("OS identifiers (comma-separated)")
        .default("ubuntu-latest,macos-14".to_string())
        .interact_text()
        .context("Failed to read OS axis")?;

    let runtime_axis: String = Input::with_theme(&theme)
        .with_prompt("Runtime versions (comma-separated)")
        .default("3.10,3.11".to_string())
        .interact_text()
        .context("Failed to read runtime axis")?;

    let marker: String = Input::with_theme(&theme)
        .with_prompt("Visual-regression marker")
        .default("mpl_image_compare".to_string())
        .interact_text()
        .context("Failed to read marker")?;

    let baseline_dir: String = Input::with_theme(&theme)
        .with_prompt("Baseline output directory")
        .default("tests/remote_baseline".to_string())
        .interact_text()
        .context("Failed to read baseline directory")?;

    let matrix_config = MatrixConfig {
        matrix: MatrixAxes {
            os: parse_axis(&os_axis),
            runtime: parse_axis(&runtime_axis),
        },
        suite: SuiteConfig {
            marker,
            baseline_dir: baseline_dir.into(),
            ..SuiteConfig::default()
        },
        commands: CommandTemplates::default(),
        deadline_secs: None,
    };

    let rendered =
        toml::to_string_pretty(&matrix_config).context("Failed to serialize configuration")?;
    write_config(config_path, &rendered)
}

fn parse_axis(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect()
}

fn write_config(config_path: &Path, contents: &str) -> Result<()> {
    fs::write(config_path, contents)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!("{} {}", "Created".green(), config_path.display());
    Ok(())
}
