//! # Cell Execution Engine Module / 单元执行引擎模块
//!
//! This module drives the orchestration state machine for one matrix cell:
//! discover and run the standard suite, always run the visual suite,
//! regenerate baselines iff the visual suite failed, and archive the baseline
//! output unconditionally.
//!
//! 此模块驱动单个矩阵单元的编排状态机：
//! 发现并运行普通套件，始终运行视觉套件，
//! 当且仅当视觉套件失败时重新生成基准，并无条件归档基准输出。

use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::{
    core::{
        archive,
        config::{self, MatrixConfig, TemplateContext},
        models::{self, CellReport, CellState, RunResult, TestCell},
        selection,
    },
    infra::command,
};

/// The main entry point for orchestrating a single matrix cell.
///
/// Every transition of the state machine is taken unconditionally except
/// `VisualRun`, which branches on the visual run's outcome. In particular the
/// visual suite runs even when the standard suite (or test discovery) failed,
/// and the archive step runs even when everything before it failed or the
/// cell was cancelled mid-flight.
///
/// 编排单个矩阵单元的主入口。
/// 除了按视觉运行结果分支的 `VisualRun` 之外，状态机的每个转移都是无条件的。
/// 特别地：即使普通套件（或测试发现）失败，视觉套件也会运行；
/// 即使之前的一切都失败或单元被中途取消，归档步骤也会执行。
pub async fn run_cell(
    cell: TestCell,
    matrix_config: &MatrixConfig,
    project_root: &Path,
    cancel_token: CancellationToken,
) -> CellReport {
    let started = Instant::now();

    let tests_root = project_root.join(&matrix_config.suite.tests_root);
    let baseline_dir = project_root.join(&matrix_config.suite.baseline_dir);
    let archive_root = project_root.join(&matrix_config.suite.archive_dir);

    let tests_root_str = matrix_config.suite.tests_root.to_string_lossy().to_string();
    let baseline_dir_str = matrix_config.suite.baseline_dir.to_string_lossy().to_string();
    let template_ctx = TemplateContext {
        tests_root: &tests_root_str,
        marker: &matrix_config.suite.marker,
        baseline_dir: &baseline_dir_str,
        os: &cell.os_id,
        runtime: &cell.runtime_version,
    };

    let mut state = CellState::Init;
    let mut visual_failed = false;
    let mut collection_error = None;
    let mut subset_sizes = None;
    let mut standard: Option<RunResult> = None;
    let mut visual: Option<RunResult> = None;
    let mut regenerate: Option<RunResult> = None;
    let mut archive_entry = None;

    while state != CellState::Done {
        state = models::advance(state, visual_failed);
        match state {
            CellState::StandardRun => {
                match selection::discover(&tests_root, &matrix_config.suite.marker) {
                    Ok(collection) => {
                        log_step(
                            &cell,
                            &format!(
                                "discovered {} standard / {} visual tests",
                                collection.standard.len(),
                                collection.visual.len()
                            )
                            .normal(),
                        );
                        subset_sizes = Some((collection.standard.len(), collection.visual.len()));
                        standard = Some(
                            run_step(
                                "standard suite",
                                &matrix_config.commands.standard,
                                &template_ctx,
                                &cell,
                                project_root,
                                &cancel_token,
                            )
                            .await,
                        );
                    }
                    Err(e) => {
                        // Fatal for the standard run only. The visual suite
                        // still proceeds: the external tool applies the same
                        // marker filter on its own.
                        let message = format!("{e:#}");
                        log_step(
                            &cell,
                            &format!("test collection failed: {message}").red(),
                        );
                        collection_error = Some(message.clone());
                        standard = Some(RunResult::not_run(
                            matrix_config.commands.standard.clone(),
                            message,
                        ));
                    }
                }
            }
            CellState::VisualRun => {
                let result = run_step(
                    "visual suite",
                    &matrix_config.commands.visual,
                    &template_ctx,
                    &cell,
                    project_root,
                    &cancel_token,
                )
                .await;
                visual_failed = !result.succeeded;
                visual = Some(result);
            }
            CellState::Regenerate => {
                regenerate = Some(
                    regenerate_baselines(
                        matrix_config,
                        &template_ctx,
                        &cell,
                        project_root,
                        &baseline_dir,
                        &cancel_token,
                    )
                    .await,
                );
            }
            CellState::Skip => {
                log_step(&cell, &"visual suite passed; baselines unchanged".green());
            }
            CellState::Archive => {
                let entry = archive::archive_cell(&cell, &baseline_dir, &archive_root);
                if entry.archived {
                    log_step(
                        &cell,
                        &format!(
                            "archived {} file(s) under {}",
                            entry.file_count,
                            entry.dest_path.display()
                        )
                        .normal(),
                    );
                }
                archive_entry = Some(entry);
            }
            CellState::Init | CellState::Done => {}
        }
    }

    // The state machine visits every step before Done; the fallbacks are
    // unreachable but keep this path panic-free.
    CellReport {
        cell,
        collection_error,
        subset_sizes,
        standard: standard.unwrap_or_else(|| RunResult::not_run("", "standard step never ran")),
        visual: visual.unwrap_or_else(|| RunResult::not_run("", "visual step never ran")),
        regenerate,
        archive: archive_entry.unwrap_or_else(|| models::ArchiveEntry {
            cell_id: String::new(),
            source_path: PathBuf::new(),
            dest_path: PathBuf::new(),
            archived: false,
            file_count: 0,
        }),
        duration: started.elapsed(),
    }
}

/// Re-executes the visual selection in generate mode, so the external tool
/// writes fresh reference images into the baseline directory instead of
/// comparing against stored ones. Best-effort: the outcome is recorded and
/// reported but never escalates the cell's pass/fail status.
///
/// 以生成模式重新执行视觉选择，让外部工具将新的参考图像写入基准目录，
/// 而不是与已存储的基准进行比较。尽力而为：结果会被记录和报告，
/// 但绝不升级单元的通过/失败状态。
async fn regenerate_baselines(
    matrix_config: &MatrixConfig,
    template_ctx: &TemplateContext<'_>,
    cell: &TestCell,
    project_root: &Path,
    baseline_dir: &Path,
    cancel_token: &CancellationToken,
) -> RunResult {
    log_step(
        cell,
        &format!(
            "visual suite failed; regenerating baselines into {}",
            baseline_dir.display()
        )
        .yellow(),
    );

    if let Err(e) = crate::infra::fs::ensure_dir(baseline_dir) {
        let message = format!("{e:#}");
        log_step(cell, &format!("baseline regeneration failed: {message}").red());
        return RunResult::not_run(matrix_config.commands.generate.clone(), message);
    }

    let result = run_step(
        "baseline regeneration",
        &matrix_config.commands.generate,
        template_ctx,
        cell,
        project_root,
        cancel_token,
    )
    .await;

    if !result.succeeded {
        log_step(
            cell,
            &"baseline regeneration reported errors (diagnostics only)".yellow(),
        );
    }

    result
}

/// Renders a command template, spawns it and captures the outcome.
///
/// A non-zero exit status is encoded in the returned `RunResult`, never
/// raised. The step itself imposes no timeout; cancellation arrives only
/// through the orchestrator's token, and a cancelled step reports
/// `succeeded: false` with no exit code.
async fn run_step(
    step: &str,
    template: &str,
    template_ctx: &TemplateContext<'_>,
    cell: &TestCell,
    project_root: &Path,
    cancel_token: &CancellationToken,
) -> RunResult {
    let rendered = config::render_template(template, template_ctx);
    log_step(cell, &format!("running {step}: {rendered}").blue());

    let start = Instant::now();
    let expanded = match shellexpand::full(&rendered) {
        Ok(expanded) => expanded.to_string(),
        Err(e) => {
            return RunResult::not_run(rendered, format!("Failed to expand command: {e}"));
        }
    };

    let Some(parts) = shlex::split(&expanded) else {
        let message = format!("Failed to parse command: {expanded}");
        return RunResult::not_run(expanded, message);
    };
    if parts.is_empty() {
        return RunResult::not_run(expanded, "Empty command after parsing.");
    }

    let mut cmd = tokio::process::Command::new(&parts[0]);
    cmd.args(&parts[1..])
        .kill_on_drop(true)
        .current_dir(project_root)
        .env("MATRIX_OS", &cell.os_id)
        .env("MATRIX_RUNTIME", &cell.runtime_version);

    let (status_res, output) = tokio::select! {
        biased;
        _ = cancel_token.cancelled() => {
            log_step(cell, &format!("{step} cancelled").yellow());
            return RunResult {
                command: expanded,
                exit_code: None,
                output: "Cancelled before completion".to_string(),
                succeeded: false,
                duration: start.elapsed(),
            };
        }
        captured = command::spawn_and_capture(cmd) => captured,
    };
    let duration = start.elapsed();

    match status_res {
        Ok(status) => {
            let succeeded = status.success();
            let verdict = if succeeded {
                format!("{step} passed ({:.2}s)", duration.as_secs_f64()).green()
            } else {
                format!("{step} failed ({:.2}s)", duration.as_secs_f64()).red()
            };
            log_step(cell, &verdict);
            RunResult {
                command: expanded,
                exit_code: status.code(),
                output,
                succeeded,
                duration,
            }
        }
        Err(e) => {
            log_step(cell, &format!("{step} could not be run: {e}").red());
            RunResult {
                command: expanded,
                exit_code: None,
                output: format!("{output}Failed to run command: {e}\n"),
                succeeded: false,
                duration,
            }
        }
    }
}

/// One progress line, prefixed with the cell label so interleaved parallel
/// output stays attributable.
fn log_step(cell: &TestCell, message: &ColoredString) {
    println!("{} {}", format!("[{}]", cell.label()).cyan().bold(), message);
}
