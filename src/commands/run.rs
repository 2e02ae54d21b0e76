// src/commands/run.rs

use anyhow::{Result, bail};
use colored::*;
use futures::{StreamExt, stream};
use std::{path::PathBuf, sync::Arc, time::Duration};
use tokio::signal;
use tokio_util::sync::CancellationToken;

use crate::{
    core::{
        config::{self, MatrixConfig},
        execution::run_cell,
        models::CellReport,
        planner,
    },
    infra,
    reporting::{
        console::{print_failure_details, print_summary},
        html::generate_html_report,
        json::write_json_report,
    },
};

/// Options collected from the `run` subcommand's flags.
pub struct RunOptions {
    pub jobs: Option<usize>,
    pub config: PathBuf,
    pub project_dir: PathBuf,
    pub os: Option<String>,
    pub runtime: Option<String>,
    pub deadline_secs: Option<u64>,
    pub html: Option<PathBuf>,
    pub json: Option<PathBuf>,
}

pub async fn execute(options: RunOptions) -> Result<()> {
    let (matrix_config, config_path) = config::load(&options.config)?;
    let project_root = infra::fs::absolute_path(&options.project_dir)?;

    println!("Project root: {}", project_root.display());
    println!("Loading matrix from: {}", config_path.display());

    let plan = planner::expand(
        &matrix_config.matrix,
        options.os.as_deref(),
        options.runtime.as_deref(),
    )?;

    if plan.filtered_count > 0 {
        println!(
            "{}",
            format!(
                "Axis filters removed {} cell(s); {} remaining.",
                plan.filtered_count,
                plan.cells.len()
            )
            .cyan()
        );
    }

    if plan.cells.is_empty() {
        println!("{}", "No matrix cells to run.".green());
        return Ok(());
    }

    let cancel_token = setup_signal_handler();
    let deadline_secs = options.deadline_secs.or(matrix_config.deadline_secs);
    if let Some(secs) = deadline_secs {
        setup_deadline(secs, cancel_token.clone());
    }

    let jobs = options.jobs.unwrap_or(num_cpus::get() / 2 + 1);
    println!(
        "{}",
        format!(
            "Orchestrating {} matrix cell(s) with {} parallel job(s)...",
            plan.cells.len(),
            jobs
        )
        .bold()
    );

    let reports = run_cells(
        plan.cells,
        jobs,
        matrix_config,
        project_root,
        cancel_token,
    )
    .await;

    print_summary(&reports);

    if let Some(report_path) = &options.html {
        println!("\nGenerating HTML report at: {}", report_path.display());
        if let Err(e) = generate_html_report(&reports, report_path) {
            eprintln!("{} {}", "Failed to generate HTML report:".red(), e);
        }
    }
    if let Some(report_path) = &options.json {
        println!("Writing JSON report to: {}", report_path.display());
        if let Err(e) = write_json_report(&reports, report_path) {
            eprintln!("{} {}", "Failed to write JSON report:".red(), e);
        }
    }

    let failing: Vec<&CellReport> = reports.iter().filter(|r| !r.succeeded()).collect();
    if !failing.is_empty() {
        print_failure_details(&failing);
        bail!("{} of {} matrix cell(s) failed.", failing.len(), reports.len());
    }

    println!("\n{}", "ALL MATRIX CELLS PASSED".green().bold());
    Ok(())
}

/// Runs all cells as independent tasks with bounded parallelism.
///
/// Deliberately no fail-fast: cells share no state and one cell's failure
/// must never cancel or alter another cell's execution. The only cancellation
/// source is the shared token (Ctrl-C or the deadline), and even then each
/// cell still attempts its archive step.
async fn run_cells(
    cells: Vec<crate::core::models::TestCell>,
    jobs: usize,
    matrix_config: MatrixConfig,
    project_root: PathBuf,
    cancel_token: CancellationToken,
) -> Vec<CellReport> {
    let matrix_config = Arc::new(matrix_config);
    let project_root = Arc::new(project_root);

    let stream = stream::iter(cells.into_iter().map(|cell| {
        let matrix_config = Arc::clone(&matrix_config);
        let project_root = Arc::clone(&project_root);
        let cancel_token = cancel_token.clone();

        tokio::spawn(async move {
            run_cell(cell, &matrix_config, &project_root, cancel_token).await
        })
    }));

    let mut reports: Vec<CellReport> = stream
        .buffer_unordered(jobs)
        .filter_map(|joined| async move {
            match joined {
                Ok(report) => Some(report),
                // Only reachable when a cell task panicked.
                Err(e) => {
                    eprintln!("{} {}", "Cell task failed to complete:".red(), e);
                    None
                }
            }
        })
        .collect()
        .await;

    // Deterministic summary order regardless of completion order.
    reports.sort_by(|a, b| {
        (&a.cell.os_id, &a.cell.runtime_version).cmp(&(&b.cell.os_id, &b.cell.runtime_version))
    });
    reports
}

fn setup_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            println!(
                "\n{}",
                "Shutdown signal received; cancelling in-flight cells.".yellow()
            );
            token_clone.cancel();
        }
    });

    token
}

/// Arms the external wall-clock budget. When it elapses, in-flight steps are
/// cancelled but each cell's archive step is still attempted.
fn setup_deadline(secs: u64, token: CancellationToken) {
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(secs)).await;
        if !token.is_cancelled() {
            println!(
                "\n{}",
                format!("Deadline of {secs}s reached; cancelling in-flight cells.").yellow()
            );
            token.cancel();
        }
    });
}
