//! # Console Reporting Module / 控制台报告模块
//!
//! This module prints the end-of-run matrix summary and, for failing cells,
//! the captured output of every failing step.
//!
//! 此模块打印运行结束时的矩阵摘要，以及失败单元中每个失败步骤的捕获输出。

use crate::core::models::{CellReport, RunResult};
use colored::*;

/// Prints a formatted summary of all cell reports to the console.
/// One row per cell: verdict, cell label, the standard/visual/regenerate step
/// outcomes, the archived file count and the wall time.
///
/// 在控制台打印所有单元报告的格式化摘要。
/// 每个单元一行：判定、单元标签、各步骤结果、归档文件数和挂钟时间。
///
/// # Output Format / 输出格式
/// ```text
/// --- Matrix Summary ---
///   - PASSED | ubuntu-latest/3.10  | standard pass | visual pass | regen -    | archive 0 file(s)  |    12.3s
///   - FAILED | ubuntu-latest/3.11  | standard pass | visual FAIL | regen done | archive 14 file(s) |    48.9s
/// ```
pub fn print_summary(reports: &[CellReport]) {
    println!("\n{}", "--- Matrix Summary ---".bold());

    for report in reports {
        let verdict = if report.succeeded() {
            "PASSED".green()
        } else {
            "FAILED".red()
        };

        let regen_str = match &report.regenerate {
            None => "-".to_string(),
            Some(r) if r.succeeded => "done".to_string(),
            Some(_) => "error".to_string(),
        };
        let archive_str = if report.archive.archived {
            format!("{} file(s)", report.archive.file_count)
        } else {
            "FAILED".to_string()
        };

        println!(
            "  - {} | {:<24} | standard {} | visual {} | regen {:<5} | archive {:<12} | {:>8.1}s",
            verdict,
            report.cell.label(),
            step_verdict(&report.standard),
            step_verdict(&report.visual),
            regen_str,
            archive_str,
            report.duration.as_secs_f64(),
        );
    }
}

fn step_verdict(result: &RunResult) -> ColoredString {
    if result.succeeded {
        "pass".green()
    } else {
        "FAIL".red()
    }
}

/// Prints detailed information about every failing cell: which steps failed,
/// the rendered command lines and the full captured output. Regeneration and
/// archival problems are shown as diagnostics underneath, since they never
/// decide the verdict.
///
/// 打印每个失败单元的详细信息：哪些步骤失败、渲染后的命令行以及完整的捕获输出。
/// 再生成与归档的问题作为诊断信息显示在下方，它们从不决定判定结果。
pub fn print_failure_details(reports: &[&CellReport]) {
    if reports.is_empty() {
        return;
    }

    println!("\n{}", "--- Failing Cells ---".red().bold());
    println!("{}", "-".repeat(80));

    for (i, report) in reports.iter().enumerate() {
        println!(
            "[{}/{}] {} '{}'",
            i + 1,
            reports.len(),
            "Cell failed:".red(),
            report.cell.label().cyan()
        );

        if let Some(error) = &report.collection_error {
            println!("\n--- {} ---\n", "Collection Error".yellow());
            println!("{error}");
        }

        if !report.standard.succeeded && report.collection_error.is_none() {
            print_step_log("Standard Suite Log", &report.standard);
        }
        if !report.visual.succeeded {
            print_step_log("Visual Suite Log", &report.visual);
        }
        if let Some(regen) = &report.regenerate
            && !regen.succeeded
        {
            print_step_log("Baseline Regeneration Log (diagnostics only)", regen);
        }
        if !report.archive.archived {
            println!(
                "\n{} {}",
                "Archival failed for".yellow(),
                report.archive.dest_path.display()
            );
        }

        println!("\n{}", "-".repeat(80));
    }
}

fn print_step_log(header: &str, result: &RunResult) {
    println!("\n--- {} ---\n", header.yellow());
    println!("$ {}", result.command);
    match result.exit_code {
        Some(code) => println!("exit code: {code}"),
        None => println!("exit code: <none>"),
    }
    if !result.output.trim().is_empty() {
        println!("{}", result.output.trim_end());
    }
}
