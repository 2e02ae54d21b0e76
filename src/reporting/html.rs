//! # HTML Reporting Module / HTML 报告模块
//!
//! This module renders an HTML report of a matrix run: summary counts, a
//! per-cell results table and the captured output of failing steps.
//!
//! 此模块渲染矩阵运行的 HTML 报告：摘要计数、每单元结果表格以及失败步骤的捕获输出。

use anyhow::{Context, Result};
use chrono::Utc;
use maud::{DOCTYPE, Markup, html};
use std::fs;
use std::path::Path;

use crate::core::models::{CellReport, RunResult};

/// Embedded CSS styles for HTML reports / HTML 报告的嵌入式 CSS 样式
const HTML_STYLE: &str = "\
body { font-family: sans-serif; margin: 2em; color: #222; }\n\
table { border-collapse: collapse; width: 100%; }\n\
th, td { border: 1px solid #ccc; padding: 6px 10px; text-align: left; }\n\
th { background: #f0f0f0; }\n\
.summary { display: flex; gap: 2em; margin: 1em 0; }\n\
.summary .count { font-size: 1.6em; font-weight: bold; display: block; }\n\
.pass { color: #1a7f37; }\n\
.fail { color: #cf222e; }\n\
.diag { color: #9a6700; }\n\
pre.output { background: #f6f8fa; padding: 1em; overflow-x: auto; }\n\
";

/// Generates an HTML report from the cell reports.
///
/// # Arguments / 参数
/// * `reports` - The cell reports to render / 要渲染的单元报告
/// * `output_path` - Where the HTML file is written / HTML 文件写入位置
pub fn generate_html_report(reports: &[CellReport], output_path: &Path) -> Result<()> {
    let passed = reports.iter().filter(|r| r.succeeded()).count();
    let failed = reports.len() - passed;
    let regenerated = reports.iter().filter(|r| r.regenerate.is_some()).count();

    let markup: Markup = html! {
        (DOCTYPE)
        html {
            head {
                title { "Baseline Matrix Report" }
                style { (maud::PreEscaped(HTML_STYLE)) }
            }
            body {
                h1 { "Baseline Matrix Report" }
                p { "Generated at " (Utc::now().to_rfc3339()) }
                div class="summary" {
                    div { span class="count" { (reports.len()) } "cells" }
                    div { span class="count pass" { (passed) } "passed" }
                    div { span class="count fail" { (failed) } "failed" }
                    div { span class="count diag" { (regenerated) } "regenerated" }
                }
                table {
                    thead {
                        tr {
                            th { "Cell" }
                            th { "Verdict" }
                            th { "Standard" }
                            th { "Visual" }
                            th { "Regenerated" }
                            th { "Archive" }
                            th { "Duration" }
                        }
                    }
                    tbody {
                        @for report in reports {
                            (cell_row(report))
                        }
                    }
                }
                @for report in reports.iter().filter(|r| !r.succeeded() || r.has_diagnostics()) {
                    (cell_details(report))
                }
            }
        }
    };

    fs::write(output_path, markup.into_string())
        .with_context(|| format!("Failed to write HTML report: {}", output_path.display()))?;
    Ok(())
}

fn cell_row(report: &CellReport) -> Markup {
    let regen_str = match &report.regenerate {
        None => "-",
        Some(r) if r.succeeded => "yes",
        Some(_) => "error",
    };
    html! {
        tr {
            td { (report.cell.label()) }
            td class=(verdict_class(report.succeeded())) {
                (if report.succeeded() { "PASSED" } else { "FAILED" })
            }
            td class=(verdict_class(report.standard.succeeded)) { (step_str(&report.standard)) }
            td class=(verdict_class(report.visual.succeeded)) { (step_str(&report.visual)) }
            td { (regen_str) }
            td {
                @if report.archive.archived {
                    (report.archive.file_count) " file(s)"
                } @else {
                    span class="fail" { "failed" }
                }
            }
            td { (format!("{:.1}s", report.duration.as_secs_f64())) }
        }
    }
}

fn cell_details(report: &CellReport) -> Markup {
    html! {
        h2 { "Cell " (report.cell.label()) }
        @if let Some(error) = &report.collection_error {
            h3 class="fail" { "Collection error" }
            pre class="output" { (error) }
        }
        @if !report.standard.succeeded && report.collection_error.is_none() {
            (step_details("Standard suite", &report.standard))
        }
        @if !report.visual.succeeded {
            (step_details("Visual suite", &report.visual))
        }
        @if let Some(regen) = &report.regenerate {
            @if !regen.succeeded {
                (step_details("Baseline regeneration (diagnostics only)", regen))
            }
        }
    }
}

fn step_details(header: &str, result: &RunResult) -> Markup {
    html! {
        h3 { (header) }
        p { code { (result.command) } }
        pre class="output" { (result.output) }
    }
}

fn step_str(result: &RunResult) -> &'static str {
    if result.succeeded { "pass" } else { "fail" }
}

fn verdict_class(ok: bool) -> &'static str {
    if ok { "pass" } else { "fail" }
}
