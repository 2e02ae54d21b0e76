use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::core::models::CellReport;

/// The machine-readable run report consumed by downstream CI tooling.
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Utc>,
    cells: &'a [CellReport],
}

/// Serializes all cell reports to a JSON file.
pub fn write_json_report(reports: &[CellReport], output_path: &Path) -> Result<()> {
    let report = JsonReport {
        generated_at: Utc::now(),
        cells: reports,
    };
    let rendered =
        serde_json::to_string_pretty(&report).context("Failed to serialize JSON report")?;
    fs::write(output_path, rendered)
        .with_context(|| format!("Failed to write JSON report: {}", output_path.display()))?;
    Ok(())
}
