//! # Artifact Archival Module / 产物归档模块
//!
//! This module persists whatever the baseline output directory holds into a
//! per-cell archive entry. Archival runs exactly once per cell, no matter how
//! the earlier steps went, so regenerated baselines stay inspectable even on
//! total failure.
//!
//! 此模块将基准输出目录中的内容持久化为每单元的归档条目。
//! 无论之前的步骤结果如何，归档每个单元恰好执行一次，
//! 因此即使整体失败，重新生成的基准仍可供检查。

use crate::core::models::{ArchiveEntry, TestCell};
use crate::infra::fs;
use anyhow::Result;
use colored::*;
use std::path::Path;

/// Collects the baseline output directory into `archive_root/<artifact_id>`.
///
/// Best-effort: an archival failure is logged and reflected in the returned
/// entry, never raised, and never changes the cell's pass/fail status. An
/// absent or empty source directory archives as an empty artifact set.
///
/// 将基准输出目录收集到 `archive_root/<artifact_id>`。
/// 尽力而为：归档失败会被记录并反映在返回的条目中，绝不抛出，
/// 也绝不改变单元的通过/失败状态。源目录缺失或为空时归档为空产物集。
pub fn archive_cell(cell: &TestCell, source: &Path, archive_root: &Path) -> ArchiveEntry {
    let cell_id = cell.artifact_id();
    let dest = archive_root.join(&cell_id);

    match persist(source, &dest) {
        Ok(file_count) => ArchiveEntry {
            cell_id,
            source_path: source.to_path_buf(),
            dest_path: dest,
            archived: true,
            file_count,
        },
        Err(e) => {
            eprintln!(
                "{} [{}] {:#}",
                "Archival failed:".red(),
                cell.label().cyan(),
                e
            );
            ArchiveEntry {
                cell_id,
                source_path: source.to_path_buf(),
                dest_path: dest,
                archived: false,
                file_count: 0,
            }
        }
    }
}

/// Creates the entry directory and copies the source contents into it.
/// Returns the number of files the entry ends up holding.
fn persist(source: &Path, dest: &Path) -> Result<usize> {
    fs::ensure_dir(dest)?;
    if fs::is_directory(source) && fs::count_files(source) > 0 {
        fs::copy_dir_all(source, dest)?;
    }
    Ok(fs::count_files(dest))
}
