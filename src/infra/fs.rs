//! # File System Operations Module / 文件系统操作模块
//!
//! This module provides utilities for file system operations,
//! such as copying baseline directories into the archive and counting
//! the files an archive entry holds.
//!
//! 此模块提供文件系统操作的实用功能，
//! 如将基准目录复制到归档以及统计归档条目包含的文件数。

use anyhow::{Context, Result};
use fs_extra::dir::{CopyOptions, copy};
use std::fs;
use std::path::{Path, PathBuf};

/// Copies the entire content of a source directory into a destination
/// directory, overwriting anything already there.
///
/// # Arguments
/// * `from` - Source directory path
/// * `to` - Destination directory path
pub fn copy_dir_all(from: &Path, to: &Path) -> Result<()> {
    let mut options = CopyOptions::new();
    options.overwrite = true;
    options.content_only = true;
    copy(from, to, &options).with_context(|| {
        format!(
            "Failed to copy directory {} to {}",
            from.display(),
            to.display()
        )
    })?;
    Ok(())
}

/// Creates a directory and all missing parents.
pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("Failed to create directory: {}", path.display()))
}

/// Counts the regular files under a directory, recursively.
/// A missing path counts as zero rather than an error; the archiver treats
/// an absent baseline directory as an empty artifact set.
pub fn count_files(path: &Path) -> usize {
    let mut count = 0;
    let Ok(entries) = fs::read_dir(path) else {
        return 0;
    };
    for entry in entries.flatten() {
        let entry_path = entry.path();
        if entry_path.is_dir() {
            count += count_files(&entry_path);
        } else {
            count += 1;
        }
    }
    count
}

/// Checks if a path exists and is a directory.
pub fn is_directory(path: &Path) -> bool {
    path.exists() && path.is_dir()
}

/// Gets the absolute path from a potentially relative path.
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path).with_context(|| format!("Failed to resolve path: {}", path.display()))
}
