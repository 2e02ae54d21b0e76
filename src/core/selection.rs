//! # Test Selection Module / 测试选择模块
//!
//! This module discovers the test collection under a root path and partitions
//! it into the standard and visual subsets using the marker predicate. The two
//! subsets are disjoint and together cover the whole collection, in discovery
//! order.
//!
//! 此模块在根路径下发现测试集合，并使用标记谓词将其划分为普通与视觉两个子集。
//! 两个子集互不相交，合起来按发现顺序覆盖整个集合。

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};

/// One discovered test case.
/// 一个被发现的测试用例。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    /// The test function name.
    /// 测试函数名。
    pub name: String,
    /// The file the test was discovered in.
    /// 发现该测试的文件。
    pub path: PathBuf,
    /// Markers attached to the test, both per-function decorators and
    /// file-level `pytestmark` markers.
    /// 附加到该测试的标记，包括函数级装饰器和文件级 `pytestmark` 标记。
    pub markers: Vec<String>,
}

impl TestCase {
    pub fn has_marker(&self, marker: &str) -> bool {
        self.markers.iter().any(|m| m == marker)
    }
}

/// The full discovered collection, already partitioned by the marker
/// predicate.
/// 已按标记谓词划分的完整发现集合。
#[derive(Debug, Clone, Default)]
pub struct TestCollection {
    /// Tests without the visual marker.
    /// 不带视觉标记的测试。
    pub standard: Vec<TestCase>,
    /// Tests carrying the visual marker.
    /// 带有视觉标记的测试。
    pub visual: Vec<TestCase>,
}

impl TestCollection {
    pub fn len(&self) -> usize {
        self.standard.len() + self.visual.len()
    }

    pub fn is_empty(&self) -> bool {
        self.standard.is_empty() && self.visual.is_empty()
    }
}

/// Discovers all test cases under `tests_root` and partitions them by the
/// marker predicate: a case carrying `marker` is visual, every other case is
/// standard.
///
/// Fails when the root path is unreadable or when no tests are discovered at
/// all. Both conditions are fatal for the standard run of the affected cell;
/// the visual run still proceeds independently since the external tool applies
/// the same marker filter itself.
///
/// 发现 `tests_root` 下的所有测试用例并按标记谓词划分：
/// 带有 `marker` 的用例为视觉测试，其余为普通测试。
/// 根路径不可读或未发现任何测试时失败。
pub fn discover(tests_root: &Path, marker: &str) -> Result<TestCollection> {
    let mut files = Vec::new();
    collect_test_files(tests_root, &mut files).with_context(|| {
        format!(
            "Failed to read test root directory: {}",
            tests_root.display()
        )
    })?;
    // Deterministic discovery order across platforms.
    files.sort();

    let mut collection = TestCollection::default();
    for file in &files {
        let content = fs::read_to_string(file)
            .with_context(|| format!("Failed to read test file: {}", file.display()))?;
        for case in parse_test_file(file, &content) {
            if case.has_marker(marker) {
                collection.visual.push(case);
            } else {
                collection.standard.push(case);
            }
        }
    }

    if collection.is_empty() {
        bail!(
            "No tests discovered under {}",
            tests_root.display()
        );
    }

    Ok(collection)
}

/// Recursively collects `test_*.py` files under `dir`.
fn collect_test_files(dir: &Path, files: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_test_files(&path, files)?;
        } else if is_test_file(&path) {
            files.push(path);
        }
    }
    Ok(())
}

fn is_test_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.starts_with("test_") && name.ends_with(".py")
}

/// Parses the test functions out of one file. Collects `@pytest.mark.<name>`
/// decorator lines onto the next `def test_*` header, and applies file-level
/// `pytestmark` markers to every case in the file.
fn parse_test_file(path: &Path, content: &str) -> Vec<TestCase> {
    let mut cases = Vec::new();
    let mut file_markers: Vec<String> = Vec::new();
    let mut pending_markers: Vec<String> = Vec::new();

    for raw_line in content.lines() {
        let line = raw_line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with("pytestmark") {
            file_markers.extend(extract_markers(line));
            pending_markers.clear();
            continue;
        }

        if line.starts_with('@') {
            pending_markers.extend(extract_markers(line));
            continue;
        }

        if let Some(name) = test_function_name(line) {
            let mut markers = file_markers.clone();
            markers.append(&mut pending_markers);
            cases.push(TestCase {
                name: name.to_string(),
                path: path.to_path_buf(),
                markers,
            });
            continue;
        }

        // Any other statement ends the decorator block above it.
        pending_markers.clear();
    }

    cases
}

/// Pulls every `pytest.mark.<name>` occurrence out of a line, stripping any
/// argument list.
fn extract_markers(line: &str) -> Vec<String> {
    const PREFIX: &str = "pytest.mark.";
    let mut markers = Vec::new();
    let mut rest = line;
    while let Some(pos) = rest.find(PREFIX) {
        rest = &rest[pos + PREFIX.len()..];
        let end = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        if end > 0 {
            markers.push(rest[..end].to_string());
        }
        rest = &rest[end..];
    }
    markers
}

/// Returns the function name when the line is a `def test_*` header.
fn test_function_name(line: &str) -> Option<&str> {
    let header = line
        .strip_prefix("async def ")
        .or_else(|| line.strip_prefix("def "))?;
    let name = header.split('(').next()?.trim();
    if name.starts_with("test_") {
        Some(name)
    } else {
        None
    }
}
