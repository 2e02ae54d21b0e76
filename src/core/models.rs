//! # Data Models Module / 数据模型模块
//!
//! This module defines the core data structures used throughout the baseline
//! runner. It includes models for matrix cells, run results, archive entries
//! and the per-cell orchestration state machine.
//!
//! 此模块定义了整个 baseline runner 中使用的核心数据结构。
//! 它包括矩阵单元、运行结果、归档条目以及单元编排状态机的模型。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// One point in the environment matrix: an OS identifier crossed with a
/// language-runtime version. Immutable once expanded; identifies an
/// independent, isolated execution context.
/// 环境矩阵中的一个点：操作系统标识符与语言运行时版本的组合。
/// 展开后不可变；标识一个独立、隔离的执行上下文。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCell {
    /// The operating system identifier (e.g. "ubuntu-latest").
    /// 操作系统标识符（例如 "ubuntu-latest"）。
    pub os_id: String,
    /// The language-runtime version string (e.g. "3.11").
    /// 语言运行时版本字符串（例如 "3.11"）。
    pub runtime_version: String,
}

impl TestCell {
    pub fn new(os_id: impl Into<String>, runtime_version: impl Into<String>) -> Self {
        Self {
            os_id: os_id.into(),
            runtime_version: runtime_version.into(),
        }
    }

    /// Derives the deterministic, filesystem-safe identifier under which this
    /// cell's artifacts are archived. Unique per cell as long as the axis
    /// values are distinct, which keeps concurrently archiving cells from
    /// colliding.
    ///
    /// 派生确定性的、文件系统安全的标识符，此单元的产物以该标识符归档。
    /// 只要轴值不同，每个单元的标识符就是唯一的，
    /// 从而避免并发归档的单元相互冲突。
    pub fn artifact_id(&self) -> String {
        format!(
            "baseline-{}-{}",
            sanitize_component(&self.os_id),
            sanitize_component(&self.runtime_version)
        )
    }

    /// A short human-readable label used as a prefix on progress lines.
    /// 用作进度行前缀的简短人类可读标签。
    pub fn label(&self) -> String {
        format!("{}/{}", self.os_id, self.runtime_version)
    }
}

impl fmt::Display for TestCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os_id, self.runtime_version)
    }
}

/// Maps any byte outside `[A-Za-z0-9._-]` to `_` so the identifier is safe
/// as a directory name on every platform.
fn sanitize_component(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// The structured outcome of one external test-command invocation.
/// Produced by the runner, consumed by the orchestrator for branching
/// decisions; never mutated after creation. A non-zero exit is encoded
/// here, not raised as an error.
///
/// 一次外部测试命令调用的结构化结果。
/// 由 runner 产生，由编排器用于分支决策；创建后不再修改。
/// 非零退出码在此处编码，而不是作为错误抛出。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// The fully rendered command line that was executed.
    /// 实际执行的完整渲染后的命令行。
    pub command: String,
    /// The process exit code. `None` when no status was obtained
    /// (spawn failure or cancellation).
    /// 进程退出码。未获得状态时（派生失败或被取消）为 `None`。
    pub exit_code: Option<i32>,
    /// Combined captured stdout and stderr.
    /// 合并捕获的 stdout 和 stderr。
    pub output: String,
    /// Whether the command exited with status zero.
    /// 命令是否以零状态退出。
    pub succeeded: bool,
    /// Wall time of the invocation.
    /// 调用的挂钟时间。
    pub duration: Duration,
}

impl RunResult {
    /// A result for a step that never produced a process status, e.g. a
    /// discovery error standing in for the standard run, a spawn failure,
    /// or a cancelled step.
    pub fn not_run(command: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            exit_code: None,
            output: output.into(),
            succeeded: false,
            duration: Duration::from_secs(0),
        }
    }
}

/// Record of the unconditional per-cell archival step.
/// 每单元无条件归档步骤的记录。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveEntry {
    /// The cell-derived identifier the entry is stored under.
    /// 条目存储所用的、由单元派生的标识符。
    pub cell_id: String,
    /// The baseline output directory that was collected.
    /// 被收集的基准输出目录。
    pub source_path: PathBuf,
    /// Where the entry was persisted.
    /// 条目持久化的位置。
    pub dest_path: PathBuf,
    /// Whether archival completed. `false` is best-effort diagnostics only
    /// and never changes the cell's pass/fail classification.
    /// 归档是否完成。`false` 仅是尽力而为的诊断信息，
    /// 绝不改变单元的通过/失败分类。
    pub archived: bool,
    /// Number of files persisted. Zero for the empty/absent-source no-op case.
    /// 持久化的文件数。源为空或缺失的空操作情形为零。
    pub file_count: usize,
}

/// The orchestration state machine for a single cell. The "always run the
/// visual suite" and "always archive" obligations are explicit transitions
/// here rather than error-suppression control flow.
///
/// 单个单元的编排状态机。"始终运行视觉套件"和"始终归档"的义务
/// 在此表现为显式状态转移，而不是异常抑制式的控制流。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    Init,
    StandardRun,
    VisualRun,
    Regenerate,
    Skip,
    Archive,
    Done,
}

/// The pure transition function of the per-cell state machine. The only
/// guarded edge is `VisualRun`, which branches on whether the visual run
/// failed; every other edge is unconditional.
pub fn advance(state: CellState, visual_failed: bool) -> CellState {
    match state {
        CellState::Init => CellState::StandardRun,
        // Unconditional: the visual suite runs even when the standard
        // suite failed. The two are orthogonal signals.
        CellState::StandardRun => CellState::VisualRun,
        CellState::VisualRun => {
            if visual_failed {
                CellState::Regenerate
            } else {
                CellState::Skip
            }
        }
        CellState::Regenerate | CellState::Skip => CellState::Archive,
        CellState::Archive | CellState::Done => CellState::Done,
    }
}

/// The cell-level pass/fail classification: a pure function of the standard
/// and visual run outcomes. Regeneration and archival never feed into it.
pub fn cell_succeeded(standard_ok: bool, visual_ok: bool) -> bool {
    standard_ok && visual_ok
}

/// Everything recorded while orchestrating one cell.
/// 编排一个单元时记录的全部内容。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellReport {
    /// The matrix cell this report belongs to.
    /// 此报告所属的矩阵单元。
    pub cell: TestCell,
    /// The discovery error, when test collection failed for this cell.
    /// 测试收集失败时此单元的发现错误。
    pub collection_error: Option<String>,
    /// Sizes of the discovered (standard, visual) subsets, when discovery
    /// succeeded.
    /// 发现成功时，（普通，视觉）子集的大小。
    pub subset_sizes: Option<(usize, usize)>,
    /// Outcome of the standard run. On a discovery error this carries the
    /// error text and `succeeded: false`; the standard command is not run.
    /// 普通运行的结果。发现错误时其中携带错误文本且 `succeeded: false`；
    /// 此时不运行普通命令。
    pub standard: RunResult,
    /// Outcome of the visual run. Always present: the visual suite is never
    /// skipped because of an earlier failure.
    /// 视觉运行的结果。始终存在：视觉套件绝不因先前的失败而被跳过。
    pub visual: RunResult,
    /// Outcome of baseline regeneration; present iff the visual run failed.
    /// 基准再生成的结果；当且仅当视觉运行失败时存在。
    pub regenerate: Option<RunResult>,
    /// The unconditional archival record.
    /// 无条件归档记录。
    pub archive: ArchiveEntry,
    /// Wall time of the whole cell.
    /// 整个单元的挂钟时间。
    pub duration: Duration,
}

impl CellReport {
    /// Whether the cell passed. Independent of regeneration and archival
    /// outcomes.
    pub fn succeeded(&self) -> bool {
        cell_succeeded(self.standard.succeeded, self.visual.succeeded)
    }

    /// Whether any best-effort step (regeneration, archival) reported a
    /// problem worth surfacing.
    pub fn has_diagnostics(&self) -> bool {
        self.regenerate.as_ref().is_some_and(|r| !r.succeeded) || !self.archive.archived
    }
}
