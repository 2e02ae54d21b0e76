//! # Matrix Planning Module / 矩阵规划模块
//!
//! This module expands the configured environment axes into the list of
//! matrix cells to orchestrate, optionally restricted to a single OS or
//! runtime for CI jobs that own exactly one cell.
//!
//! 此模块将配置的环境轴展开为要编排的矩阵单元列表，
//! 可选地限制到单个操作系统或运行时，以适配只负责一个单元的 CI 作业。

use crate::core::config::MatrixAxes;
use crate::core::models::TestCell;
use anyhow::{Result, bail};

/// The expanded plan for one invocation.
/// 一次调用的展开计划。
#[derive(Debug)]
pub struct ExecutionPlan {
    /// The cells to orchestrate, in axis declaration order.
    /// 要编排的单元，按轴声明顺序排列。
    pub cells: Vec<TestCell>,
    /// The number of cells removed by the CLI axis filters.
    /// 被 CLI 轴过滤器移除的单元数量。
    pub filtered_count: usize,
}

/// Expands the OS × runtime cross product into independent cells.
///
/// Each cell is an isolated unit of work; nothing here is shared between
/// them. Optional filters restrict either axis, which is how a hosted CI
/// job runs exactly the one cell it owns.
///
/// 将操作系统 × 运行时的叉积展开为独立的单元。
/// 每个单元都是隔离的工作单位，彼此之间不共享任何内容。
pub fn expand(
    axes: &MatrixAxes,
    os_filter: Option<&str>,
    runtime_filter: Option<&str>,
) -> Result<ExecutionPlan> {
    if axes.os.is_empty() {
        bail!("The matrix `os` axis must list at least one identifier.");
    }
    if axes.runtime.is_empty() {
        bail!("The matrix `runtime` axis must list at least one version.");
    }

    if let Some(os) = os_filter
        && !axes.os.iter().any(|o| o == os)
    {
        bail!("--os '{}' does not appear in the matrix `os` axis.", os);
    }
    if let Some(rt) = runtime_filter
        && !axes.runtime.iter().any(|r| r == rt)
    {
        bail!(
            "--runtime '{}' does not appear in the matrix `runtime` axis.",
            rt
        );
    }

    let total = axes.os.len() * axes.runtime.len();
    let mut cells = Vec::with_capacity(total);
    for os in &axes.os {
        for runtime in &axes.runtime {
            let keep = os_filter.is_none_or(|f| f == os)
                && runtime_filter.is_none_or(|f| f == runtime);
            if keep {
                cells.push(TestCell::new(os.clone(), runtime.clone()));
            }
        }
    }

    Ok(ExecutionPlan {
        filtered_count: total - cells.len(),
        cells,
    })
}
