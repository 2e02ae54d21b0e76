//! # Baseline Runner Library / Baseline Runner 库
//!
//! This library provides the core functionality for the Baseline Runner tool,
//! a configuration-driven CI test orchestrator that separates visual-regression
//! tests from standard tests, regenerates image baselines when the visual suite
//! fails, and archives whatever baselines exist for every matrix cell.
//!
//! 此库为 Baseline Runner 工具提供核心功能，
//! 这是一个配置驱动的 CI 测试编排器，用于区分视觉回归测试与普通测试，
//! 在视觉测试失败时重新生成基准图像，并为每个矩阵单元归档现有基准。
//!
//! ## Modules / 模块
//!
//! - `core` - Data models, test discovery, matrix planning and the per-cell
//!   orchestration state machine
//! - `infra` - Infrastructure services like command execution and file system operations
//! - `reporting` - Cell result reporting and visualization
//! - `cli` - Command-line interface
//! - `commands` - Subcommand implementations
//!
//! - `core` - 数据模型、测试发现、矩阵规划与单元编排状态机
//! - `infra` - 基础设施服务，如命令执行和文件系统操作
//! - `reporting` - 单元结果报告和可视化
//! - `cli` - 命令行接口
//! - `commands` - 子命令实现

pub mod cli;
pub mod commands;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use core::config;
pub use core::execution;
pub use core::models;
pub use core::selection;
