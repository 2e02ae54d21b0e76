//! # Core Module / 核心模块
//!
//! This module contains the core functionality of Baseline Runner,
//! including data models, configuration, test discovery, matrix planning
//! and the per-cell orchestration engine.
//!
//! 此模块包含 Baseline Runner 的核心功能，
//! 包括数据模型、配置、测试发现、矩阵规划和单元编排引擎。

pub mod archive;
pub mod config;
pub mod execution;
pub mod models;
pub mod planner;
pub mod selection;

// Re-exports
pub use config::MatrixConfig;
pub use execution::run_cell;
pub use models::CellReport;
