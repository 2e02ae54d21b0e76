//! # Reporting Module / 报告模块
//!
//! This module handles reporting of cell results,
//! including console output, HTML reports and machine-readable JSON.
//!
//! 此模块处理单元结果的报告，
//! 包括控制台输出、HTML 报告和机器可读的 JSON。

pub mod console;
pub mod html;
pub mod json;
