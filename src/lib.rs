//! # Reading Log Parser
//!
//! 批量解析拍照上传的阅读记录表，导出 CSV 汇总
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 和文件系统、外部进程打交道，只暴露能力
//! - `scan_images` - 列出目录中的图片
//! - `ImageConverter` - HEIC → JPEG，临时文件随作用域释放
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单张图片或单份进度
//! - `ExtractionService` - LLM 视觉提取能力（`Extractor` trait）
//! - `CheckpointStore` - 进度文件读写能力
//! - `ReportExporter` - CSV 导出能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一张图片"的完整处理流程
//! - `ImageCtx` - 上下文封装（文件名 + 序号）
//! - `ImageFlow` - 流程编排（转换 → 编码 → 提取 → 整理）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 扫描、断点续传、逐张处理、导出
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult, ExtractionError};
pub use models::{Progress, ReadingEntry, ReadingLog};
pub use orchestrator::{App, BatchSummary};
pub use services::Extractor;
pub use workflow::{ImageCtx, ImageFlow, ProcessResult};
