//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和断点调度，是整个系统的"指挥中心"。
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<图片>，读写进度，导出 CSV)
//!     ↓
//! workflow::ImageFlow (处理单张图片)
//!     ↓
//! services (能力层：extraction / checkpoint / report)
//!     ↓
//! infrastructure (基础设施：目录扫描 / 格式转换)
//! ```
//!
//! ## 设计原则
//!
//! 1. **逐张处理**：一次只有一个转换、一个 API 调用在进行
//! 2. **立即落盘**：每张图片的结果处理完马上写进度文件
//! 3. **无业务逻辑**：只做调度和统计，不做具体的提取判断

pub mod batch_processor;

pub use batch_processor::{App, BatchSummary};
