//! 批量图片处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量图片的处理和断点管理。
//!
//! ## 核心功能
//!
//! 1. **扫描**：列出目录中所有支持的图片
//! 2. **断点续传**：加载进度文件，跳过已完成的图片
//! 3. **逐张处理**：委托 `ImageFlow` 处理单张图片，一次只处理一张
//! 4. **立即落盘**：每张图片处理完立即写进度文件，崩溃最多丢失正在处理的那一张
//! 5. **导出**：把所有成功记录（包括之前运行的）写成 CSV
//!
//! ## 错误分级
//!
//! - 目录读取失败、没有图片、导出失败、没有任何记录：终止
//! - 单张图片失败：记录到 `errors`，下次运行重试
//! - 进度文件保存失败：只警告，继续处理

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::infrastructure::{file_key, scan_images, ImageConverter};
use crate::models::ReadingLog;
use crate::services::{CheckpointStore, ExtractionService, Extractor, ReportExporter};
use crate::utils::console;
use crate::workflow::{ImageCtx, ImageFlow, ProcessResult};
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// 一次运行的统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// 扫描到的图片数
    pub found: usize,
    /// 之前已完成、本次跳过的图片数
    pub skipped: usize,
    /// 本次成功数
    pub succeeded: usize,
    /// 本次失败数
    pub failed: usize,
    /// 写入 CSV 的记录数（包括之前运行的）
    pub exported: usize,
}

/// 应用主结构
pub struct App {
    config: Config,
    converter: ImageConverter,
    extractor: Box<dyn Extractor>,
    store: CheckpointStore,
    out: Box<dyn Write + Send>,
}

impl App {
    /// 初始化应用（使用 LLM 提取服务，输出到 stdout）
    pub fn initialize(config: Config) -> Self {
        let extractor = ExtractionService::new(&config);
        info!("🤖 提取模型: {}", extractor.model_name());
        Self::with_extractor(config, Box::new(extractor))
    }

    /// 使用指定的提取实现初始化
    pub fn with_extractor(config: Config, extractor: Box<dyn Extractor>) -> Self {
        let converter = match &config.converter_path {
            Some(program) => ImageConverter::with_program(config.converter_tool, program.clone()),
            None => ImageConverter::new(config.converter_tool),
        };
        let store = CheckpointStore::new(config.checkpoint_file.clone());

        Self {
            config,
            converter,
            extractor,
            store,
            out: Box::new(io::stdout()),
        }
    }

    /// 替换输出目标
    pub fn with_output(mut self, out: Box<dyn Write + Send>) -> Self {
        self.out = out;
        self
    }

    /// 运行应用主逻辑
    pub async fn run(&mut self) -> AppResult<BatchSummary> {
        self.render(|out| console::print_banner(out));

        let images = self.load_images().await?;

        let mut progress = self.store.load();
        let pending: Vec<(usize, PathBuf, String)> = images
            .iter()
            .enumerate()
            .map(|(i, path)| (i + 1, path.clone(), file_key(path)))
            .filter(|(_, _, name)| !progress.is_completed(name))
            .collect();

        let mut summary = BatchSummary {
            found: images.len(),
            skipped: images.len() - pending.len(),
            ..Default::default()
        };
        let (found, skipped) = (summary.found, summary.skipped);
        self.render(|out| console::print_plan(out, found, skipped));

        for (index, path, file_name) in pending {
            let ctx = ImageCtx::new(path, file_name, index, summary.found);
            self.render(|out| console::print_progress(out, ctx.index, ctx.total, &ctx.file_name));

            let result = ImageFlow::new(&self.converter, self.extractor.as_ref())
                .process(&ctx)
                .await;

            let saved = match result {
                ProcessResult::Completed(log) => {
                    summary.succeeded += 1;
                    self.render(|out| console::print_result(out, &log));
                    self.store.record_success(&mut progress, &ctx.file_name, log)
                }
                ProcessResult::NormalizeFailed(message) | ProcessResult::ExtractFailed(message) => {
                    summary.failed += 1;
                    self.render(|out| console::print_error(out, &ctx.file_name, &message));
                    self.store.record_failure(&mut progress, &ctx.file_name, &message)
                }
            };

            if let Err(e) = saved {
                warn!("{} ⚠️ {}", ctx, e);
                self.render(|out| console::print_warning(out, &e));
            }
        }

        summary.exported = self.export(&progress.completed)?;

        let s = summary.clone();
        self.render(|out| console::print_summary(out, s.found, s.skipped, s.succeeded, s.failed));
        let output_csv = self.config.output_csv.display().to_string();
        self.render(|out| console::print_exported(out, s.exported, &output_csv));

        Ok(summary)
    }

    /// 扫描图片
    async fn load_images(&self) -> AppResult<Vec<PathBuf>> {
        debug!("📁 正在扫描 {}", self.config.image_dir.display());
        let images = scan_images(&self.config.image_dir).await?;
        if images.is_empty() {
            return Err(AppError::NoImages {
                path: self.config.image_dir.clone(),
            });
        }
        info!("✓ 找到 {} 张图片", images.len());
        Ok(images)
    }

    /// 导出所有成功记录
    fn export(&self, completed: &BTreeMap<String, ReadingLog>) -> AppResult<usize> {
        let written = ReportExporter::export(&self.config.output_csv, completed)?;
        info!(
            "📝 已导出 {} 条记录到 {}",
            written,
            self.config.output_csv.display()
        );
        Ok(written)
    }

    /// 终端输出失败不影响批处理
    fn render<F>(&mut self, f: F)
    where
        F: FnOnce(&mut dyn Write) -> io::Result<()>,
    {
        if let Err(e) = f(self.out.as_mut()).and_then(|_| self.out.flush()) {
            debug!("终端输出失败: {}", e);
        }
    }
}
