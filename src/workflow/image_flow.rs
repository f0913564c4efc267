//! 图片处理流程 - 流程层
//!
//! 核心职责：定义"一张图片"的完整处理流程
//!
//! 流程顺序：
//! 1. 格式转换（HEIC → JPEG）
//! 2. 读入内存并 base64 编码（读完立即释放临时文件）
//! 3. 调用提取服务
//! 4. 整理提取结果

use base64::{engine::general_purpose, Engine as _};
use tracing::{debug, info};

use crate::error::{AppError, ExtractionError};
use crate::infrastructure::ImageConverter;
use crate::models::ReadingLog;
use crate::services::Extractor;
use crate::workflow::image_ctx::ImageCtx;

/// 单张图片的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessResult {
    /// 提取成功
    Completed(ReadingLog),
    /// 格式转换失败
    NormalizeFailed(String),
    /// 读取或提取失败
    ExtractFailed(String),
}

/// 图片处理流程
///
/// - 编排单张图片的转换、编码、提取
/// - 不持有任何资源，只借用能力（converter / extractor）
/// - 不读写断点文件，结果交给编排层记录
pub struct ImageFlow<'a> {
    converter: &'a ImageConverter,
    extractor: &'a dyn Extractor,
}

impl<'a> ImageFlow<'a> {
    pub fn new(converter: &'a ImageConverter, extractor: &'a dyn Extractor) -> Self {
        Self {
            converter,
            extractor,
        }
    }

    /// 处理一张图片
    pub async fn process(&self, ctx: &ImageCtx) -> ProcessResult {
        let normalized = match self.converter.normalize(&ctx.path).await {
            Ok(image) => image,
            Err(e) => {
                debug!("{} ❌ 转换失败: {}", ctx, e);
                return ProcessResult::NormalizeFailed(e.to_string());
            }
        };

        if normalized.is_temporary() {
            debug!("{} 已转换为 {}", ctx, normalized.path().display());
        }

        let Some(media_type) = normalized.format().and_then(|f| f.media_type()) else {
            let e = ExtractionError::UnsupportedMediaType(ctx.file_name.clone());
            return ProcessResult::ExtractFailed(e.to_string());
        };

        let bytes = match tokio::fs::read(normalized.path()).await {
            Ok(bytes) => bytes,
            Err(source) => {
                let e = AppError::ImageRead {
                    path: ctx.path.clone(),
                    source,
                };
                debug!("{} ❌ {}", ctx, e);
                return ProcessResult::ExtractFailed(e.to_string());
            }
        };
        // 读入内存后临时文件就不再需要
        drop(normalized);

        let encoded = general_purpose::STANDARD.encode(&bytes);
        debug!("{} 图片大小: {} 字节", ctx, bytes.len());

        match self.extractor.extract(media_type, &encoded).await {
            Ok(log) => {
                let log = log.normalized();
                info!("{} ✓ 提取成功: {}", ctx, log.full_name);
                ProcessResult::Completed(log)
            }
            Err(e) => {
                debug!("{} ❌ 提取失败: {}", ctx, e);
                ProcessResult::ExtractFailed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ConverterTool;
    use crate::models::ReadingEntry;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// 记录收到的参数，并返回固定结果
    struct RecordingExtractor {
        calls: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl Extractor for RecordingExtractor {
        async fn extract(
            &self,
            media_type: &str,
            base64_data: &str,
        ) -> Result<ReadingLog, ExtractionError> {
            self.calls
                .lock()
                .unwrap()
                .push((media_type.to_string(), base64_data.to_string()));
            Ok(ReadingLog {
                full_name: " Ada ".to_string(),
                grade: "1st".to_string(),
                homeroom_teacher: "Ms. K".to_string(),
                reading_entries: vec![ReadingEntry::new("Friday", "01/30", 10)],
            })
        }
    }

    fn ctx(path: std::path::PathBuf) -> ImageCtx {
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        ImageCtx::new(path, name, 1, 1)
    }

    #[tokio::test]
    async fn test_png_is_sent_as_base64() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.png");
        std::fs::write(&path, b"hello").unwrap();

        let converter = ImageConverter::new(ConverterTool::Sips);
        let extractor = RecordingExtractor {
            calls: Mutex::new(Vec::new()),
        };
        let flow = ImageFlow::new(&converter, &extractor);

        let result = flow.process(&ctx(path)).await;
        match result {
            ProcessResult::Completed(log) => {
                assert_eq!(log.full_name, "Ada");
                assert_eq!(log.reading_entries[0].date, "1/30");
            }
            other => panic!("意外的结果: {other:?}"),
        }

        let calls = extractor.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "image/png");
        assert_eq!(calls[0].1, "aGVsbG8=");
    }

    #[tokio::test]
    async fn test_heic_conversion_failure_skips_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.HEIC");
        std::fs::write(&path, b"x").unwrap();

        let converter = ImageConverter::with_program(ConverterTool::Sips, "no-such-converter");
        let extractor = RecordingExtractor {
            calls: Mutex::new(Vec::new()),
        };
        let flow = ImageFlow::new(&converter, &extractor);

        let result = flow.process(&ctx(path)).await;
        assert!(matches!(result, ProcessResult::NormalizeFailed(_)));
        assert!(extractor.calls.lock().unwrap().is_empty());
    }

    /// 收集日志输出
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_per_file_failures_stay_below_warn() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let dir = tempfile::tempdir().unwrap();
        let heic = dir.path().join("log.heic");
        std::fs::write(&heic, b"x").unwrap();

        let converter = ImageConverter::with_program(ConverterTool::Sips, "no-such-converter");
        let extractor = RecordingExtractor {
            calls: Mutex::new(Vec::new()),
        };
        let flow = ImageFlow::new(&converter, &extractor);

        let converted = flow.process(&ctx(heic)).await;
        assert!(matches!(converted, ProcessResult::NormalizeFailed(_)));
        let missing = flow.process(&ctx(dir.path().join("gone.jpg"))).await;
        assert!(matches!(missing, ProcessResult::ExtractFailed(_)));

        // 控制台已经报告失败，日志不再重复
        assert!(logs.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_file_is_extract_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vanished.jpg");

        let converter = ImageConverter::new(ConverterTool::Sips);
        let extractor = RecordingExtractor {
            calls: Mutex::new(Vec::new()),
        };
        let flow = ImageFlow::new(&converter, &extractor);

        let result = flow.process(&ctx(path)).await;
        assert!(matches!(result, ProcessResult::ExtractFailed(_)));
    }
}
