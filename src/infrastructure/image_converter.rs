//! 图片格式转换 - 基础设施层
//!
//! 把 HEIC 照片交给系统工具转换成 JPEG，标准格式原样返回。
//! 转换产生的临时文件由 [`NormalizedImage`] 持有，离开作用域即删除。

use crate::error::{AppError, AppResult, ConfigError};
use crate::models::ImageFormat;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tempfile::TempPath;
use tokio::process::Command;
use tracing::debug;

/// HEIC 转换工具
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConverterTool {
    /// macOS 自带的 sips
    Sips,
    /// libheif 提供的 heif-convert
    HeifConvert,
    /// ImageMagick 7
    Magick,
}

impl ConverterTool {
    /// macOS 上用 sips，其他平台用 heif-convert
    pub fn platform_default() -> Self {
        if cfg!(target_os = "macos") {
            ConverterTool::Sips
        } else {
            ConverterTool::HeifConvert
        }
    }

    /// 默认的可执行文件名
    pub fn program(self) -> &'static str {
        match self {
            ConverterTool::Sips => "sips",
            ConverterTool::HeifConvert => "heif-convert",
            ConverterTool::Magick => "magick",
        }
    }

    /// 构建命令行参数
    pub fn args(self, input: &Path, output: &Path) -> Vec<String> {
        let input = input.to_string_lossy().into_owned();
        let output = output.to_string_lossy().into_owned();
        match self {
            ConverterTool::Sips => vec![
                "-s".to_string(),
                "format".to_string(),
                "jpeg".to_string(),
                input,
                "--out".to_string(),
                output,
            ],
            ConverterTool::HeifConvert => vec!["-q".to_string(), "90".to_string(), input, output],
            ConverterTool::Magick => vec![input, output],
        }
    }
}

impl FromStr for ConverterTool {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sips" => Ok(ConverterTool::Sips),
            "heif-convert" | "heif_convert" | "libheif" => Ok(ConverterTool::HeifConvert),
            "magick" | "imagemagick" => Ok(ConverterTool::Magick),
            other => Err(ConfigError::UnknownConverter(other.to_string())),
        }
    }
}

/// 转换后的图片
///
/// `Converted` 持有临时文件，drop 时自动删除。
#[derive(Debug)]
pub enum NormalizedImage {
    /// 原本就是标准格式
    Original(PathBuf),
    /// 转换后的临时 JPEG
    Converted(TempPath),
}

impl NormalizedImage {
    pub fn path(&self) -> &Path {
        match self {
            NormalizedImage::Original(path) => path,
            NormalizedImage::Converted(temp) => temp,
        }
    }

    /// 提交给提取服务的格式
    pub fn format(&self) -> Option<ImageFormat> {
        match self {
            NormalizedImage::Original(path) => ImageFormat::from_path(path),
            NormalizedImage::Converted(_) => Some(ImageFormat::Jpeg),
        }
    }

    pub fn is_temporary(&self) -> bool {
        matches!(self, NormalizedImage::Converted(_))
    }
}

/// 图片转换器
#[derive(Debug, Clone)]
pub struct ImageConverter {
    tool: ConverterTool,
    program: String,
}

impl ImageConverter {
    pub fn new(tool: ConverterTool) -> Self {
        Self {
            tool,
            program: tool.program().to_string(),
        }
    }

    /// 使用自定义路径的可执行文件
    pub fn with_program(tool: ConverterTool, program: impl Into<String>) -> Self {
        Self {
            tool,
            program: program.into(),
        }
    }

    /// 需要时转换图片
    pub async fn normalize(&self, path: &Path) -> AppResult<NormalizedImage> {
        match ImageFormat::from_path(path) {
            Some(format) if format.needs_conversion() => self.convert_to_jpeg(path).await,
            Some(_) => Ok(NormalizedImage::Original(path.to_path_buf())),
            None => Err(AppError::Normalization {
                path: path.to_path_buf(),
                message: "不支持的图片格式".to_string(),
            }),
        }
    }

    async fn convert_to_jpeg(&self, path: &Path) -> AppResult<NormalizedImage> {
        let conversion_err = |message: String| AppError::Normalization {
            path: path.to_path_buf(),
            message,
        };

        let temp_path = tempfile::Builder::new()
            .prefix("reading-log-")
            .suffix(".jpg")
            .tempfile()
            .map_err(|e| conversion_err(format!("创建临时文件失败: {}", e)))?
            .into_temp_path();

        let args = self.tool.args(path, &temp_path);
        debug!("执行转换: {} {}", self.program, args.join(" "));

        // 失败时 temp_path 在返回前被 drop，临时文件随之删除
        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .await
            .map_err(|e| conversion_err(format!("无法执行 {}: {}", self.program, e)))?;

        if !output.status.success() {
            let mut diagnostics = String::from_utf8_lossy(&output.stdout).into_owned();
            diagnostics.push_str(&String::from_utf8_lossy(&output.stderr));
            debug!("{} 转换失败: {}", self.program, diagnostics.trim());
            return Err(conversion_err(format!(
                "{} 转换失败 ({}):\n{}",
                self.program,
                output.status,
                diagnostics.trim()
            )));
        }

        Ok(NormalizedImage::Converted(temp_path))
    }
}
