//! 基础设施层
//!
//! 直接和文件系统、外部进程打交道，只暴露能力：
//! - `image_catalog` - 列出目录中的图片
//! - `image_converter` - 调用系统工具把 HEIC 转成 JPEG

pub mod image_catalog;
pub mod image_converter;

pub use image_catalog::{file_key, scan_images};
pub use image_converter::{ConverterTool, ImageConverter, NormalizedImage};
