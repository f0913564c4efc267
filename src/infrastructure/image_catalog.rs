//! 图片目录扫描 - 基础设施层
//!
//! 只负责"列出目录里有哪些图片"，不关心处理进度

use crate::error::{AppError, AppResult};
use crate::models::ImageFormat;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// 扫描目录中支持的图片文件
///
/// 不递归子目录，结果按文件名排序，保证每次运行的处理顺序一致。
pub async fn scan_images(dir: &Path) -> AppResult<Vec<PathBuf>> {
    let read_err = |source| AppError::DirectoryRead {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = fs::read_dir(dir).await.map_err(read_err)?;
    let mut images = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(read_err)? {
        let file_type = entry.file_type().await.map_err(read_err)?;
        if file_type.is_dir() {
            continue;
        }
        let path = entry.path();
        match ImageFormat::from_path(&path) {
            Some(format) => {
                debug!("发现图片: {} ({})", path.display(), format);
                images.push(path);
            }
            None => debug!("跳过非图片文件: {}", path.display()),
        }
    }

    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(images)
}

/// 断点文件中使用的键（文件名）
pub fn file_key(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
