//! 断点存储 - 业务能力层
//!
//! 负责把 [`Progress`] 读写到磁盘，保证中途退出后可以接着处理。
//! 每次标记之后立即保存；保存采用"临时文件 + rename"，磁盘上不会出现写了一半的文件。

use crate::error::{AppError, AppResult};
use crate::models::{Progress, ReadingLog};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// 断点存储
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 加载进度
    ///
    /// 文件不存在或无法解析时返回空进度，不会失败。
    pub fn load(&self) -> Progress {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                debug!("没有可用的进度文件 {}: {}", self.path.display(), e);
                return Progress::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(progress) => progress,
            Err(e) => {
                warn!(
                    "⚠️ 无法解析进度文件 {}，将从头开始: {}",
                    self.path.display(),
                    e
                );
                Progress::default()
            }
        }
    }

    /// 保存进度（原子替换）
    pub fn save(&self, progress: &Progress) -> AppResult<()> {
        let save_err = |message: String| AppError::CheckpointSave {
            path: self.path.clone(),
            message,
        };

        let data = serde_json::to_vec_pretty(progress).map_err(|e| save_err(e.to_string()))?;
        atomic_write(&self.path, &data).map_err(|e| save_err(e.to_string()))?;

        debug!(
            "进度已保存: 完成 {} / 失败 {}",
            progress.completed.len(),
            progress.errors.len()
        );
        Ok(())
    }

    /// 标记成功并立即保存
    ///
    /// 保存失败只返回错误，内存中的进度已经更新。
    pub fn record_success(
        &self,
        progress: &mut Progress,
        file_name: &str,
        log: ReadingLog,
    ) -> AppResult<()> {
        progress.mark_success(file_name, log);
        self.save(progress)
    }

    /// 标记失败并立即保存
    pub fn record_failure(
        &self,
        progress: &mut Progress,
        file_name: &str,
        message: &str,
    ) -> AppResult<()> {
        progress.mark_failure(file_name, message);
        self.save(progress)
    }
}

/// 先写同目录下的临时文件并 fsync，再 rename 覆盖目标
fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = tempfile::Builder::new()
        .prefix(".progress-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    temp.write_all(data)?;
    // 临时文件默认 0600，rename 后会变成断点文件的权限
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        temp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))?;
    }
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
