//! 图片处理上下文
//!
//! 封装"我正在处理第几张图片、它叫什么"这一信息

use std::fmt::Display;
use std::path::PathBuf;

/// 图片处理上下文
#[derive(Debug, Clone)]
pub struct ImageCtx {
    /// 图片路径
    pub path: PathBuf,

    /// 断点文件中的键（文件名）
    pub file_name: String,

    /// 在扫描结果中的位置（从1开始，仅用于显示）
    pub index: usize,

    /// 扫描到的图片总数
    pub total: usize,
}

impl ImageCtx {
    pub fn new(path: PathBuf, file_name: String, index: usize, total: usize) -> Self {
        Self {
            path,
            file_name,
            index,
            total,
        }
    }
}

impl Display for ImageCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[图片 {}/{} {}]", self.index, self.total, self.file_name)
    }
}
