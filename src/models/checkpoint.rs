use crate::models::reading_log::ReadingLog;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 处理进度（断点文件的内容）
///
/// - `completed`: 已成功提取的文件 → 记录
/// - `errors`: 最近一次失败的文件 → 错误信息，下次运行会重试
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    #[serde(default)]
    pub completed: BTreeMap<String, ReadingLog>,
    #[serde(default)]
    pub errors: BTreeMap<String, String>,
}

impl Progress {
    pub fn is_completed(&self, file_name: &str) -> bool {
        self.completed.contains_key(file_name)
    }

    /// 记录成功，同时清除该文件之前的错误
    pub fn mark_success(&mut self, file_name: impl Into<String>, log: ReadingLog) {
        let file_name = file_name.into();
        self.errors.remove(&file_name);
        self.completed.insert(file_name, log);
    }

    /// 记录失败，不会覆盖已有的成功记录
    pub fn mark_failure(&mut self, file_name: impl Into<String>, message: impl Into<String>) {
        self.errors.insert(file_name.into(), message.into());
    }
}
