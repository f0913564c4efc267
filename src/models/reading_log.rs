use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::warn;

/// 阅读记录表上固定的七天（星期, 日期）
pub const FORM_DAYS: [(&str, &str); 7] = [
    ("Friday", "1/30"),
    ("Saturday", "1/31"),
    ("Sunday", "2/1"),
    ("Monday", "2/2"),
    ("Tuesday", "2/3"),
    ("Wednesday", "2/4"),
    ("Thursday", "2/5"),
];

static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*0*(\d{1,2})\s*/\s*0*(\d{1,2})\s*$").expect("日期正则无效")
});

/// 从一张阅读记录表图片中提取出的结构化数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingLog {
    pub full_name: String,
    pub grade: String,
    pub homeroom_teacher: String,
    #[serde(default)]
    pub reading_entries: Vec<ReadingEntry>,
}

/// 单日阅读时长
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingEntry {
    /// 星期（如 Friday）
    pub day: String,
    /// M/D 格式的日期（如 1/30）
    pub date: String,
    /// 阅读分钟数，0 表示未填写
    pub minutes: u32,
}

impl ReadingEntry {
    pub fn new(day: impl Into<String>, date: impl Into<String>, minutes: u32) -> Self {
        Self {
            day: day.into(),
            date: date.into(),
            minutes,
        }
    }
}

impl ReadingLog {
    /// 所有条目的分钟数之和（包括不在固定七天内的条目）
    ///
    /// 用 `u64` 累加，单条 `u32` 再大也不会溢出。
    pub fn total_minutes(&self) -> u64 {
        self.reading_entries.iter().map(|e| u64::from(e.minutes)).sum()
    }

    /// 按日期查找条目，重复日期时取第一个
    pub fn entry_for(&self, date: &str) -> Option<&ReadingEntry> {
        self.reading_entries.iter().find(|e| e.date == date)
    }

    /// 整理模型返回的数据
    ///
    /// - 去掉字符串字段两端空白
    /// - 日期统一为 `M/D`（`01/30` → `1/30`）
    /// - 无法识别的日期和重复日期只记录警告，不丢弃
    pub fn normalized(mut self) -> Self {
        self.full_name = self.full_name.trim().to_string();
        self.grade = self.grade.trim().to_string();
        self.homeroom_teacher = self.homeroom_teacher.trim().to_string();

        let mut seen: Vec<String> = Vec::with_capacity(self.reading_entries.len());
        for entry in self.reading_entries.iter_mut() {
            entry.day = entry.day.trim().to_string();
            match normalize_date(&entry.date) {
                Some(date) => entry.date = date,
                None => {
                    warn!("⚠️ {} 的日期格式无法识别: {:?}", self.full_name, entry.date);
                    entry.date = entry.date.trim().to_string();
                }
            }
            if seen.contains(&entry.date) {
                warn!(
                    "⚠️ {} 的记录中日期 {} 重复出现，导出时只取第一条",
                    self.full_name, entry.date
                );
            } else {
                seen.push(entry.date.clone());
            }
        }
        self
    }
}

/// 把 `01/30`、` 1 / 30 ` 之类的写法统一为 `1/30`
pub fn normalize_date(raw: &str) -> Option<String> {
    let caps = DATE_PATTERN.captures(raw)?;
    let month: u32 = caps[1].parse().ok()?;
    let day: u32 = caps[2].parse().ok()?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    Some(format!("{}/{}", month, day))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ReadingLog {
        ReadingLog {
            full_name: "  Ada Lovelace ".to_string(),
            grade: "2nd".to_string(),
            homeroom_teacher: "Ms. Byron".to_string(),
            reading_entries: vec![
                ReadingEntry::new("Friday", "01/30", 10),
                ReadingEntry::new("Tuesday", "2/3", 0),
                ReadingEntry::new("Friday", "1/30", 99),
            ],
        }
    }

    #[test]
    fn test_normalize_date() {
        assert_eq!(normalize_date("1/30").as_deref(), Some("1/30"));
        assert_eq!(normalize_date("01/30").as_deref(), Some("1/30"));
        assert_eq!(normalize_date(" 2 / 05 ").as_deref(), Some("2/5"));
        assert_eq!(normalize_date("Jan 30"), None);
        assert_eq!(normalize_date("13/1"), None);
    }

    #[test]
    fn test_normalized_trims_and_canonicalizes() {
        let log = sample().normalized();
        assert_eq!(log.full_name, "Ada Lovelace");
        assert_eq!(log.reading_entries[0].date, "1/30");
    }

    #[test]
    fn test_entry_for_takes_first_duplicate() {
        let log = sample().normalized();
        assert_eq!(log.entry_for("1/30").map(|e| e.minutes), Some(10));
        assert!(log.entry_for("2/5").is_none());
    }

    #[test]
    fn test_total_minutes_counts_every_entry() {
        assert_eq!(sample().total_minutes(), 109);
    }

    #[test]
    fn test_total_minutes_large_values() {
        let json = r#"{
            "full_name": "Ada",
            "grade": "Kinder",
            "homeroom_teacher": "Mr. B",
            "reading_entries": [
                {"day": "Friday", "date": "1/30", "minutes": 4000000000},
                {"day": "Saturday", "date": "1/31", "minutes": 4000000000}
            ]
        }"#;
        let log: ReadingLog = serde_json::from_str(json).unwrap();
        assert_eq!(log.total_minutes(), 8_000_000_000);
    }

    #[test]
    fn test_deserialize_checkpoint_shape() {
        let json = r#"{
            "full_name": "Ada",
            "grade": "Kinder",
            "homeroom_teacher": "Mr. B",
            "reading_entries": [{"day": "Friday", "date": "1/30", "minutes": 15}]
        }"#;
        let log: ReadingLog = serde_json::from_str(json).unwrap();
        assert_eq!(log.reading_entries.len(), 1);
        assert_eq!(log.total_minutes(), 15);
    }

    #[test]
    fn test_negative_minutes_rejected() {
        let json = r#"{"day": "Friday", "date": "1/30", "minutes": -5}"#;
        assert!(serde_json::from_str::<ReadingEntry>(json).is_err());
    }
}
