//! CSV 导出 - 业务能力层
//!
//! 把断点文件中所有成功的记录（包括之前几次运行的）写成一张表

use crate::error::{AppError, AppResult};
use crate::models::{ReadingLog, FORM_DAYS};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// 表头：身份列 + 固定七天 + 总计
pub fn header() -> Vec<String> {
    let mut columns = vec![
        "Full Name".to_string(),
        "Grade".to_string(),
        "Homeroom Teacher".to_string(),
    ];
    columns.extend(FORM_DAYS.iter().map(|(day, date)| format!("{} {}", day, date)));
    columns.push("Total Minutes".to_string());
    columns
}

/// 单条记录对应的一行
///
/// 没有填写或为 0 的日期输出空单元格；总计包括不在固定七天中的条目。
pub fn row(log: &ReadingLog) -> Vec<String> {
    let mut cells = vec![
        log.full_name.clone(),
        log.grade.clone(),
        log.homeroom_teacher.clone(),
    ];
    cells.extend(FORM_DAYS.iter().map(|(_, date)| format_minutes(log, date)));
    cells.push(log.total_minutes().to_string());
    cells
}

fn format_minutes(log: &ReadingLog, date: &str) -> String {
    match log.entry_for(date) {
        Some(entry) if entry.minutes > 0 => entry.minutes.to_string(),
        _ => String::new(),
    }
}

/// CSV 导出器
pub struct ReportExporter;

impl ReportExporter {
    /// 导出所有记录，返回写入的行数
    ///
    /// 没有记录时返回 `NoRecords`，不会生成只有表头的文件。
    pub fn export(path: &Path, completed: &BTreeMap<String, ReadingLog>) -> AppResult<usize> {
        if completed.is_empty() {
            return Err(AppError::NoRecords);
        }

        let write_err = |message: String| AppError::ExportWrite {
            path: path.to_path_buf(),
            message,
        };

        let mut writer = csv::Writer::from_path(path).map_err(|e| write_err(e.to_string()))?;
        writer
            .write_record(header())
            .map_err(|e| write_err(e.to_string()))?;

        for (file_name, log) in completed {
            debug!("导出 {} → {}", file_name, log.full_name);
            writer
                .write_record(row(log))
                .map_err(|e| write_err(e.to_string()))?;
        }
        writer.flush().map_err(|e| write_err(e.to_string()))?;

        Ok(completed.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReadingEntry;

    fn log(name: &str, entries: Vec<ReadingEntry>) -> ReadingLog {
        ReadingLog {
            full_name: name.to_string(),
            grade: "1st".to_string(),
            homeroom_teacher: "Ms. Frizzle".to_string(),
            reading_entries: entries,
        }
    }

    #[test]
    fn test_header() {
        assert_eq!(
            header().join(","),
            "Full Name,Grade,Homeroom Teacher,Friday 1/30,Saturday 1/31,Sunday 2/1,Monday 2/2,Tuesday 2/3,Wednesday 2/4,Thursday 2/5,Total Minutes"
        );
    }

    #[test]
    fn test_row_blank_for_zero_and_missing() {
        let record = log(
            "Arnold",
            vec![
                ReadingEntry::new("Friday", "1/30", 10),
                ReadingEntry::new("Tuesday", "2/3", 0),
            ],
        );
        let cells = row(&record);
        assert_eq!(cells[3], "10");
        assert_eq!(cells[4], "");
        assert_eq!(cells[7], "");
        assert_eq!(cells[10], "10");
    }

    #[test]
    fn test_total_includes_days_outside_form() {
        let record = log(
            "Wanda",
            vec![
                ReadingEntry::new("Friday", "1/30", 15),
                ReadingEntry::new("Friday", "2/6", 30),
            ],
        );
        let cells = row(&record);
        assert_eq!(cells.last().map(String::as_str), Some("45"));
    }

    #[test]
    fn test_total_does_not_overflow() {
        let record = log(
            "Max",
            vec![
                ReadingEntry::new("Friday", "1/30", 4_000_000_000),
                ReadingEntry::new("Saturday", "1/31", 4_000_000_000),
            ],
        );
        let cells = row(&record);
        assert_eq!(cells[3], "4000000000");
        assert_eq!(cells[10], "8000000000");
    }

    #[test]
    fn test_duplicate_date_uses_first() {
        let record = log(
            "Tim",
            vec![
                ReadingEntry::new("Monday", "2/2", 5),
                ReadingEntry::new("Monday", "2/2", 50),
            ],
        );
        assert_eq!(row(&record)[6], "5");
    }

    #[test]
    fn test_export_writes_rows_in_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reading_logs.csv");
        let mut completed = BTreeMap::new();
        completed.insert(
            "b.jpg".to_string(),
            log("Beta, Jr.", vec![ReadingEntry::new("Sunday", "2/1", 20)]),
        );
        completed.insert("a.jpg".to_string(), log("Alpha", vec![]));

        let written = ReportExporter::export(&path, &completed).unwrap();
        assert_eq!(written, 2);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Full Name,Grade"));
        assert_eq!(lines[1], "Alpha,1st,Ms. Frizzle,,,,,,,,0");
        assert_eq!(lines[2], "\"Beta, Jr.\",1st,Ms. Frizzle,,,20,,,,,20");
    }

    #[test]
    fn test_export_refuses_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reading_logs.csv");
        let err = ReportExporter::export(&path, &BTreeMap::new()).unwrap_err();
        assert!(matches!(err, AppError::NoRecords));
        assert!(!path.exists());
    }

    #[test]
    fn test_export_write_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("out.csv");
        let mut completed = BTreeMap::new();
        completed.insert("a.jpg".to_string(), log("Alpha", vec![]));
        let err = ReportExporter::export(&path, &completed).unwrap_err();
        assert!(matches!(err, AppError::ExportWrite { .. }));
    }
}
