//! 提取结果的 JSON Schema
//!
//! 手写的静态 schema，字段与 [`ReadingLog`](super::ReadingLog) 一一对应，
//! 用于约束模型的结构化输出。

use serde_json::{json, Value};

/// schema 名称（结构化输出要求提供）
pub const SCHEMA_NAME: &str = "reading_log";

/// 阅读记录表的 JSON Schema
pub fn reading_log_schema() -> Value {
    json!({
        "type": "object",
        "additionalProperties": false,
        "required": ["full_name", "grade", "homeroom_teacher", "reading_entries"],
        "properties": {
            "full_name": {
                "type": "string",
                "description": "The student full name as written on the form"
            },
            "grade": {
                "type": "string",
                "description": "The student grade level (e.g. Kinder or 1st or 2nd)"
            },
            "homeroom_teacher": {
                "type": "string",
                "description": "The homeroom teacher name"
            },
            "reading_entries": {
                "type": "array",
                "description": "Reading time entries for each day on the log",
                "items": {
                    "type": "object",
                    "additionalProperties": false,
                    "required": ["day", "date", "minutes"],
                    "properties": {
                        "day": {
                            "type": "string",
                            "description": "Day of the week (e.g. Friday)"
                        },
                        "date": {
                            "type": "string",
                            "description": "The date in M/D format (e.g. 1/30)"
                        },
                        "minutes": {
                            "type": "integer",
                            "minimum": 0,
                            "description": "Number of minutes read as an integer. Use 0 if not filled in or blank."
                        }
                    }
                }
            }
        }
    })
}
