//! 终端输出
//!
//! 面向用户的进度显示。所有函数都是无状态的，输出目标由调用方传入。

use crate::models::ReadingLog;
use colored::Colorize;
use std::fmt::Display;
use std::io::{self, Write};

pub fn print_banner(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "{}", "┌─────────────────────────────────────┐".bold().cyan())?;
    writeln!(out, "{}", "│     📚 阅读记录解析                  │".bold().cyan())?;
    writeln!(out, "{}", "└─────────────────────────────────────┘".bold().cyan())
}

pub fn print_plan(out: &mut dyn Write, total: usize, skipped: usize) -> io::Result<()> {
    if skipped > 0 {
        writeln!(
            out,
            "  {}",
            format!("🔁 继续上次进度: {}/{} 已完成", skipped, total).cyan()
        )?;
    }
    writeln!(
        out,
        "  {} 张图片待处理\n",
        (total - skipped).to_string().bold()
    )
}

/// 进度条，`total` 为 0 时视为已完成
pub fn render_bar(current: usize, total: usize, width: usize) -> String {
    let filled = if total == 0 {
        width
    } else {
        (width * current.min(total)) / total
    };
    "█".repeat(filled) + &"░".repeat(width - filled)
}

pub fn print_progress(
    out: &mut dyn Write,
    current: usize,
    total: usize,
    file_name: &str,
) -> io::Result<()> {
    let pct = if total == 0 {
        100.0
    } else {
        current as f64 / total as f64 * 100.0
    };
    writeln!(
        out,
        "  {} {} {} {}",
        format!("[{}/{}]", current, total).bold(),
        render_bar(current, total, 20).cyan(),
        format!("{:.0}%", pct).dimmed(),
        file_name.yellow()
    )
}

pub fn print_result(out: &mut dyn Write, log: &ReadingLog) -> io::Result<()> {
    writeln!(
        out,
        "  {}{}",
        format!("✓ {}", log.full_name).green(),
        format!(" | {} | {}", log.grade, log.homeroom_teacher).dimmed()
    )?;
    for entry in &log.reading_entries {
        let label = format!("{:<10}", format!("{} {}", entry.day, entry.date));
        if entry.minutes > 0 {
            writeln!(
                out,
                "    {} {} {}",
                "│".dimmed(),
                label.dimmed(),
                format!("{} 分钟", entry.minutes).green()
            )?;
        } else {
            writeln!(out, "    {} {} {}", "│".dimmed(), label.dimmed(), "—".dimmed())?;
        }
    }
    writeln!(
        out,
        "    {} {}",
        "└".dimmed(),
        format!("合计: {} 分钟", log.total_minutes()).bold().green()
    )
}

pub fn print_error(out: &mut dyn Write, file_name: &str, err: &dyn Display) -> io::Result<()> {
    writeln!(out, "  {}", format!("✗ {}: {}", file_name, err).red())
}

pub fn print_warning(out: &mut dyn Write, message: &dyn Display) -> io::Result<()> {
    writeln!(out, "  {}", format!("⚠️ {}", message).yellow())
}

pub fn print_summary(
    out: &mut dyn Write,
    found: usize,
    skipped: usize,
    succeeded: usize,
    failed: usize,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "─── 统计 ─────────────────────────────".bold())?;
    writeln!(out, "  找到图片:   {}", found.to_string().bold())?;
    if skipped > 0 {
        writeln!(out, "  之前已完成: {}", skipped.to_string().cyan())?;
    }
    writeln!(out, "  本次成功:   {}", succeeded.to_string().green())?;
    if failed > 0 {
        writeln!(out, "  本次失败:   {}", failed.to_string().red())?;
    }
    writeln!(
        out,
        "  完成时间:   {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    )?;
    writeln!(out, "{}", "──────────────────────────────────────".bold())
}

pub fn print_exported(out: &mut dyn Write, count: usize, path: &dyn Display) -> io::Result<()> {
    writeln!(
        out,
        "  {}\n",
        format!("✅ 已将 {} 条阅读记录写入 {}", count, path).bold().green()
    )
}

pub fn print_fatal(out: &mut dyn Write, err: &dyn Display) -> io::Result<()> {
    writeln!(out, "{}", format!("❌ {}", err).red())
}
