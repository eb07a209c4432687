//! Output formatting for CLI commands

use crate::batch::BatchReport;
use anyhow::Result;
use serde::Serialize;

/// Format output as pretty JSON
pub fn format_output<T: Serialize>(data: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Batch 报告：--json 时输出 JSON，否则每个频道一行
pub fn format_report(report: &BatchReport, json: bool) -> Result<String> {
    if json {
        return format_output(report);
    }

    let lines: Vec<String> = report.channels.iter().map(|c| c.to_string()).collect();
    Ok(lines.join("\n"))
}
