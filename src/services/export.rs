//! CSV export of the activity log
//!
//! The export covers the filtered, sorted collection, never just the visible page.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, SecondsFormat, Utc};
use tracing::info;

use crate::models::LogEntry;
use crate::services::join_index::JoinIndex;
use crate::utils::ConsoleResult;

pub const LOG_CSV_HEADER: [&str; 5] = ["timestamp", "username", "action", "entity", "entity_id"];

/// Wrap a field in double quotes, doubling embedded quotes
pub fn quote_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

pub fn csv_line<'f>(fields: impl IntoIterator<Item = &'f str>) -> String {
    fields
        .into_iter()
        .map(quote_field)
        .collect::<Vec<_>>()
        .join(",")
}

/// Render log entries as CSV, header first, rows joined by `\n`
pub fn logs_to_csv(entries: &[&LogEntry], index: &JoinIndex) -> String {
    let mut lines = Vec::with_capacity(entries.len() + 1);
    lines.push(csv_line(LOG_CSV_HEADER));

    for entry in entries {
        let timestamp = entry.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true);
        let username = index.display_name(entry.user_id);
        let entity_id = entry.entity_id_text();
        lines.push(csv_line([
            timestamp.as_str(),
            username.as_ref(),
            entry.action.label(),
            entry.entity.as_str(),
            entity_id.as_str(),
        ]));
    }

    lines.join("\n")
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("logs_{}.csv", date.format("%Y-%m-%d"))
}

/// A rendered export, ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct CsvExport {
    pub file_name: String,
    pub contents: String,
    pub rows: usize,
}

impl CsvExport {
    pub fn new(entries: &[&LogEntry], index: &JoinIndex, date: NaiveDate) -> Self {
        Self {
            file_name: export_file_name(date),
            contents: logs_to_csv(entries, index),
            rows: entries.len(),
        }
    }

    /// Export named after today's UTC date
    pub fn today(entries: &[&LogEntry], index: &JoinIndex) -> Self {
        Self::new(entries, index, Utc::now().date_naive())
    }

    /// Write the file into `dir`, creating the directory if needed
    pub fn write_to(&self, dir: &Path) -> ConsoleResult<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, self.contents.as_bytes())?;
        info!("Exported {} log entries to {}", self.rows, path.display());
        Ok(path)
    }
}
