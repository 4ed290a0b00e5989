//! Run log for the analysis pipeline.
//!
//! Every stage reports through [`emit`]: the rendered line goes to stdout
//! and the structured [`LogEntry`] is published on [`RUN_LOG`], so a caller
//! embedding the pipeline can collect the run log with [`RunLog::subscribe`].

use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Entries buffered per subscriber before the oldest are dropped.
const RUN_LOG_CAPACITY: usize = 256;

/// Width of one nesting step in rendered output.
const INDENT_STEP: &str = "   ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    /// Console marker printed before the message.
    pub fn marker(self) -> &'static str {
        match self {
            LogLevel::Info => "",
            LogLevel::Success => "✓ ",
            LogLevel::Warning => "⚠️ ",
            LogLevel::Error => "❌ ",
        }
    }
}

/// One line of the run log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Nesting depth below the current stage.
    #[serde(default)]
    pub depth: u8,
    pub at: DateTime<Local>,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>, depth: u8) -> Self {
        Self {
            level,
            message: message.into(),
            depth,
            at: Local::now(),
        }
    }

    /// Console form: stage indent, nesting, level marker, message.
    pub fn render(&self) -> String {
        format!(
            "{}{}{}",
            INDENT_STEP.repeat(usize::from(self.depth) + 1),
            self.level.marker(),
            self.message
        )
    }
}

/// Process-wide run log.
pub static RUN_LOG: Lazy<RunLog> = Lazy::new(RunLog::new);

pub struct RunLog {
    tx: broadcast::Sender<LogEntry>,
}

impl RunLog {
    pub fn new() -> Self {
        Self { tx: broadcast::channel(RUN_LOG_CAPACITY).0 }
    }

    /// Print `entry` and publish it. Returns how many subscribers got it.
    pub fn record(&self, entry: LogEntry) -> usize {
        println!("{}", entry.render());
        self.tx.send(entry).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LogEntry> {
        self.tx.subscribe()
    }
}

impl Default for RunLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Record a message on the process-wide run log.
pub fn emit(level: LogLevel, depth: u8, msg: impl Into<String>) {
    RUN_LOG.record(LogEntry::new(level, msg, depth));
}

pub fn log_info(msg: impl Into<String>) {
    emit(LogLevel::Info, 0, msg);
}

pub fn log_success(msg: impl Into<String>) {
    emit(LogLevel::Success, 0, msg);
}

pub fn log_warning(msg: impl Into<String>) {
    emit(LogLevel::Warning, 0, msg);
}

pub fn log_error(msg: impl Into<String>) {
    emit(LogLevel::Error, 0, msg);
}

pub fn log_info_indent(msg: impl Into<String>, depth: u8) {
    emit(LogLevel::Info, depth, msg);
}

pub fn log_success_indent(msg: impl Into<String>, depth: u8) {
    emit(LogLevel::Success, depth, msg);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscriber_receives_entries() {
        let log = RunLog::new();
        let mut rx = log.subscribe();

        let delivered = log.record(LogEntry::new(LogLevel::Warning, "missing year", 1));
        assert_eq!(delivered, 1);

        let entry = rx.try_recv().unwrap();
        assert_eq!(entry.level, LogLevel::Warning);
        assert_eq!(entry.message, "missing year");
        assert_eq!(entry.depth, 1);
    }

    #[test]
    fn test_record_without_subscribers() {
        let log = RunLog::new();
        assert_eq!(log.record(LogEntry::new(LogLevel::Info, "nobody listening", 0)), 0);
    }

    #[test]
    fn test_render_nests_by_depth() {
        assert_eq!(LogEntry::new(LogLevel::Info, "GBR", 0).render(), "   GBR");
        assert_eq!(LogEntry::new(LogLevel::Success, "gdp.csv", 1).render(), "      ✓ gdp.csv");
        assert_eq!(LogEntry::new(LogLevel::Error, "bad labels", 0).render(), "   ❌ bad labels");
    }

    #[test]
    fn test_entry_serialization() {
        let json = serde_json::to_string(&LogEntry::new(LogLevel::Success, "done", 0)).unwrap();
        assert!(json.contains("\"level\":\"success\""));
        assert!(json.contains("\"depth\":0"));
        assert!(json.contains("\"at\":"));
    }
}
