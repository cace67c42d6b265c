//! Pipeline progress logs.
//!
//! Entries go to stderr so that stdout only carries command output. The
//! format is chosen once at start-up with [`init`]; until then text is used.

use std::io::Write;

use chrono::Utc;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Output format for log entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Prefixed human-readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// A single log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Nesting depth for text output
    #[serde(default)]
    pub indent: u8,
    pub timestamp: String,
}

impl LogEntry {
    fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            indent: 0,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Error, message)
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    /// Render for the given format, without trailing newline.
    pub fn render(&self, format: LogFormat) -> String {
        match format {
            LogFormat::Text => {
                let prefix = match self.level {
                    LogLevel::Info => "   ",
                    LogLevel::Success => "   ✓",
                    LogLevel::Warning => "   ⚠️",
                    LogLevel::Error => "   ❌",
                };
                let indent = "   ".repeat(self.indent as usize);
                format!("{}{} {}", indent, prefix, self.message)
            }
            LogFormat::Json => serde_json::to_string(self).unwrap_or_else(|_| self.message.clone()),
        }
    }
}

static LOG_FORMAT: OnceCell<LogFormat> = OnceCell::new();

/// Select the log format. Only the first call has an effect.
pub fn init(format: LogFormat) {
    let _ = LOG_FORMAT.set(format);
}

fn current_format() -> LogFormat {
    LOG_FORMAT.get().copied().unwrap_or_default()
}

/// Write an entry to stderr
pub fn log(entry: LogEntry) {
    let line = entry.render(current_format());
    let _ = writeln!(std::io::stderr().lock(), "{}", line);
}

pub fn log_info(msg: impl Into<String>) {
    log(LogEntry::info(msg));
}

pub fn log_success(msg: impl Into<String>) {
    log(LogEntry::success(msg));
}

pub fn log_warning(msg: impl Into<String>) {
    log(LogEntry::warning(msg));
}

pub fn log_error(msg: impl Into<String>) {
    log(LogEntry::error(msg));
}

pub fn log_info_indent(msg: impl Into<String>, indent: u8) {
    log(LogEntry::info(msg).with_indent(indent));
}
