//! Conversion progress feed.
//!
//! The pipeline publishes one entry per stage to a process-wide channel.
//! Nothing is printed here: the caller subscribes with [`LogFeed::subscribe`]
//! before converting and decides how to show progress and the failure
//! message (`處理失敗：…`) once the conversion returns.

use once_cell::sync::Lazy;
use serde::Serialize;
use tokio::sync::broadcast::{self, error::TryRecvError};

/// Entries kept for a subscriber that has not drained yet
const FEED_CAPACITY: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Detail lines under a stage use 1
    pub indent: u8,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self { level, message: message.into(), indent: 0 }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    /// One terminal line: indentation, level marker, message.
    pub fn render(&self) -> String {
        let marker = match self.level {
            LogLevel::Info => "  ",
            LogLevel::Success => "✓",
            LogLevel::Warning => "⚠️",
            LogLevel::Error => "❌",
        };
        format!("{}   {} {}", "   ".repeat(self.indent as usize), marker, self.message)
    }
}

static FEED: Lazy<broadcast::Sender<LogEntry>> = Lazy::new(|| broadcast::channel(FEED_CAPACITY).0);

/// Publish an entry; dropped when nobody is subscribed.
pub fn publish(entry: LogEntry) {
    let _ = FEED.send(entry);
}

pub fn log_info(msg: impl Into<String>) {
    publish(LogEntry::new(LogLevel::Info, msg));
}

pub fn log_success(msg: impl Into<String>) {
    publish(LogEntry::new(LogLevel::Success, msg));
}

pub fn log_warning(msg: impl Into<String>) {
    publish(LogEntry::new(LogLevel::Warning, msg));
}

pub fn log_error(msg: impl Into<String>) {
    publish(LogEntry::new(LogLevel::Error, msg));
}

pub fn log_info_indent(msg: impl Into<String>, indent: u8) {
    publish(LogEntry::new(LogLevel::Info, msg).with_indent(indent));
}

/// A subscriber's view of the feed.
pub struct LogFeed {
    receiver: broadcast::Receiver<LogEntry>,
}

impl LogFeed {
    /// Receive every entry published from now on.
    pub fn subscribe() -> Self {
        Self { receiver: FEED.subscribe() }
    }

    /// Take all pending entries without blocking.
    ///
    /// If the subscriber fell behind, the oldest entries are skipped.
    pub fn drain(&mut self) -> Vec<LogEntry> {
        let mut entries = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(entry) => entries.push(entry),
                Err(TryRecvError::Lagged(_)) => continue,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        entries
    }
}

/// Message of the last error-level entry, if any.
pub fn last_error(entries: &[LogEntry]) -> Option<&str> {
    entries
        .iter()
        .rev()
        .find(|e| e.level == LogLevel::Error)
        .map(|e| e.message.as_str())
}
