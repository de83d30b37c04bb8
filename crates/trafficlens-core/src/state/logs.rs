use std::fmt;

use chrono::NaiveTime;

use crate::model::LogKind;

/// When a log entry was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStamp {
    /// Local wall-clock time of arrival.
    Clock(NaiveTime),
    /// Entries produced by the dashboard itself.
    System,
}

impl fmt::Display for LogStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clock(time) => write!(f, "[{}]", time.format("%H:%M:%S")),
            Self::System => f.write_str("[SYSTEM]"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub stamp: LogStamp,
    pub message: String,
    pub kind: LogKind,
}

impl LogEntry {
    pub fn at(time: NaiveTime, message: impl Into<String>, kind: LogKind) -> Self {
        Self {
            stamp: LogStamp::Clock(time),
            message: message.into(),
            kind,
        }
    }

    pub fn system(message: impl Into<String>) -> Self {
        Self {
            stamp: LogStamp::System,
            message: message.into(),
            kind: LogKind::Message,
        }
    }
}

/// Append-only log panel contents, oldest first.
#[derive(Debug, Clone, Default)]
pub struct LogPanel {
    entries: Vec<LogEntry>,
}

impl LogPanel {
    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    /// Drop everything and start over with a single entry.
    pub fn reset(&mut self, entry: LogEntry) {
        self.entries.clear();
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
