//! The on-screen event log: timestamped lines, most recent first.

use std::collections::VecDeque;

use chrono::{DateTime, Local};

/// What produced a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogCategory {
    /// Outgoing user message.
    Message,
    /// Response from the submission endpoint.
    Api,
    /// Data received on the stream.
    Sse,
    /// Connection lifecycle notices.
    Status,
    /// Failed submissions.
    Error,
}

impl LogCategory {
    pub fn label(self) -> &'static str {
        match self {
            LogCategory::Message => "message",
            LogCategory::Api => "api",
            LogCategory::Sse => "sse",
            LogCategory::Status => "status",
            LogCategory::Error => "error",
        }
    }
}

/// A single rendered line in the event log.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub category: LogCategory,
    pub text: String,
}

impl LogEntry {
    pub fn new(category: LogCategory, text: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            category,
            text: text.into(),
        }
    }

    /// Local wall-clock time of the entry, `HH:MM:SS`.
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }

    /// `HH:MM:SS - text`
    pub fn render(&self) -> String {
        format!("{} - {}", self.time_label(), self.text)
    }
}

/// Bounded, newest-first list of [`LogEntry`] values.
#[derive(Debug, Clone)]
pub struct EventLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    pushed: u64,
}

impl EventLog {
    /// A capacity of zero is treated as one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            pushed: 0,
        }
    }

    /// Prepend an entry, evicting the oldest if at capacity.
    pub fn push(&mut self, entry: LogEntry) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_back();
        }
        self.entries.push_front(entry);
        self.pushed += 1;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries pushed over the log's lifetime, including evicted ones.
    pub fn total_pushed(&self) -> u64 {
        self.pushed
    }

    /// Entries pushed after the first `seen`, oldest first.
    pub fn since(&self, seen: u64) -> impl Iterator<Item = &LogEntry> {
        let fresh = usize::try_from(self.pushed.saturating_sub(seen)).unwrap_or(usize::MAX);
        self.entries.iter().take(fresh).rev()
    }

    /// Most recent entry.
    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    /// Entries, most recent first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &LogEntry> + ExactSizeIterator {
        self.entries.iter()
    }

    /// Number of entries in `category`.
    pub fn count(&self, category: LogCategory) -> usize {
        self.entries
            .iter()
            .filter(|e| e.category == category)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_is_newest_first() {
        let mut log = EventLog::with_capacity(10);
        log.push(LogEntry::new(LogCategory::Status, "first"));
        log.push(LogEntry::new(LogCategory::Sse, "second"));

        let texts: Vec<_> = log.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["second", "first"]);
        assert_eq!(log.latest().unwrap().category, LogCategory::Sse);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut log = EventLog::with_capacity(2);
        for text in ["a", "b", "c"] {
            log.push(LogEntry::new(LogCategory::Sse, text));
        }
        let texts: Vec<_> = log.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["c", "b"]);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_zero_capacity_keeps_one() {
        let mut log = EventLog::with_capacity(0);
        log.push(LogEntry::new(LogCategory::Api, "x"));
        log.push(LogEntry::new(LogCategory::Api, "y"));
        assert_eq!(log.capacity(), 1);
        assert_eq!(log.latest().unwrap().text, "y");
    }

    #[test]
    fn test_count_by_category() {
        let mut log = EventLog::with_capacity(10);
        log.push(LogEntry::new(LogCategory::Api, "x"));
        log.push(LogEntry::new(LogCategory::Sse, "y"));
        log.push(LogEntry::new(LogCategory::Api, "z"));
        assert_eq!(log.count(LogCategory::Api), 2);
        assert_eq!(log.count(LogCategory::Error), 0);
    }

    #[test]
    fn test_since_returns_fresh_entries_oldest_first() {
        let mut log = EventLog::with_capacity(2);
        log.push(LogEntry::new(LogCategory::Status, "a"));
        let seen = log.total_pushed();
        for text in ["b", "c", "d"] {
            log.push(LogEntry::new(LogCategory::Sse, text));
        }
        let fresh: Vec<_> = log.since(seen).map(|e| e.text.as_str()).collect();
        assert_eq!(fresh, vec!["c", "d"]);
        assert_eq!(log.total_pushed(), 4);
        assert_eq!(log.since(4).count(), 0);
    }

    #[test]
    fn test_render_format() {
        let entry = LogEntry::new(LogCategory::Status, "hello");
        let rendered = entry.render();
        assert!(rendered.ends_with(" - hello"), "unexpected render: {rendered}");
        assert_eq!(entry.time_label().len(), 8);
        assert_eq!(LogCategory::Status.label(), "status");
    }
}
