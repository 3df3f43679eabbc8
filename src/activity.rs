//! Activity log and the overall system status shown on the dashboard.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Info,
    Success,
    Error,
}

impl LogKind {
    pub fn label(&self) -> &'static str {
        match self {
            LogKind::Info => "INFO",
            LogKind::Success => "OK",
            LogKind::Error => "ERROR",
        }
    }
}

/// One line of the activity log. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub kind: LogKind,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {:<5} {}", self.timestamp, self.kind.label(), self.message)
    }
}

/// Append-only, chronological log. The only removal is [`LogStore::clear`].
#[derive(Debug, Clone, Default)]
pub struct LogStore {
    entries: Vec<LogEntry>,
}

impl LogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp `message` with the current local time and push it to the end.
    pub fn append(&mut self, message: impl Into<String>, kind: LogKind) {
        let timestamp = chrono::Local::now().format("%H:%M:%S").to_string();
        self.entries.push(LogEntry {
            timestamp,
            kind,
            message: message.into(),
        });
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn list(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &LogEntry> + ExactSizeIterator {
        self.entries.iter()
    }
}

/// Outcome of the most recent pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemStatus {
    #[default]
    Inactive,
    Active,
    Error,
}

impl SystemStatus {
    pub fn title(&self) -> &'static str {
        match self {
            SystemStatus::Inactive => "Inactive",
            SystemStatus::Active => "Active",
            SystemStatus::Error => "Error",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SystemStatus::Active => "Your automated LinkedIn posting system is running.",
            _ => "Your automated LinkedIn posting system is ready to test.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_grows_by_one_and_keeps_order() {
        let mut store = LogStore::new();
        for i in 0..10 {
            store.append(format!("line {}", i), LogKind::Info);
            assert_eq!(store.len(), i + 1);
        }
        let messages: Vec<&str> = store.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages.first(), Some(&"line 0"));
        assert_eq!(messages.last(), Some(&"line 9"));
        assert!(messages.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_clear_empties_any_store() {
        let mut store = LogStore::new();
        store.clear();
        assert!(store.is_empty());

        store.append("a", LogKind::Info);
        store.append("b", LogKind::Error);
        store.clear();
        assert!(store.is_empty());
        assert!(store.last().is_none());
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut store = LogStore::new();
        store.append("same", LogKind::Success);
        store.append("same", LogKind::Success);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_timestamp_is_wall_clock_time() {
        let mut store = LogStore::new();
        store.append("tick", LogKind::Info);
        let ts = &store.list()[0].timestamp;
        assert_eq!(ts.len(), 8);
        assert!(chrono::NaiveTime::parse_from_str(ts, "%H:%M:%S").is_ok());
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let entry = LogEntry {
            timestamp: "10:00:00".to_string(),
            kind: LogKind::Success,
            message: "done".to_string(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["kind"], "success");
        assert_eq!(json["message"], "done");
    }

    #[test]
    fn test_status_defaults_to_inactive() {
        assert_eq!(SystemStatus::default(), SystemStatus::Inactive);
        assert_eq!(SystemStatus::Error.title(), "Error");
    }
}
