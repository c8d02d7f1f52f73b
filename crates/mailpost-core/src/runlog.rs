//! Prepend-ordered activity log.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use mailpost_types::LogEntry;

/// Activity log consumed by an external status view. Entries are kept
/// most-recent-first; retention and truncation belong to whoever
/// persists the snapshot.
#[derive(Debug, Default)]
pub struct RunLog {
    entries: Mutex<VecDeque<LogEntry>>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend an entry stamped with the current time.
    pub fn append(&self, message: impl Into<String>) {
        let entry = LogEntry::now(message);
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_front(entry);
    }

    /// Snapshot of all entries, most recent first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn most_recent_entry_comes_first() {
        let log = RunLog::new();
        log.append("first");
        log.append("second");

        let entries = log.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "second");
        assert_eq!(entries[1].message, "first");
    }

    #[test]
    fn duplicate_messages_are_kept() {
        let log = RunLog::new();
        log.append("no new mail");
        log.append("no new mail");
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn starts_empty() {
        assert!(RunLog::new().is_empty());
    }
}
