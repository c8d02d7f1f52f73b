//! Activity log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One line of the ingestion activity log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// When the entry was recorded.
    pub timestamp: DateTime<Utc>,
    /// Free-text message.
    pub message: String,
}

impl LogEntry {
    /// Create an entry stamped with the current time.
    pub fn now(message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            message: message.into(),
        }
    }
}
