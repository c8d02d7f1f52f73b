//! Message identifiers and the emitted content record.

use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Server-assigned message identifier. Opaque to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl MessageId {
    /// Wrap a server-assigned identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to a content owner in the downstream store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerRef(pub u64);

/// Identifier of a created content record, assigned by the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentId(pub u64);

/// Publication status of an emitted record.
///
/// `Publish` requires a resolved owner with publishing rights; everything
/// else lands as `Pending` for a human to review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    Publish,
    Pending,
}

/// The normalized unit emitted per processed message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentRecord {
    /// Record title: embedded title marker if present, else the subject.
    pub title: String,
    /// Sanitized body (allow-listed HTML subset).
    pub body: String,
    /// Authoring instant in UTC.
    pub authored_at_utc: DateTime<Utc>,
    /// The same instant shifted to the site display offset.
    pub authored_at_local: DateTime<FixedOffset>,
    /// Resolved owner, or the configured fallback.
    pub owner: OwnerRef,
    /// The configured default category.
    pub category: String,
    /// Publication status.
    pub status: ContentStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn status_serde_values() {
        assert_eq!(
            serde_json::to_string(&ContentStatus::Publish).unwrap(),
            "\"publish\""
        );
        assert_eq!(
            serde_json::to_string(&ContentStatus::Pending).unwrap(),
            "\"pending\""
        );
    }

    #[test]
    fn message_id_display() {
        assert_eq!(MessageId::new("42").to_string(), "42");
    }

    #[test]
    fn record_serde_roundtrip() {
        let utc = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let record = ContentRecord {
            title: "Vacation notice".into(),
            body: "Back on Monday".into(),
            authored_at_utc: utc,
            authored_at_local: utc.fixed_offset(),
            owner: OwnerRef(7),
            category: "inbox".into(),
            status: ContentStatus::Publish,
        };
        let json = serde_json::to_string(&record).unwrap();
        let restored: ContentRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.title, "Vacation notice");
        assert_eq!(restored.owner, OwnerRef(7));
        assert_eq!(restored.status, ContentStatus::Publish);
        assert_eq!(restored.authored_at_utc, utc);
    }
}
