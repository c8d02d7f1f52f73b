//! Concrete sink and identity resolution for the CLI.
//!
//! [`JsonDirSink`] writes one JSON file per content record; downstream
//! tooling picks them up from there. [`StaticResolver`] resolves authors
//! from the config file's `authors` list.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use mailpost_core::sink::{ContentSink, IdentityResolver};
use mailpost_types::{ContentId, ContentRecord, OwnerRef, SinkError};

/// One configured author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorEntry {
    /// Email address, matched case-insensitively.
    pub email: String,
    /// Owner id assigned to this author's records.
    pub owner: u64,
    /// Whether records land as `publish` instead of `pending`.
    #[serde(default, alias = "canPublish")]
    pub can_publish: bool,
}

/// Resolves authors from the static config list.
pub struct StaticResolver {
    authors: Vec<AuthorEntry>,
}

impl StaticResolver {
    pub fn new(authors: Vec<AuthorEntry>) -> Self {
        Self { authors }
    }
}

#[async_trait]
impl IdentityResolver for StaticResolver {
    async fn resolve_by_email(&self, address: &str) -> Option<OwnerRef> {
        self.authors
            .iter()
            .find(|a| a.email.eq_ignore_ascii_case(address))
            .map(|a| OwnerRef(a.owner))
    }

    async fn can_publish(&self, owner: OwnerRef) -> bool {
        self.authors
            .iter()
            .any(|a| OwnerRef(a.owner) == owner && a.can_publish)
    }
}

/// Writes each content record as a pretty-printed JSON file.
pub struct JsonDirSink {
    dir: PathBuf,
    next_id: AtomicU64,
}

impl JsonDirSink {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            next_id: AtomicU64::new(1),
        }
    }
}

#[async_trait]
impl ContentSink for JsonDirSink {
    async fn create_content(&self, record: &ContentRecord) -> Result<ContentId, SinkError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| SinkError::Unavailable(e.to_string()))?;

        let raw = serde_json::to_vec_pretty(record)
            .map_err(|e| SinkError::Rejected(e.to_string()))?;

        // Skip over ids already used by a previous process.
        loop {
            let id = self.next_id.fetch_add(1, Ordering::Relaxed);
            let path = self.dir.join(format!("post-{id:06}.json"));
            if tokio::fs::try_exists(&path)
                .await
                .map_err(|e| SinkError::Unavailable(e.to_string()))?
            {
                continue;
            }
            tokio::fs::write(&path, &raw)
                .await
                .map_err(|e| SinkError::Unavailable(e.to_string()))?;
            debug!(path = %path.display(), "content record written");
            return Ok(ContentId(id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{TimeZone, Utc};
    use mailpost_types::ContentStatus;

    fn record(title: &str) -> ContentRecord {
        let utc = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        ContentRecord {
            title: title.into(),
            body: "body".into(),
            authored_at_utc: utc,
            authored_at_local: utc.fixed_offset(),
            owner: OwnerRef(1),
            category: String::new(),
            status: ContentStatus::Pending,
        }
    }

    fn temp_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("mailpost-sink-{tag}-{}", std::process::id()))
    }

    #[tokio::test]
    async fn resolver_matches_case_insensitively() {
        let resolver = StaticResolver::new(vec![AuthorEntry {
            email: "Jane@Example.com".into(),
            owner: 7,
            can_publish: true,
        }]);

        assert_eq!(
            resolver.resolve_by_email("jane@example.com").await,
            Some(OwnerRef(7))
        );
        assert_eq!(resolver.resolve_by_email("other@example.com").await, None);
        assert!(resolver.can_publish(OwnerRef(7)).await);
        assert!(!resolver.can_publish(OwnerRef(9)).await);
    }

    #[tokio::test]
    async fn sink_writes_sequential_files() {
        let dir = temp_dir("seq");
        let _ = tokio::fs::remove_dir_all(&dir).await;
        let sink = JsonDirSink::new(dir.clone());

        let first = sink.create_content(&record("one")).await.unwrap();
        let second = sink.create_content(&record("two")).await.unwrap();
        assert_ne!(first, second);

        let written = dir.join(format!("post-{:06}.json", first.0));
        let raw = tokio::fs::read_to_string(written).await.unwrap();
        let restored: ContentRecord = serde_json::from_str(&raw).unwrap();
        assert_eq!(restored.title, "one");

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn sink_skips_existing_files() {
        let dir = temp_dir("skip");
        let _ = tokio::fs::remove_dir_all(&dir).await;
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(dir.join("post-000001.json"), b"{}")
            .await
            .unwrap();

        let sink = JsonDirSink::new(dir.clone());
        let id = sink.create_content(&record("fresh")).await.unwrap();
        assert_eq!(id, ContentId(2));

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
