//! JSON-file persistence for cycle state and the activity log.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mailpost_core::state::CycleStore;
use mailpost_types::{LogEntry, StoreError};

/// On-disk shape of the state file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StateFile {
    #[serde(default)]
    last_checked: Option<DateTime<Utc>>,
    #[serde(default)]
    log: Vec<LogEntry>,
}

/// Cycle state persisted to a single JSON file.
///
/// Each operation reads and rewrites the whole file; the state is a
/// timestamp and a bounded log, so this stays cheap. A missing file
/// reads as empty state.
pub struct FileCycleStore {
    path: PathBuf,
}

impl FileCycleStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    async fn load(&self) -> Result<StateFile, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StateFile::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, state: &StateFile) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let raw = serde_json::to_vec_pretty(state)?;
        tokio::fs::write(&self.path, raw).await?;
        Ok(())
    }

    /// Prepend fresh activity-log entries (most-recent-first) and
    /// truncate to `retention` entries.
    pub async fn prepend_log(
        &self,
        fresh: &[LogEntry],
        retention: usize,
    ) -> Result<(), StoreError> {
        let mut state = self.load().await?;
        let mut log = Vec::with_capacity(fresh.len() + state.log.len());
        log.extend_from_slice(fresh);
        log.append(&mut state.log);
        log.truncate(retention);
        state.log = log;
        self.save(&state).await
    }

    /// The most recent `limit` activity-log entries.
    pub async fn recent_log(&self, limit: usize) -> Result<Vec<LogEntry>, StoreError> {
        let mut state = self.load().await?;
        state.log.truncate(limit);
        Ok(state.log)
    }
}

#[async_trait]
impl CycleStore for FileCycleStore {
    async fn last_checked(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        Ok(self.load().await?.last_checked)
    }

    async fn set_last_checked(&self, at: DateTime<Utc>) -> Result<(), StoreError> {
        let mut state = self.load().await?;
        state.last_checked = Some(at);
        self.save(&state).await
    }
}
