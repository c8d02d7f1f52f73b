//! Cycle-state persistence.
//!
//! The last-checked timestamp is both the rate guard and the soft lock
//! against overlapping cycles, so it must be persisted before any network
//! I/O happens. Storage lives outside the pipeline; implementations only
//! need get/set with read-your-writes consistency within a cycle.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use mailpost_types::StoreError;

/// Persistence for the last-checked timestamp.
#[async_trait]
pub trait CycleStore: Send + Sync {
    /// When a cycle last got past the rate guard, if ever.
    async fn last_checked(&self) -> Result<Option<DateTime<Utc>>, StoreError>;

    /// Persist the new last-checked instant.
    async fn set_last_checked(&self, at: DateTime<Utc>) -> Result<(), StoreError>;
}

/// In-memory store for tests and single-process embedding.
#[derive(Debug, Default)]
pub struct MemoryCycleStore {
    last: Mutex<Option<DateTime<Utc>>>,
}

impl MemoryCycleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with an existing timestamp.
    pub fn with_last_checked(at: DateTime<Utc>) -> Self {
        Self {
            last: Mutex::new(Some(at)),
        }
    }
}

#[async_trait]
impl CycleStore for MemoryCycleStore {
    async fn last_checked(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        Ok(*self.last.lock().unwrap_or_else(PoisonError::into_inner))
    }

    async fn set_last_checked(&self, at: DateTime<Utc>) -> Result<(), StoreError> {
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(at);
        Ok(())
    }
}
