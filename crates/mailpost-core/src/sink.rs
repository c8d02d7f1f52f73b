//! Downstream capability traits: content sink and identity resolution.
//!
//! The content store and its author model are external collaborators.
//! The pipeline only needs to create records and to map an email address
//! to an owner with or without publishing rights.

use async_trait::async_trait;

use mailpost_types::{ContentId, ContentRecord, OwnerRef, SinkError};

/// The downstream content store.
#[async_trait]
pub trait ContentSink: Send + Sync {
    /// Create one content record. Rejection is a per-message failure;
    /// the batch continues without it.
    async fn create_content(&self, record: &ContentRecord) -> Result<ContentId, SinkError>;
}

/// Author identity resolution in the downstream store.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Look up an owner by email address. `None` when unknown.
    async fn resolve_by_email(&self, address: &str) -> Option<OwnerRef>;

    /// Whether the owner may publish directly (vs. landing as pending).
    async fn can_publish(&self, owner: OwnerRef) -> bool;
}
