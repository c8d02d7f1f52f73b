//! Error taxonomy for the ingestion pipeline.
//!
//! [`MailboxError`] is cycle-fatal: the orchestrator logs it and gives up
//! until the next scheduled trigger. [`SinkError`] is a per-message
//! failure that never aborts the batch. [`StoreError`] covers cycle-state
//! persistence. None of these are ever fatal to the host process.

use thiserror::Error;

/// Failures raised by the mailbox client adapter.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MailboxError {
    /// Could not reach the mail server.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The server rejected the supplied credentials.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The server violated, or we failed to follow, the mail protocol.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Underlying I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures raised by the downstream content sink.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SinkError {
    /// The sink refused the record (validation, permissions, duplicates).
    #[error("content rejected: {0}")]
    Rejected(String),

    /// The sink could not be reached at all.
    #[error("sink unavailable: {0}")]
    Unavailable(String),
}

/// Failures raised by cycle-state persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// State file contents could not be (de)serialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
