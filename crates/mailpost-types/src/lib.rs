//! Core types for the mailpost ingestion service.
//!
//! Shared between the pipeline crate (`mailpost-core`) and the CLI:
//! mailbox configuration, the emitted [`ContentRecord`], activity
//! [`LogEntry`] values, and the error taxonomy. Credential fields use
//! [`SecretString`] so secrets never reach logs or serialized output.

pub mod config;
pub mod error;
pub mod log;
pub mod record;
pub mod secret;

pub use config::MailboxConfig;
pub use error::{MailboxError, SinkError, StoreError};
pub use log::LogEntry;
pub use record::{ContentId, ContentRecord, ContentStatus, MessageId, OwnerRef};
pub use secret::SecretString;
