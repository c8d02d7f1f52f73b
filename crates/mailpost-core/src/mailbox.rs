//! Mailbox client capability traits.
//!
//! The pipeline never speaks a wire protocol itself. A concrete
//! [`MailboxClient`] (POP3, IMAP, a local spool for testing) is injected
//! at construction and hands out one [`MailboxSession`] per cycle.
//!
//! Every operation may fail with
//! [`MailboxError`](mailpost_types::MailboxError); the orchestrator treats
//! any such failure as cycle-fatal and leaves retrying to the next
//! scheduled trigger.

use async_trait::async_trait;

use mailpost_types::{MailboxConfig, MailboxError, MessageId};

/// Content-transfer-encoding declared for a fetched body part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferEncoding {
    /// Plain text (7bit / 8bit / binary).
    #[default]
    SevenBit,
    /// RFC 2045 quoted-printable.
    QuotedPrintable,
    /// RFC 2045 base64.
    Base64,
    /// Anything else; passed through untouched.
    Other,
}

impl TransferEncoding {
    /// Map a `Content-Transfer-Encoding` header value to a variant.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "" | "7bit" | "8bit" | "binary" => Self::SevenBit,
            "quoted-printable" => Self::QuotedPrintable,
            "base64" => Self::Base64,
            _ => Self::Other,
        }
    }
}

/// A body part as fetched from the server.
#[derive(Debug, Clone)]
pub struct FetchedBody {
    /// Raw bytes of the (textual) body part.
    pub bytes: Vec<u8>,
    /// Declared transfer encoding.
    pub encoding: TransferEncoding,
    /// Whether the transport already performed the transfer decode.
    /// When `false` the pipeline decodes per `encoding` before parsing.
    pub decoded: bool,
}

impl FetchedBody {
    /// A body part the transport already decoded.
    pub fn decoded(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            encoding: TransferEncoding::SevenBit,
            decoded: true,
        }
    }

    /// A body part still carrying its declared transfer encoding.
    pub fn encoded(bytes: impl Into<Vec<u8>>, encoding: TransferEncoding) -> Self {
        Self {
            bytes: bytes.into(),
            encoding,
            decoded: false,
        }
    }
}

/// Entry point to a mailbox. One session per cycle.
#[async_trait]
pub trait MailboxClient: Send + Sync {
    /// Connect and authenticate with the supplied credentials.
    async fn connect(
        &self,
        config: &MailboxConfig,
    ) -> Result<Box<dyn MailboxSession>, MailboxError>;
}

/// An authenticated mailbox session.
///
/// Implementations may buffer deletions; [`mark_deleted`](MailboxSession::mark_deleted)
/// followed by [`close`](MailboxSession::close) must make the messages
/// disappear from the next cycle's unseen listing.
#[async_trait]
pub trait MailboxSession: Send {
    /// Ids of unseen messages, in server order. Never re-sorted here.
    async fn list_unseen(&mut self) -> Result<Vec<MessageId>, MailboxError>;

    /// Raw header block for one message.
    async fn fetch_headers(&mut self, id: &MessageId) -> Result<String, MailboxError>;

    /// The textual body part for one message.
    async fn fetch_body(&mut self, id: &MessageId) -> Result<FetchedBody, MailboxError>;

    /// Flag the given messages for deletion.
    async fn mark_deleted(&mut self, ids: &[MessageId]) -> Result<(), MailboxError>;

    /// Commit pending deletions and end the session.
    async fn close(&mut self) -> Result<(), MailboxError>;
}
