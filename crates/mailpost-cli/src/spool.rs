//! Local spool-directory mailbox adapter.
//!
//! Reads `.eml` files from a directory and behaves like a minimal
//! mailbox: filenames are message ids, listing is name-ordered, and
//! deletions are buffered until `close`, the way a POP3 server commits
//! at QUIT. This is the adapter the CLI ships with; a wire-protocol
//! client drops in behind the same [`MailboxClient`] trait.

use std::path::PathBuf;

use async_trait::async_trait;

use mailpost_core::headers::HeaderBlock;
use mailpost_core::mailbox::{FetchedBody, MailboxClient, MailboxSession, TransferEncoding};
use mailpost_types::{MailboxConfig, MailboxError, MessageId};

/// Mailbox over a local spool directory.
pub struct SpoolMailbox {
    dir: PathBuf,
}

impl SpoolMailbox {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

#[async_trait]
impl MailboxClient for SpoolMailbox {
    async fn connect(
        &self,
        _config: &MailboxConfig,
    ) -> Result<Box<dyn MailboxSession>, MailboxError> {
        if !tokio::fs::try_exists(&self.dir).await.unwrap_or(false) {
            return Err(MailboxError::Connection(format!(
                "spool directory {} does not exist",
                self.dir.display()
            )));
        }
        Ok(Box::new(SpoolSession {
            dir: self.dir.clone(),
            pending_deletes: Vec::new(),
        }))
    }
}

struct SpoolSession {
    dir: PathBuf,
    pending_deletes: Vec<MessageId>,
}

impl SpoolSession {
    async fn read_message(&self, id: &MessageId) -> Result<String, MailboxError> {
        let path = self.dir.join(&id.0);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| MailboxError::Protocol(format!("could not read {id}: {e}")))
    }
}

#[async_trait]
impl MailboxSession for SpoolSession {
    async fn list_unseen(&mut self) -> Result<Vec<MessageId>, MailboxError> {
        let mut names = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.ends_with(".eml") {
                names.push(name);
            }
        }
        names.sort();
        Ok(names.into_iter().map(MessageId::new).collect())
    }

    async fn fetch_headers(&mut self, id: &MessageId) -> Result<String, MailboxError> {
        let raw = self.read_message(id).await?;
        Ok(split_message(&raw).0.to_string())
    }

    async fn fetch_body(&mut self, id: &MessageId) -> Result<FetchedBody, MailboxError> {
        let raw = self.read_message(id).await?;
        let (headers, body) = split_message(&raw);
        let encoding = HeaderBlock::parse(headers)
            .get("Content-Transfer-Encoding")
            .map(TransferEncoding::from_label)
            .unwrap_or_default();
        Ok(FetchedBody::encoded(body.as_bytes(), encoding))
    }

    async fn mark_deleted(&mut self, ids: &[MessageId]) -> Result<(), MailboxError> {
        self.pending_deletes.extend_from_slice(ids);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), MailboxError> {
        for id in self.pending_deletes.drain(..) {
            let path = self.dir.join(&id.0);
            tokio::fs::remove_file(&path).await?;
        }
        Ok(())
    }
}

/// Split a raw message into header block and body at the first blank line.
fn split_message(raw: &str) -> (&str, &str) {
    for sep in ["\r\n\r\n", "\n\n"] {
        if let Some(pos) = raw.find(sep) {
            return (&raw[..pos], &raw[pos + sep.len()..]);
        }
    }
    (raw, "")
}
