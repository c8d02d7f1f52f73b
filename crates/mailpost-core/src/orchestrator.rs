//! Ingestion cycle orchestration.
//!
//! One [`Orchestrator`] is constructed at process start and driven by an
//! external trigger (scheduler tick or manual check). Each invocation of
//! [`run_cycle`](Orchestrator::run_cycle) walks the cycle state machine:
//!
//! ```text
//! Idle -> RateCheck -> Connecting -> Listing
//!      -> [NoMessages | ProcessingLoop] -> Cleanup -> Idle
//! ```
//!
//! Failure policy (in order of blast radius):
//! - missing configuration or a too-recent check skip the cycle with one
//!   log line and no network I/O
//! - a mailbox error aborts the cycle; the next trigger retries from
//!   scratch, and nothing is deleted unless the cycle reached Cleanup
//! - a bad message or sink rejection is logged and skipped; the message
//!   is still deleted so it is never reprocessed
//! - nothing here is fatal to the host process

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, info, warn};

use mailpost_types::{
    ContentRecord, ContentStatus, MailboxConfig, MailboxError, MessageId, OwnerRef,
};

use crate::body::BodyNormalizer;
use crate::decode::body_text;
use crate::headers::{self, HeaderBlock};
use crate::mailbox::{MailboxClient, MailboxSession};
use crate::runlog::RunLog;
use crate::sink::{ContentSink, IdentityResolver};
use crate::state::CycleStore;

/// Terminal outcome of one ingestion cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Skipped: the previous check was too recent.
    RateLimited,
    /// Skipped: credentials are missing or still placeholders.
    NotConfigured,
    /// Aborted on a mailbox failure; nothing was deleted.
    Aborted,
    /// The unseen listing was empty.
    NoMail,
    /// The processing loop ran to Cleanup.
    Completed {
        /// Messages listed and processed (successfully or not).
        processed: usize,
        /// Records accepted by the sink.
        posted: usize,
        /// Messages that failed parsing or were rejected by the sink.
        failed: usize,
    },
}

/// Per-message failure classification inside the processing loop.
enum MessageFailure {
    /// Mailbox adapter failure: cycle-fatal.
    Fatal(MailboxError),
    /// Parse or sink failure: log, continue, still delete.
    Skipped(String),
}

/// Drives the full ingestion cycle against injected capabilities.
pub struct Orchestrator {
    config: MailboxConfig,
    client: Arc<dyn MailboxClient>,
    sink: Arc<dyn ContentSink>,
    resolver: Arc<dyn IdentityResolver>,
    store: Arc<dyn CycleStore>,
    run_log: Arc<RunLog>,
    normalizer: BodyNormalizer,
}

impl Orchestrator {
    pub fn new(
        config: MailboxConfig,
        client: Arc<dyn MailboxClient>,
        sink: Arc<dyn ContentSink>,
        resolver: Arc<dyn IdentityResolver>,
        store: Arc<dyn CycleStore>,
    ) -> Self {
        Self {
            config,
            client,
            sink,
            resolver,
            store,
            run_log: Arc::new(RunLog::new()),
            normalizer: BodyNormalizer::new(),
        }
    }

    /// Replace the default body normalizer (e.g. to install content
    /// filter hooks).
    pub fn with_normalizer(mut self, normalizer: BodyNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// The activity log written by cycles.
    pub fn run_log(&self) -> Arc<RunLog> {
        Arc::clone(&self.run_log)
    }

    /// Record a line in the activity log and the tracing stream.
    fn log(&self, message: impl Into<String>) {
        let message = message.into();
        info!("{message}");
        self.run_log.append(message);
    }

    /// Run one ingestion cycle to a terminal outcome.
    pub async fn run_cycle(&self) -> CycleOutcome {
        let now = Utc::now();

        // Rate guard. The persisted timestamp doubles as a soft lock
        // against overlapping cycles, so it is written before any
        // network I/O.
        match self.store.last_checked().await {
            Ok(Some(last)) if !self.config.debug_override => {
                let min = Duration::seconds(self.config.min_check_interval_secs as i64);
                if now.signed_duration_since(last) < min {
                    self.log("Checked too recently; skipping this cycle.");
                    return CycleOutcome::RateLimited;
                }
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "could not read cycle state; proceeding"),
        }
        if let Err(e) = self.store.set_last_checked(now).await {
            warn!(error = %e, "could not persist last-checked timestamp");
        }

        if !self.config.is_configured() {
            self.log("Options not set; skipping.");
            return CycleOutcome::NotConfigured;
        }

        debug!(
            host = %self.config.mailserver_url,
            port = self.config.mailserver_port,
            "connecting to mailbox"
        );
        let mut session = match self.client.connect(&self.config).await {
            Ok(session) => session,
            Err(e) => {
                self.log(format!("An error occurred: {e}"));
                return CycleOutcome::Aborted;
            }
        };

        let ids = match session.list_unseen().await {
            Ok(ids) => ids,
            Err(e) => {
                self.log(format!("An error occurred: {e}"));
                let _ = session.close().await;
                return CycleOutcome::Aborted;
            }
        };

        if ids.is_empty() {
            let _ = session.close().await;
            self.log("There doesn't seem to be any new mail.");
            return CycleOutcome::NoMail;
        }

        let mut posted = 0usize;
        let mut failed = 0usize;
        for id in &ids {
            match self.process_message(&mut *session, id).await {
                Ok(entry) => {
                    posted += 1;
                    self.log(entry);
                }
                Err(MessageFailure::Skipped(reason)) => {
                    failed += 1;
                    self.log(reason);
                }
                Err(MessageFailure::Fatal(e)) => {
                    // Adapter failure mid-loop: give up without deleting
                    // anything; the next cycle starts over.
                    self.log(format!("An error occurred: {e}"));
                    let _ = session.close().await;
                    return CycleOutcome::Aborted;
                }
            }
        }

        // Every listed message is deleted, posted or not; reprocessing a
        // malformed email each cycle would make no progress.
        if let Err(e) = session.mark_deleted(&ids).await {
            self.log(format!("An error occurred: {e}"));
        }
        if let Err(e) = session.close().await {
            warn!(error = %e, "could not close mailbox session");
        }

        CycleOutcome::Completed {
            processed: ids.len(),
            posted,
            failed,
        }
    }

    /// Fetch, parse, normalize, and submit one message. Returns the
    /// activity-log line for a successful post.
    async fn process_message(
        &self,
        session: &mut dyn MailboxSession,
        id: &MessageId,
    ) -> Result<String, MessageFailure> {
        let raw_headers = session
            .fetch_headers(id)
            .await
            .map_err(MessageFailure::Fatal)?;
        let fetched = session.fetch_body(id).await.map_err(MessageFailure::Fatal)?;

        let parsed = HeaderBlock::parse(&raw_headers);
        let subject = parsed.subject();

        let mut owner = OwnerRef(self.config.fallback_owner);
        let mut author_found = false;
        let mut log_line = String::new();
        if let Some(candidate) = parsed.author_candidate() {
            let address = headers::extract_bare_address(candidate);
            if headers::is_valid_address(&address) {
                log_line.push_str(&format!("Author is {address}. "));
                if let Some(resolved) = self.resolver.resolve_by_email(&address).await {
                    owner = resolved;
                    author_found = true;
                } else {
                    debug!(address = %address, "author not found; using fallback owner");
                }
            }
        }

        // Both timestamps come from one instant; a date that does not
        // parse falls back to the cycle's current time.
        let authored_at_utc = parsed
            .date()
            .and_then(headers::parse_date)
            .unwrap_or_else(Utc::now);
        let authored_at_local =
            headers::site_local(authored_at_utc, self.config.site_utc_offset_secs);

        let normalized = self.normalizer.normalize(&body_text(&fetched));

        let status = if author_found && self.resolver.can_publish(owner).await {
            ContentStatus::Publish
        } else {
            ContentStatus::Pending
        };

        let title = normalized.title.unwrap_or(subject);

        let record = ContentRecord {
            title: title.clone(),
            body: normalized.body,
            authored_at_utc,
            authored_at_local,
            owner,
            category: self.config.default_email_category.clone(),
            status,
        };

        match self.sink.create_content(&record).await {
            Ok(content_id) => {
                debug!(message = %id, content = content_id.0, "content record created");
                log_line.push_str(&format!("Author: {}. Posted title: {title}.", owner.0));
                Ok(log_line)
            }
            Err(e) => Err(MessageFailure::Skipped(format!(
                "Could not post message {id}: {e}"
            ))),
        }
    }
}
