//! Mail-to-content ingestion pipeline.
//!
//! One [`Orchestrator`](orchestrator::Orchestrator) drives the whole
//! cycle: rate guard, mailbox session, per-message parsing, record
//! emission, batch cleanup. Everything external is a capability trait
//! injected at construction:
//!
//! ```text
//! Orchestrator::run_cycle()
//!     │
//!     ├── CycleStore          last-checked timestamp (rate guard)
//!     ├── MailboxClient ──connect()──> Box<dyn MailboxSession>
//!     │       list_unseen / fetch_headers / fetch_body / mark_deleted
//!     ├── HeaderBlock + parse_date     subject, author, timestamp
//!     ├── BodyNormalizer               tag stripping, `::` split, title
//!     ├── IdentityResolver             author address -> owner + rights
//!     └── ContentSink                  one ContentRecord per message
//! ```
//!
//! Failure policy: a mailbox error aborts the cycle, a bad message never
//! does, and nothing here is fatal to the host process.

pub mod body;
pub mod decode;
pub mod headers;
pub mod mailbox;
pub mod orchestrator;
pub mod runlog;
pub mod sink;
pub mod state;

pub use body::{BodyNormalizer, ContentFilter, NormalizedBody};
pub use headers::{HeaderBlock, PHONE_DELIMITER};
pub use mailbox::{FetchedBody, MailboxClient, MailboxSession, TransferEncoding};
pub use orchestrator::{CycleOutcome, Orchestrator};
pub use runlog::RunLog;
pub use sink::{ContentSink, IdentityResolver};
pub use state::{CycleStore, MemoryCycleStore};
