//! Command implementations and shared wiring.

pub mod check;
pub mod log;
pub mod run;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::debug;

use mailpost_core::orchestrator::{CycleOutcome, Orchestrator};
use mailpost_types::MailboxConfig;

use crate::sink::{AuthorEntry, JsonDirSink, StaticResolver};
use crate::spool::SpoolMailbox;
use crate::store::FileCycleStore;

/// Default config file, looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "mailpost.json";

/// Full CLI configuration: the pipeline config plus local wiring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Pipeline configuration (credentials, intervals, category).
    #[serde(default)]
    pub mailbox: MailboxConfig,

    /// Directory the bundled spool adapter reads `.eml` files from.
    #[serde(default = "default_spool_dir", alias = "spoolDir")]
    pub spool_dir: PathBuf,

    /// Where cycle state and the activity log are persisted.
    #[serde(default = "default_state_path", alias = "statePath")]
    pub state_path: PathBuf,

    /// Directory content records are written into, one JSON file each.
    #[serde(default = "default_output_dir", alias = "outputDir")]
    pub output_dir: PathBuf,

    /// Seconds between scheduled cycles in `mailpost run`.
    #[serde(default = "default_check_interval", alias = "checkIntervalSecs")]
    pub check_interval_secs: u64,

    /// Maximum persisted activity-log entries.
    #[serde(default = "default_log_retention", alias = "logRetention")]
    pub log_retention: usize,

    /// Known authors for identity resolution.
    #[serde(default)]
    pub authors: Vec<AuthorEntry>,
}

fn default_spool_dir() -> PathBuf {
    PathBuf::from("spool")
}
fn default_state_path() -> PathBuf {
    PathBuf::from("mailpost-state.json")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("posts")
}
fn default_check_interval() -> u64 {
    3600
}
fn default_log_retention() -> usize {
    100
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            mailbox: MailboxConfig::default(),
            spool_dir: default_spool_dir(),
            state_path: default_state_path(),
            output_dir: default_output_dir(),
            check_interval_secs: default_check_interval(),
            log_retention: default_log_retention(),
            authors: Vec::new(),
        }
    }
}

/// Load configuration from `path`, or from [`DEFAULT_CONFIG_PATH`].
///
/// A missing default config is not an error; the pipeline's own guard
/// reports unconfigured credentials with a single log line. An explicit
/// `--config` path that does not exist is an error.
pub async fn load_config(path: Option<&Path>) -> anyhow::Result<CliConfig> {
    let (path, required) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
    };

    match tokio::fs::read_to_string(&path).await {
        Ok(raw) => {
            let config: CliConfig = serde_json::from_str(&raw)
                .with_context(|| format!("invalid config file {}", path.display()))?;
            debug!(path = %path.display(), "loaded config");
            Ok(config)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
            debug!(path = %path.display(), "no config file; using defaults");
            Ok(CliConfig::default())
        }
        Err(e) => Err(e).with_context(|| format!("could not read config file {}", path.display())),
    }
}

/// A wired application: the orchestrator plus the store the CLI also
/// uses to persist the activity log.
pub struct App {
    pub orchestrator: Orchestrator,
    pub store: Arc<FileCycleStore>,
    pub log_retention: usize,
}

/// Construct the orchestrator with the CLI's concrete capabilities.
pub fn build_app(config: CliConfig) -> App {
    let store = Arc::new(FileCycleStore::new(config.state_path.clone()));
    let orchestrator = Orchestrator::new(
        config.mailbox,
        Arc::new(SpoolMailbox::new(config.spool_dir)),
        Arc::new(JsonDirSink::new(config.output_dir)),
        Arc::new(StaticResolver::new(config.authors)),
        store.clone(),
    );
    App {
        orchestrator,
        store,
        log_retention: config.log_retention,
    }
}

impl App {
    /// Run one cycle and persist the activity-log lines it produced.
    pub async fn run_cycle(&self) -> CycleOutcome {
        let log = self.orchestrator.run_log();
        let before = log.len();
        let outcome = self.orchestrator.run_cycle().await;

        let entries = log.entries();
        let fresh = &entries[..entries.len() - before];
        if !fresh.is_empty()
            && let Err(e) = self.store.prepend_log(fresh, self.log_retention).await
        {
            tracing::warn!(error = %e, "could not persist activity log");
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = CliConfig::default();
        assert_eq!(cfg.spool_dir, PathBuf::from("spool"));
        assert_eq!(cfg.check_interval_secs, 3600);
        assert_eq!(cfg.log_retention, 100);
        assert!(cfg.authors.is_empty());
    }

    #[test]
    fn config_parses_with_partial_fields() {
        let json = r#"{
            "mailbox": {
                "mailserverUrl": "pop.example.org",
                "mailserverLogin": "ingest@example.org",
                "mailserverPass": "s3cret"
            },
            "spoolDir": "/var/mail/spool",
            "authors": [
                { "email": "jane@example.com", "owner": 7, "canPublish": true }
            ]
        }"#;
        let cfg: CliConfig = serde_json::from_str(json).unwrap();
        assert!(cfg.mailbox.is_configured());
        assert_eq!(cfg.spool_dir, PathBuf::from("/var/mail/spool"));
        assert_eq!(cfg.authors.len(), 1);
        assert_eq!(cfg.check_interval_secs, 3600);
    }

    #[tokio::test]
    async fn explicitly_named_missing_config_is_an_error() {
        let missing = std::env::temp_dir().join("definitely-not-here-mailpost.json");
        assert!(load_config(Some(&missing)).await.is_err());
    }
}
