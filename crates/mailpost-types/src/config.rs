//! Mailbox ingestion configuration.
//!
//! The shipped defaults are deliberate placeholders; a cycle refuses to
//! touch the network until the operator has replaced them
//! (see [`MailboxConfig::is_configured`]).

use serde::{Deserialize, Serialize};

use crate::secret::SecretString;

/// Placeholder mail server host shipped as the default.
pub const PLACEHOLDER_URL: &str = "mail.example.com";
/// Placeholder mailbox login shipped as the default.
pub const PLACEHOLDER_LOGIN: &str = "login@example.com";
/// Placeholder mailbox password shipped as the default.
pub const PLACEHOLDER_PASS: &str = "password";

/// Configuration for the mail ingestion pipeline.
///
/// Credentials are immutable for the duration of a cycle; the pipeline
/// reads them, it never writes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailboxConfig {
    /// Mail server hostname.
    #[serde(default = "default_url", alias = "mailserverUrl")]
    pub mailserver_url: String,

    /// Mailbox login.
    #[serde(default = "default_login", alias = "mailserverLogin")]
    pub mailserver_login: String,

    /// Mailbox password (via [`SecretString`] -- never logged or serialized).
    #[serde(default = "default_pass", alias = "mailserverPass")]
    pub mailserver_pass: SecretString,

    /// Mail server port.
    #[serde(default = "default_port", alias = "mailserverPort")]
    pub mailserver_port: u16,

    /// Category assigned to every emitted content record.
    #[serde(default, alias = "defaultEmailCategory")]
    pub default_email_category: String,

    /// Minimum seconds between cycles that perform network I/O.
    #[serde(default = "default_min_interval", alias = "minCheckIntervalSecs")]
    pub min_check_interval_secs: u64,

    /// Site display offset from UTC, in seconds.
    #[serde(default, alias = "siteUtcOffsetSecs")]
    pub site_utc_offset_secs: i32,

    /// Owner assigned when no author resolves to a known identity.
    #[serde(default = "default_fallback_owner", alias = "fallbackOwner")]
    pub fallback_owner: u64,

    /// Bypass the rate guard. Debug aid only.
    #[serde(default, alias = "debugOverride")]
    pub debug_override: bool,
}

fn default_url() -> String {
    PLACEHOLDER_URL.into()
}
fn default_login() -> String {
    PLACEHOLDER_LOGIN.into()
}
fn default_pass() -> SecretString {
    SecretString::new(PLACEHOLDER_PASS)
}
fn default_port() -> u16 {
    110
}
fn default_min_interval() -> u64 {
    300
}
fn default_fallback_owner() -> u64 {
    1
}

impl Default for MailboxConfig {
    fn default() -> Self {
        Self {
            mailserver_url: default_url(),
            mailserver_login: default_login(),
            mailserver_pass: default_pass(),
            mailserver_port: default_port(),
            default_email_category: String::new(),
            min_check_interval_secs: default_min_interval(),
            site_utc_offset_secs: 0,
            fallback_owner: default_fallback_owner(),
            debug_override: false,
        }
    }
}

impl MailboxConfig {
    /// Whether the operator has replaced every placeholder credential.
    ///
    /// A field still holding its shipped default (or emptied out) means
    /// there is nothing to do and a cycle must not connect.
    pub fn is_configured(&self) -> bool {
        !self.mailserver_url.is_empty()
            && self.mailserver_url != PLACEHOLDER_URL
            && !self.mailserver_login.is_empty()
            && self.mailserver_login != PLACEHOLDER_LOGIN
            && !self.mailserver_pass.is_empty()
            && self.mailserver_pass.expose() != PLACEHOLDER_PASS
    }
}
