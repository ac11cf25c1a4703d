//! Runtime settings for fieldform.
//!
//! [`Settings`] holds every tunable the form engine, the descriptor store,
//! and the HTTP server read. Defaults match the behaviour of a stock form
//! session: a five-minute descriptor cache, two fetch retries, and the
//! synthetic `contact` field validated on every submit.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Controls whether the synthetic `contact` field is validated while hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactPolicy {
    /// Validate `contact` on every full validation, visible or not.
    #[default]
    Always,
    /// Skip `contact` while the visibility rule hides it.
    WhenVisible,
}

impl std::str::FromStr for ContactPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "when_visible" | "when-visible" => Ok(Self::WhenVisible),
            other => Err(format!("unknown contact policy '{other}'")),
        }
    }
}

/// The complete set of fieldform settings.
///
/// # Examples
///
/// ```
/// use fieldform_core::settings::{ContactPolicy, Settings};
///
/// let settings = Settings::default();
/// assert_eq!(settings.cache_ttl_secs, 300);
/// assert_eq!(settings.fetch_retries, 2);
/// assert_eq!(settings.contact_policy, ContactPolicy::Always);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled (pretty logs instead of JSON).
    pub debug: bool,

    // ── Logging ──────────────────────────────────────────────────────

    /// An `EnvFilter` directive such as `info` or `fieldform_forms=debug`.
    pub log_level: String,

    // ── Server ───────────────────────────────────────────────────────

    /// Address the descriptor server binds to.
    pub bind_addr: String,

    // ── Store ────────────────────────────────────────────────────────

    /// JSON file backing the descriptor store. `None` uses the seeded
    /// in-memory store.
    pub data_file: Option<PathBuf>,
    /// Freshness window of the cached descriptor list, in seconds.
    pub cache_ttl_secs: u64,
    /// Retries after the first failed fetch.
    pub fetch_retries: u32,
    /// Base delay between fetch retries, in milliseconds. Doubles per retry.
    pub retry_delay_ms: u64,

    // ── Validation ───────────────────────────────────────────────────

    /// Whether `contact` is validated while hidden.
    pub contact_policy: ContactPolicy,
}

impl Settings {
    /// Returns the descriptor cache TTL as a `Duration`.
    pub const fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Returns the base retry delay as a `Duration`.
    pub const fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            log_level: "info".to_string(),
            bind_addr: "127.0.0.1:3000".to_string(),
            data_file: None,
            cache_ttl_secs: 300,
            fetch_retries: 2,
            retry_delay_ms: 1000,
            contact_policy: ContactPolicy::Always,
        }
    }
}
