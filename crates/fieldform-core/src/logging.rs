//! Logging integration for fieldform.
//!
//! Provides helpers for configuring [`tracing`]-based logging from
//! [`Settings`](crate::settings::Settings) and for creating per-session spans.

use tracing_subscriber::EnvFilter;

use crate::settings::Settings;

/// Targets emitted by the fieldform crates and the `fieldform` binary.
pub const FIELDFORM_TARGETS: &[&str] = &[
    "fieldform",
    "fieldform_core",
    "fieldform_store",
    "fieldform_signals",
    "fieldform_forms",
    "fieldform_server",
    "fieldform_cli",
];

/// HTTP stack targets that are capped at `warn`.
const NOISY_TARGETS: &[&str] = &["hyper", "hyper_util", "h2", "tower", "tower_http", "axum"];

const LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];
const WARN: usize = 3;

/// Expands `log_level` into an [`EnvFilter`] directive string.
///
/// A bare level such as `"debug"` applies to every fieldform target, while
/// the HTTP stack is held at `warn` (or quieter, if the level is quieter).
/// Anything with a `=` or `,` is taken as a full directive string and
/// passed through. Directives that do not parse fall back to the expansion
/// of `"info"`.
///
/// # Examples
///
/// ```
/// use fieldform_core::logging::filter_directives;
///
/// let directives = filter_directives("debug");
/// assert!(directives.contains("fieldform_forms=debug"));
/// assert!(directives.contains("hyper=warn"));
/// ```
pub fn filter_directives(log_level: &str) -> String {
    let level = log_level.trim();
    let directives = if level.contains('=') || level.contains(',') {
        Some(level.to_string()).filter(|d| EnvFilter::try_new(d).is_ok())
    } else {
        expand_level(&level.to_ascii_lowercase())
    };
    directives
        .or_else(|| expand_level("info"))
        .unwrap_or_else(|| "info".to_string())
}

fn expand_level(level: &str) -> Option<String> {
    let rank = LEVELS.iter().position(|l| *l == level)?;
    let noisy = LEVELS[rank.max(WARN)];

    let mut parts = vec![level.to_string()];
    parts.extend(FIELDFORM_TARGETS.iter().map(|t| format!("{t}={level}")));
    parts.extend(NOISY_TARGETS.iter().map(|t| format!("{t}={noisy}")));
    Some(parts.join(","))
}

/// Sets up the global tracing subscriber based on the given settings.
///
/// The log level is read from `settings.log_level` (e.g. "debug", "info",
/// "fieldform_forms=trace") and expanded by [`filter_directives`]. In debug
/// mode a pretty, human-readable format is used; otherwise a structured JSON
/// format is used. Installing a second subscriber is a no-op.
pub fn setup_logging(settings: &Settings) {
    use tracing_subscriber::fmt;

    let filter = EnvFilter::new(filter_directives(&settings.log_level));

    if settings.debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init()
            .ok();
    }
}

/// Creates a tracing span for one form session.
///
/// Everything the form controller logs while the span is entered carries the
/// session id.
///
/// # Examples
///
/// ```
/// use fieldform_core::logging::session_span;
///
/// let span = session_span("session-1");
/// let _guard = span.enter();
/// tracing::info!("descriptors loaded");
/// ```
pub fn session_span(session_id: &str) -> tracing::Span {
    tracing::info_span!("form_session", id = session_id)
}
