//! Settings loading from configuration files.
//!
//! This module provides functions to load [`Settings`] from TOML files, JSON
//! files, and to apply environment variable overrides.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `FIELDFORM_DEBUG` | `debug` |
//! | `FIELDFORM_LOG_LEVEL` | `log_level` |
//! | `FIELDFORM_BIND_ADDR` | `bind_addr` |
//! | `FIELDFORM_DATA_FILE` | `data_file` |
//! | `FIELDFORM_CACHE_TTL_SECS` | `cache_ttl_secs` |
//! | `FIELDFORM_FETCH_RETRIES` | `fetch_retries` |
//! | `FIELDFORM_RETRY_DELAY_MS` | `retry_delay_ms` |
//! | `FIELDFORM_CONTACT_POLICY` | `contact_policy` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use fieldform_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file("fieldform.toml").unwrap();
//! let settings = settings_loader::from_json_file_with_env("fieldform.json").unwrap();
//! ```

use std::path::{Path, PathBuf};

use crate::error::FormError;
use crate::settings::{ContactPolicy, Settings};

/// Loads settings from a TOML string.
///
/// Any fields not present in the TOML keep their default values.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or cannot be deserialized.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, FormError> {
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| FormError::Configuration(format!("Failed to parse TOML: {e}")))?;
    merge_over_defaults(toml_to_json(toml_value), "TOML")
}

/// Loads settings from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, FormError> {
    let content = read_config(path.as_ref(), "TOML")?;
    from_toml_str(&content)
}

/// Loads settings from a TOML file and then applies environment variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, FormError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a JSON string.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or cannot be deserialized.
pub fn from_json_str(json_str: &str) -> Result<Settings, FormError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| FormError::Configuration(format!("Failed to parse JSON: {e}")))?;
    merge_over_defaults(json_value, "JSON")
}

/// Loads settings from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the JSON is malformed.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, FormError> {
    let content = read_config(path.as_ref(), "JSON")?;
    from_json_str(&content)
}

/// Loads settings from a JSON file and then applies environment variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the JSON is malformed.
pub fn from_json_file_with_env(path: impl AsRef<Path>) -> Result<Settings, FormError> {
    let mut settings = from_json_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a file, picking the format from the extension
/// (`.json` is JSON, anything else is TOML), then applies env overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn from_file_with_env(path: impl AsRef<Path>) -> Result<Settings, FormError> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        from_json_file_with_env(path)
    } else {
        from_toml_file_with_env(path)
    }
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies environment variable overrides to a settings struct.
///
/// Values that fail to parse are ignored with a warning, leaving the
/// previous setting in place.
pub fn apply_env_overrides(settings: &mut Settings) {
    apply_overrides(settings, |key| std::env::var(key).ok());
}

/// Applies overrides from an arbitrary key lookup.
fn apply_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(val) = lookup("FIELDFORM_DEBUG") {
        settings.debug = matches!(val.to_lowercase().as_str(), "true" | "1" | "yes");
    }

    if let Some(val) = lookup("FIELDFORM_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Some(val) = lookup("FIELDFORM_BIND_ADDR") {
        settings.bind_addr = val;
    }

    if let Some(val) = lookup("FIELDFORM_DATA_FILE") {
        settings.data_file = if val.trim().is_empty() {
            None
        } else {
            Some(PathBuf::from(val))
        };
    }

    if let Some(val) = lookup("FIELDFORM_CACHE_TTL_SECS") {
        match val.parse::<u64>() {
            Ok(secs) => settings.cache_ttl_secs = secs,
            Err(e) => tracing::warn!("Ignoring FIELDFORM_CACHE_TTL_SECS={val}: {e}"),
        }
    }

    if let Some(val) = lookup("FIELDFORM_FETCH_RETRIES") {
        match val.parse::<u32>() {
            Ok(retries) => settings.fetch_retries = retries,
            Err(e) => tracing::warn!("Ignoring FIELDFORM_FETCH_RETRIES={val}: {e}"),
        }
    }

    if let Some(val) = lookup("FIELDFORM_RETRY_DELAY_MS") {
        match val.parse::<u64>() {
            Ok(ms) => settings.retry_delay_ms = ms,
            Err(e) => tracing::warn!("Ignoring FIELDFORM_RETRY_DELAY_MS={val}: {e}"),
        }
    }

    if let Some(val) = lookup("FIELDFORM_CONTACT_POLICY") {
        match val.parse::<ContactPolicy>() {
            Ok(policy) => settings.contact_policy = policy,
            Err(e) => tracing::warn!("Ignoring FIELDFORM_CONTACT_POLICY: {e}"),
        }
    }
}

// ============================================================
// Helpers
// ============================================================

fn read_config(path: &Path, format: &str) -> Result<String, FormError> {
    std::fs::read_to_string(path).map_err(|e| {
        FormError::Configuration(format!(
            "Failed to read {format} file '{}': {e}",
            path.display()
        ))
    })
}

/// Deep-merges `overrides` over the serialized default settings and
/// deserializes the result.
fn merge_over_defaults(overrides: serde_json::Value, format: &str) -> Result<Settings, FormError> {
    let default_json = serde_json::to_value(Settings::default()).map_err(|e| {
        FormError::Configuration(format!("Failed to serialize default settings: {e}"))
    })?;

    let merged = merge_json(default_json, overrides);
    serde_json::from_value(merged).map_err(|e| {
        FormError::Configuration(format!("Failed to deserialize settings from {format}: {e}"))
    })
}

/// Converts a TOML value to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => {
            let map: serde_json::Map<String, serde_json::Value> = table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect();
            serde_json::Value::Object(map)
        }
    }
}

/// Deep-merges two JSON values. The `override_val` takes precedence.
fn merge_json(base: serde_json::Value, override_val: serde_json::Value) -> serde_json::Value {
    match (base, override_val) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(override_map)) => {
            for (key, override_v) in override_map {
                let merged = if let Some(base_v) = base_map.remove(&key) {
                    merge_json(base_v, override_v)
                } else {
                    override_v
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, override_val) => override_val,
    }
}
