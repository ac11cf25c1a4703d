//! Reading settings, descriptor lists, and values for the commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use fieldform_core::{settings_loader, FormError, FormResult, Settings};
use fieldform_forms::ValueMap;
use fieldform_store::{open_from_settings, FieldDescriptor, FieldStore, FieldValue, JsonFileStore};

/// The `--fields` option shared by the descriptor commands.
pub const FIELDS_ARG: &str = "fields";

/// Loads settings from `path` if given, otherwise from the environment.
pub fn load_settings(path: Option<&Path>) -> FormResult<Settings> {
    path.map_or_else(
        || Ok(settings_loader::from_env()),
        settings_loader::from_file_with_env,
    )
}

/// Reads a JSON descriptor list.
pub async fn read_fields(path: &Path) -> FormResult<Vec<FieldDescriptor>> {
    let data = tokio::fs::read(path).await?;
    Ok(serde_json::from_slice(&data)?)
}

/// Reads a JSON object of field values.
pub async fn read_values(path: &Path) -> FormResult<ValueMap> {
    let data = tokio::fs::read(path).await?;
    Ok(serde_json::from_slice(&data)?)
}

/// Parses a `name=value` assignment.
///
/// The value is read as JSON when it parses as a scalar, so `30` is a number
/// and `true` a boolean; anything else is taken as text.
pub fn parse_assignment(raw: &str) -> FormResult<(String, FieldValue)> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| FormError::Configuration(format!("expected name=value, got '{raw}'")))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(FormError::Configuration(format!(
            "missing field name in '{raw}'"
        )));
    }
    let value = serde_json::from_str::<FieldValue>(value)
        .unwrap_or_else(|_| FieldValue::String(value.to_string()));
    Ok((name.to_string(), value))
}

/// Returns the store a command works on: a JSON file when `--fields` is
/// given, the configured store otherwise.
pub async fn store_for(
    matches: &clap::ArgMatches,
    settings: &Settings,
) -> FormResult<Arc<dyn FieldStore>> {
    match matches.get_one::<PathBuf>(FIELDS_ARG) {
        Some(path) => Ok(Arc::new(JsonFileStore::new(path.clone()))),
        None => open_from_settings(settings).await,
    }
}

/// Returns the descriptor list a command works on.
pub async fn fields_for(
    matches: &clap::ArgMatches,
    settings: &Settings,
) -> FormResult<Vec<FieldDescriptor>> {
    match matches.get_one::<PathBuf>(FIELDS_ARG) {
        Some(path) => read_fields(path).await,
        None => open_from_settings(settings).await?.fetch().await,
    }
}

/// The `--fields` argument definition.
pub fn fields_arg() -> clap::Arg {
    clap::Arg::new(FIELDS_ARG)
        .long(FIELDS_ARG)
        .short('f')
        .value_parser(clap::value_parser!(PathBuf))
        .help("JSON descriptor list (defaults to the configured store)")
}
