//! The `submit` command.
//!
//! Runs one form session from the command line: load the descriptor list,
//! apply `--set name=value` edits in order, then submit. With `--fields`
//! the list is read from and written back to that JSON file.

use std::sync::Arc;

use async_trait::async_trait;
use fieldform_core::{FormError, FormResult, Settings};
use fieldform_forms::{FormController, Notification, NotificationLevel};

use crate::command::ManagementCommand;
use crate::input::{fields_arg, parse_assignment, store_for};

/// Edits and submits a form session.
pub struct SubmitCommand;

#[async_trait]
impl ManagementCommand for SubmitCommand {
    fn name(&self) -> &'static str {
        "submit"
    }

    fn help(&self) -> &'static str {
        "Edit field values and submit them to the store"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(fields_arg()).arg(
            clap::Arg::new("set")
                .long("set")
                .short('s')
                .action(clap::ArgAction::Append)
                .help("An edit of the form name=value; repeatable"),
        )
    }

    async fn handle(&self, matches: &clap::ArgMatches, settings: &Settings) -> FormResult<()> {
        let edits = matches
            .get_many::<String>("set")
            .into_iter()
            .flatten()
            .map(String::as_str)
            .map(parse_assignment)
            .collect::<FormResult<Vec<_>>>()?;

        let store = store_for(matches, settings).await?;
        let mut controller = FormController::new(store, settings);
        controller.notifications().connect(
            "cli",
            Arc::new(|note: &Notification| match note.level {
                NotificationLevel::Success => tracing::info!("{}", note.message),
                NotificationLevel::Error => tracing::error!("{}", note.message),
            }),
        );

        controller.load().await?;
        for (name, value) in edits {
            controller.change(&name, value)?;
        }

        match controller.submit().await {
            Ok(()) => Ok(()),
            Err(FormError::Validation(err)) => {
                let mut names: Vec<_> = err.field_errors.keys().collect();
                names.sort();
                for name in names {
                    for message in &err.field_errors[name] {
                        eprintln!("{name}: {message}");
                    }
                }
                Err(FormError::Validation(err))
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldform_store::{FieldStore, FieldValue, JsonFileStore};

    const FIELDS: &str = r#"[
        {"name": "username", "type": "text", "required": true, "value": "shadcn"},
        {"name": "age", "type": "number"},
        {"name": "newsletter", "type": "checkbox", "value": false}
    ]"#;

    fn matches(args: &[&str]) -> clap::ArgMatches {
        SubmitCommand
            .add_arguments(clap::Command::new("submit"))
            .try_get_matches_from(std::iter::once("submit").chain(args.iter().copied()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_submit_writes_edits_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fields.json");
        std::fs::write(&path, FIELDS).unwrap();
        let path_str = path.to_str().unwrap();

        let settings = Settings::default();
        SubmitCommand
            .handle(
                &matches(&[
                    "--fields",
                    path_str,
                    "--set",
                    "age=17",
                    "--set",
                    "newsletter=true",
                    "--set",
                    "contact=user@example.com",
                ]),
                &settings,
            )
            .await
            .unwrap();

        let saved = JsonFileStore::new(path.clone()).fetch().await.unwrap();
        assert_eq!(saved[1].value, Some(FieldValue::Int(17)));
        assert_eq!(saved[2].value, Some(FieldValue::Bool(true)));
        assert!(saved.iter().all(|f| f.name != "contact"));
    }

    #[tokio::test]
    async fn test_invalid_edit_is_not_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fields.json");
        std::fs::write(&path, FIELDS).unwrap();
        let path_str = path.to_str().unwrap();

        let err = SubmitCommand
            .handle(
                &matches(&["--fields", path_str, "--set", "age=500", "--set", "contact=x"]),
                &Settings::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, FormError::Validation(_)));

        let saved = JsonFileStore::new(path.clone()).fetch().await.unwrap();
        assert_eq!(saved[1].value, None);
    }

    #[tokio::test]
    async fn test_unknown_field_edit_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fields.json");
        std::fs::write(&path, FIELDS).unwrap();

        let err = SubmitCommand
            .handle(
                &matches(&["--fields", path.to_str().unwrap(), "--set", "nope=1"]),
                &Settings::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, FormError::UnknownField(_)));
    }
}
