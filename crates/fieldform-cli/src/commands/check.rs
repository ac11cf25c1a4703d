//! The `check` command.
//!
//! Runs the descriptor checks over a list and logs every finding. Fails
//! when any finding is an error.

use async_trait::async_trait;
use fieldform_core::checks::{CheckLevel, CheckMessage, CheckRegistry};
use fieldform_core::{FormError, FormResult, Settings};
use fieldform_store::{summarize, FieldDescriptor};

use crate::command::ManagementCommand;
use crate::input::{fields_arg, fields_for};

/// Runs the descriptor checks.
pub struct CheckCommand;

/// Runs the built-in checks over `fields`, optionally only those tagged
/// with one of `tags`.
pub fn run_checks(fields: &[FieldDescriptor], tags: Option<&[&str]>) -> Vec<CheckMessage> {
    CheckRegistry::with_builtins().run_checks(tags, &summarize(fields))
}

#[async_trait]
impl ManagementCommand for CheckCommand {
    fn name(&self) -> &'static str {
        "check"
    }

    fn help(&self) -> &'static str {
        "Check a descriptor list for problems"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(fields_arg()).arg(
            clap::Arg::new("tag")
                .long("tag")
                .short('t')
                .help("Only run checks with this tag")
                .num_args(1..),
        )
    }

    async fn handle(&self, matches: &clap::ArgMatches, settings: &Settings) -> FormResult<()> {
        let fields = fields_for(matches, settings).await?;
        let tags: Option<Vec<&str>> = matches
            .get_many::<String>("tag")
            .map(|values| values.map(String::as_str).collect());
        let messages = run_checks(&fields, tags.as_deref());

        if messages.is_empty() {
            tracing::info!("Descriptor check identified no issues");
            return Ok(());
        }

        let errors = messages.iter().filter(|m| m.is_error()).count();
        let warnings = messages
            .iter()
            .filter(|m| m.level == CheckLevel::Warning)
            .count();

        for msg in &messages {
            tracing::warn!("{msg}");
        }

        tracing::info!(
            "Descriptor check identified {} issue(s) ({errors} error(s), {warnings} warning(s))",
            messages.len()
        );

        if errors > 0 {
            return Err(FormError::Configuration(format!(
                "Descriptor check found {errors} error(s)"
            )));
        }
        Ok(())
    }
}
