//! The `defaults` command: prints the initial value of every field.

use std::collections::BTreeMap;

use async_trait::async_trait;
use fieldform_core::{FormResult, Settings};
use fieldform_forms::derive_defaults;
use fieldform_store::{FieldDescriptor, FieldValue};

use crate::command::ManagementCommand;
use crate::input::{fields_arg, fields_for};

/// Prints derived defaults as a JSON object.
pub struct DefaultsCommand;

/// Returns the defaults of `fields`, sorted by name.
pub fn sorted_defaults(fields: &[FieldDescriptor]) -> BTreeMap<String, FieldValue> {
    derive_defaults(fields).into_iter().collect()
}

#[async_trait]
impl ManagementCommand for DefaultsCommand {
    fn name(&self) -> &'static str {
        "defaults"
    }

    fn help(&self) -> &'static str {
        "Print the initial value of every field"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(fields_arg())
    }

    async fn handle(&self, matches: &clap::ArgMatches, settings: &Settings) -> FormResult<()> {
        let fields = fields_for(matches, settings).await?;
        println!("{}", serde_json::to_string_pretty(&sorted_defaults(&fields))?);
        Ok(())
    }
}
