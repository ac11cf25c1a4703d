//! The `validate` command.
//!
//! Validates a JSON object of values against a descriptor list and prints
//! the report as JSON. Fails when any field is invalid.

use std::path::PathBuf;

use async_trait::async_trait;
use fieldform_core::{ContactPolicy, FormError, FormResult, Settings, ValidationError};
use fieldform_forms::{validate_values, ValidationReport, ValueMap};

use crate::command::ManagementCommand;
use crate::input::{fields_arg, fields_for, read_values};

/// Validates values against a descriptor list.
pub struct ValidateCommand;

/// Turns a failing report into a validation error.
pub fn report_result(report: &ValidationReport) -> FormResult<()> {
    if report.valid {
        return Ok(());
    }
    Err(FormError::Validation(ValidationError::with_field_errors(
        report
            .errors
            .iter()
            .map(|(name, messages)| (name.clone(), messages.clone()))
            .collect(),
    )))
}

#[async_trait]
impl ManagementCommand for ValidateCommand {
    fn name(&self) -> &'static str {
        "validate"
    }

    fn help(&self) -> &'static str {
        "Validate field values against a descriptor list"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(fields_arg())
            .arg(
                clap::Arg::new("values")
                    .long("values")
                    .value_parser(clap::value_parser!(PathBuf))
                    .help("JSON object of field values; omitted fields take their defaults"),
            )
            .arg(
                clap::Arg::new("policy")
                    .long("policy")
                    .value_parser(["always", "when_visible"])
                    .help("Override the configured contact policy"),
            )
    }

    async fn handle(&self, matches: &clap::ArgMatches, settings: &Settings) -> FormResult<()> {
        let policy = match matches.get_one::<String>("policy") {
            Some(raw) => raw.parse::<ContactPolicy>().map_err(FormError::Configuration)?,
            None => settings.contact_policy,
        };
        let fields = fields_for(matches, settings).await?;
        let values = match matches.get_one::<PathBuf>("values") {
            Some(path) => read_values(path).await?,
            None => ValueMap::new(),
        };

        let report = validate_values(&fields, &values, policy);
        println!("{}", serde_json::to_string_pretty(&report)?);
        report_result(&report)
    }
}
