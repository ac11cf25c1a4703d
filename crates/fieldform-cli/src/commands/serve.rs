//! The `serve` command.
//!
//! Starts the descriptor server. `--host` and `--port` override the
//! configured `bind_addr`; `--data` overrides the configured data file.

use std::path::PathBuf;

use async_trait::async_trait;
use fieldform_core::{FormResult, Settings};
use fieldform_server::FieldformApp;

use crate::command::ManagementCommand;

/// Serves the descriptor store over HTTP until ctrl-c.
pub struct ServeCommand;

/// Applies the command line overrides to `settings`.
pub fn resolve_settings(matches: &clap::ArgMatches, settings: &Settings) -> Settings {
    let (default_host, default_port) = settings
        .bind_addr
        .rsplit_once(':')
        .unwrap_or((settings.bind_addr.as_str(), "3000"));
    let host = matches
        .get_one::<String>("host")
        .map_or(default_host, String::as_str);
    let port = matches
        .get_one::<u16>("port")
        .map_or_else(|| default_port.to_string(), ToString::to_string);

    let mut resolved = settings.clone();
    resolved.bind_addr = format!("{host}:{port}");
    if let Some(path) = matches.get_one::<PathBuf>("data") {
        resolved.data_file = Some(path.clone());
    }
    resolved
}

#[async_trait]
impl ManagementCommand for ServeCommand {
    fn name(&self) -> &'static str {
        "serve"
    }

    fn help(&self) -> &'static str {
        "Serve the descriptor store over HTTP"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("host")
                .long("host")
                .help("Host to bind to"),
        )
        .arg(
            clap::Arg::new("port")
                .long("port")
                .value_parser(clap::value_parser!(u16))
                .help("Port to bind to"),
        )
        .arg(
            clap::Arg::new("data")
                .long("data")
                .value_parser(clap::value_parser!(PathBuf))
                .help("JSON file backing the store"),
        )
    }

    async fn handle(&self, matches: &clap::ArgMatches, settings: &Settings) -> FormResult<()> {
        let settings = resolve_settings(matches, settings);
        let addr = settings.bind_addr.clone();
        FieldformApp::new(settings).run(&addr).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(args: &[&str]) -> clap::ArgMatches {
        let cmd = ServeCommand.add_arguments(clap::Command::new("serve"));
        cmd.try_get_matches_from(std::iter::once("serve").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_defaults_keep_bind_addr() {
        let settings = resolve_settings(&matches(&[]), &Settings::default());
        assert_eq!(settings.bind_addr, "127.0.0.1:3000");
        assert!(settings.data_file.is_none());
    }

    #[test]
    fn test_overrides() {
        let settings = resolve_settings(
            &matches(&["--host", "0.0.0.0", "--port", "8080", "--data", "fields.json"]),
            &Settings::default(),
        );
        assert_eq!(settings.bind_addr, "0.0.0.0:8080");
        assert_eq!(settings.data_file, Some(PathBuf::from("fields.json")));
    }

    #[test]
    fn test_port_only_keeps_host() {
        let settings = resolve_settings(&matches(&["--port", "9000"]), &Settings::default());
        assert_eq!(settings.bind_addr, "127.0.0.1:9000");
    }

    #[test]
    fn test_invalid_port_rejected() {
        let cmd = ServeCommand.add_arguments(clap::Command::new("serve"));
        assert!(cmd
            .try_get_matches_from(["serve", "--port", "not-a-port"])
            .is_err());
    }
}
