use std::path::PathBuf;

use anyhow::Context;
use fieldform_cli::command::SETTINGS_ARG;
use fieldform_cli::input::load_settings;
use fieldform_cli::{register_builtin_commands, CommandRegistry};
use fieldform_core::logging::setup_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut registry = CommandRegistry::new();
    register_builtin_commands(&mut registry);
    let matches = registry.build_cli().get_matches();

    let settings_path = matches.get_one::<PathBuf>(SETTINGS_ARG);
    let settings = load_settings(settings_path.map(PathBuf::as_path)).with_context(|| {
        settings_path.map_or_else(
            || "cannot load settings from the environment".to_string(),
            |path| format!("cannot load settings from {}", path.display()),
        )
    })?;
    setup_logging(&settings);

    let name = matches.subcommand_name().unwrap_or_default();
    registry
        .execute(&matches, &settings)
        .await
        .with_context(|| format!("fieldform {name} failed"))?;
    Ok(())
}
