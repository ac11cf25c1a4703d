//! Built-in `fieldform` subcommands. Each implements
//! [`ManagementCommand`](crate::command::ManagementCommand).

pub mod check;
pub mod defaults;
pub mod serve;
pub mod submit;
pub mod validate;

pub use check::CheckCommand;
pub use defaults::DefaultsCommand;
pub use serve::ServeCommand;
pub use submit::SubmitCommand;
pub use validate::ValidateCommand;

use crate::command::CommandRegistry;

/// Registers every built-in subcommand into `registry`.
pub fn register_builtin_commands(registry: &mut CommandRegistry) {
    registry.register(Box::new(ServeCommand));
    registry.register(Box::new(ValidateCommand));
    registry.register(Box::new(DefaultsCommand));
    registry.register(Box::new(CheckCommand));
    registry.register(Box::new(SubmitCommand));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_registered() {
        let mut registry = CommandRegistry::new();
        register_builtin_commands(&mut registry);
        assert_eq!(
            registry.list_commands(),
            vec!["check", "defaults", "serve", "submit", "validate"]
        );
        registry.build_cli().debug_assert();
    }
}
