//! # fieldform-cli
//!
//! The `fieldform` command line. Subcommands implement
//! [`ManagementCommand`] and are dispatched through a [`CommandRegistry`]:
//!
//! - `serve` - run the descriptor server
//! - `validate` - validate a values file against a descriptor list
//! - `defaults` - print the initial value of every field
//! - `check` - report problems in a descriptor list
//! - `submit` - apply edits to a descriptor list and persist them
//!
//! Every subcommand accepts the global `--settings <file>` option.
//!
//! ```rust
//! use fieldform_cli::command::CommandRegistry;
//! use fieldform_cli::commands::register_builtin_commands;
//!
//! let mut registry = CommandRegistry::new();
//! register_builtin_commands(&mut registry);
//! assert!(registry.list_commands().contains(&"validate"));
//! ```

pub mod command;
pub mod commands;
pub mod input;

pub use command::{CommandRegistry, ManagementCommand};
pub use commands::register_builtin_commands;
