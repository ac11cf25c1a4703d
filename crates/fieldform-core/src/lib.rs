//! # fieldform-core
//!
//! Core types for the fieldform workspace: error types, settings, logging,
//! and descriptor-list checks. This crate has no dependency on the other
//! fieldform crates and provides the foundation for all of them.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Runtime settings with sensible defaults
//! - [`settings_loader`] - Loading settings from TOML/JSON files and the environment
//! - [`logging`] - Tracing-based logging integration
//! - [`checks`] - Diagnostics over a descriptor list (duplicate names, unknown types)

pub mod checks;
pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{FormError, FormResult, ValidationError};
pub use settings::{ContactPolicy, Settings};
