//! # fieldform-forms
//!
//! The schema-driven validation and conditional-rendering engine. Given a
//! descriptor list from a [`FieldStore`](fieldform_store::FieldStore), this
//! crate builds a validation ruleset, derives initial values, decides which
//! fields are visible, and runs a form session from load to submit.
//!
//! ## Modules
//!
//! - [`fields`] - Per-kind rules and single-value cleaning
//! - [`schema`] - The ruleset built from a descriptor list
//! - [`defaults`] - Initial values derived from a descriptor list
//! - [`visibility`] - Which fields are rendered
//! - [`validation`] - Whole-form validation and merging values back
//! - [`session`] - Live values, interaction counters, and errors
//! - [`bound_field`] - Fields bound to session state for rendering
//! - [`widgets`] - HTML widgets
//! - [`controller`] - The session state machine
//!
//! ## Example
//!
//! ```
//! use fieldform_forms::{build_schema, derive_defaults, visibility::contact_visible};
//! use fieldform_store::seed_fields;
//!
//! let fields = seed_fields();
//! let schema = build_schema(&fields);
//! assert_eq!(schema.len(), fields.len() + 1);
//!
//! let defaults = derive_defaults(&fields);
//! assert!(!contact_visible(&defaults));
//! ```

pub mod bound_field;
pub mod controller;
pub mod defaults;
pub mod fields;
pub mod schema;
pub mod session;
pub mod validation;
pub mod visibility;
pub mod widgets;

pub use bound_field::BoundField;
pub use controller::{FormController, FormState, Notification, NotificationLevel};
pub use defaults::{derive_defaults, ValueMap};
pub use fields::{FieldKind, FieldRule};
pub use schema::{build_schema, Schema};
pub use session::FormSession;
pub use validation::{validate_values, ValidationReport};
