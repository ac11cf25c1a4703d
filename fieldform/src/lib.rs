//! # fieldform
//!
//! Renders a form from a list of field descriptors, validates input against
//! rules derived from each descriptor's type, shows a `contact` field only
//! for adults, and writes edited values back to the store.
//!
//! This meta-crate re-exports the sub-crates. Depend on it for everything,
//! or on individual crates for a smaller build.
//!
//! ```
//! use std::sync::Arc;
//!
//! use fieldform::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> FormResult<()> {
//! let store = Arc::new(InMemoryFieldStore::seeded());
//! let settings = Settings {
//!     contact_policy: ContactPolicy::WhenVisible,
//!     ..Settings::default()
//! };
//! let mut form = FormController::new(store.clone(), &settings);
//! form.load().await?;
//! form.change("email", "user@example.com")?;
//! form.submit().await?;
//! assert_eq!(store.replace_count(), 1);
//! # Ok(())
//! # }
//! ```

/// Settings, errors, logging, and descriptor checks.
pub use fieldform_core as core;

/// Field descriptors, values, and the stores that hold them.
pub use fieldform_store as store;

/// Rules, defaults, visibility, and the form controller.
pub use fieldform_forms as forms;

/// Typed signals carrying controller notifications.
#[cfg(feature = "signals")]
pub use fieldform_signals as signals;

/// The HTTP API over a descriptor store.
#[cfg(feature = "server")]
pub use fieldform_server as server;

/// The `fieldform` command line.
#[cfg(feature = "cli")]
pub use fieldform_cli as cli;

/// The types most programs need.
pub mod prelude {
    pub use fieldform_core::{ContactPolicy, FormError, FormResult, Settings};
    pub use fieldform_forms::{
        build_schema, derive_defaults, validate_values, BoundField, FormController, FormState,
        Notification, NotificationLevel, ValueMap,
    };
    pub use fieldform_store::{
        FieldDescriptor, FieldStore, FieldType, FieldValue, InMemoryFieldStore, Variant,
    };
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_prelude_pure_functions() {
        let fields = vec![
            FieldDescriptor::new("age", FieldType::Number),
            FieldDescriptor::new("newsletter", FieldType::Checkbox),
        ];
        assert_eq!(build_schema(&fields).len(), 3);
        assert_eq!(
            derive_defaults(&fields)["newsletter"],
            FieldValue::Bool(false)
        );

        let values = ValueMap::from([("age".to_string(), FieldValue::Int(30))]);
        let report = validate_values(&fields, &values, ContactPolicy::WhenVisible);
        assert!(!report.valid);
        assert!(report.errors.contains_key("contact"));
    }
}
