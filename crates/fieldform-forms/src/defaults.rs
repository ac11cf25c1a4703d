//! Initial values derived from a descriptor list.

use std::collections::HashMap;

use fieldform_store::{FieldDescriptor, FieldType, FieldValue};

/// A map from field name to value.
pub type ValueMap = HashMap<String, FieldValue>;

/// Derives the initial value of every descriptor.
///
/// Checkbox fields coerce `value` to a boolean, absent meaning `false`.
/// Every other field uses `value` as is, or the empty string when absent.
pub fn derive_defaults(fields: &[FieldDescriptor]) -> ValueMap {
    fields
        .iter()
        .map(|field| {
            let value = match field.field_type {
                FieldType::Checkbox => {
                    FieldValue::Bool(field.value.as_ref().is_some_and(FieldValue::truthy))
                }
                _ => field.value.clone().unwrap_or_else(FieldValue::empty),
            };
            (field.name.clone(), value)
        })
        .collect()
}
