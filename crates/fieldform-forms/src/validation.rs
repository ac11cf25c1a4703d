//! Validation pipeline for a whole form.
//!
//! 1. Field-level cleaning of every rule against the live value map
//! 2. Merging the cleaned values back into the descriptor list
//!
//! Errors accumulate rather than short-circuiting, so every failing field
//! is reported at once.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use fieldform_core::checks::CONTACT_FIELD;
use fieldform_core::{ContactPolicy, ValidationError};
use fieldform_store::{FieldDescriptor, FieldValue};

use crate::defaults::{derive_defaults, ValueMap};
use crate::schema::Schema;
use crate::visibility::{contact_visible, visible_fields};

/// Cleaned values by field name. `None` marks a blank optional value.
pub type CleanedData = HashMap<String, Option<FieldValue>>;

/// Cleans every rule in `schema` except those `skip` selects.
///
/// Populates `cleaned` on success and `errors` on failure.
pub fn clean_fields(
    schema: &Schema,
    values: &ValueMap,
    skip: impl Fn(&str) -> bool,
    cleaned: &mut CleanedData,
    errors: &mut HashMap<String, Vec<String>>,
) {
    for rule in schema.rules() {
        if skip(&rule.name) {
            continue;
        }
        match rule.clean(values.get(&rule.name)) {
            Ok(value) => {
                cleaned.insert(rule.name.clone(), value);
            }
            Err(field_errors) => {
                errors.insert(rule.name.clone(), field_errors);
            }
        }
    }
}

/// Validates the whole live value map.
///
/// Under [`ContactPolicy::WhenVisible`] the `contact` rule is skipped while
/// the visibility rule hides it.
pub fn full_clean(
    schema: &Schema,
    values: &ValueMap,
    policy: ContactPolicy,
) -> Result<CleanedData, ValidationError> {
    let skip_contact = policy == ContactPolicy::WhenVisible && !contact_visible(values);
    let mut cleaned = CleanedData::new();
    let mut errors = HashMap::new();
    clean_fields(
        schema,
        values,
        |name| skip_contact && name == CONTACT_FIELD,
        &mut cleaned,
        &mut errors,
    );
    if errors.is_empty() {
        Ok(cleaned)
    } else {
        Err(ValidationError::with_field_errors(errors))
    }
}

/// Writes cleaned values into a copy of the descriptor list.
///
/// `contact` has no backing descriptor and is never merged; a fetched
/// descriptor of that name is carried over unchanged. A blank value for a
/// descriptor that had no value stays absent.
pub fn merge_values(fields: &[FieldDescriptor], cleaned: &CleanedData) -> Vec<FieldDescriptor> {
    fields
        .iter()
        .map(|field| {
            let mut merged = field.clone();
            if field.name == CONTACT_FIELD {
                return merged;
            }
            if let Some(value) = cleaned.get(&field.name) {
                merged.value = match value {
                    Some(v) if v.is_blank() && field.value.is_none() => None,
                    other => other.clone(),
                };
            }
            merged
        })
        .collect()
}

/// The outcome of validating a set of values against a descriptor list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// `true` if no field failed.
    pub valid: bool,
    /// Messages by field name.
    pub errors: BTreeMap<String, Vec<String>>,
    /// Names of the fields that would be rendered.
    pub visible: Vec<String>,
}

/// Validates `values` against `fields` without a session.
///
/// Values missing from `values` take their derived defaults, so a caller
/// may send only the fields it changed.
pub fn validate_values(
    fields: &[FieldDescriptor],
    values: &ValueMap,
    policy: ContactPolicy,
) -> ValidationReport {
    let schema = Schema::build(fields);
    let mut live = derive_defaults(fields);
    live.extend(values.iter().map(|(k, v)| (k.clone(), v.clone())));

    let errors = match full_clean(&schema, &live, policy) {
        Ok(_) => BTreeMap::new(),
        Err(err) => err.field_errors.into_iter().collect(),
    };
    ValidationReport {
        valid: errors.is_empty(),
        errors,
        visible: visible_fields(fields, &live),
    }
}
