//! The visibility rule.
//!
//! Every descriptor is always shown. The synthetic `contact` field is shown
//! only while the live `age` coerces to a number strictly greater than 18.

use std::collections::HashSet;

use fieldform_core::checks::CONTACT_FIELD;
use fieldform_store::FieldDescriptor;

use crate::defaults::ValueMap;
use crate::fields::AGE_FIELD;

/// `contact` is shown for ages strictly above this.
pub const CONTACT_MIN_AGE: f64 = 18.0;

/// Returns `true` if the `contact` field should be rendered.
pub fn contact_visible(values: &ValueMap) -> bool {
    values
        .get(AGE_FIELD)
        .and_then(fieldform_store::FieldValue::as_number)
        .is_some_and(|age| age > CONTACT_MIN_AGE)
}

/// Returns the names of the fields to render, in descriptor order, each
/// name once.
///
/// A fetched descriptor named `contact` is never rendered; the synthetic
/// field takes its place, directly after `age` when there is one and at the
/// end otherwise.
pub fn visible_fields(fields: &[FieldDescriptor], values: &ValueMap) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names: Vec<String> = fields
        .iter()
        .filter(|f| f.name != CONTACT_FIELD && seen.insert(f.name.as_str()))
        .map(|f| f.name.clone())
        .collect();
    if contact_visible(values) {
        let at = names
            .iter()
            .position(|n| n == AGE_FIELD)
            .map_or(names.len(), |i| i + 1);
        names.insert(at, CONTACT_FIELD.to_string());
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldform_store::{seed_fields, FieldType, FieldValue};

    fn with_age(age: FieldValue) -> ValueMap {
        ValueMap::from([(AGE_FIELD.to_string(), age)])
    }

    #[test]
    fn test_contact_visible_above_eighteen() {
        assert!(contact_visible(&with_age(FieldValue::Int(19))));
        assert!(contact_visible(&with_age("19".into())));
        assert!(contact_visible(&with_age(FieldValue::Float(18.5))));
    }

    #[test]
    fn test_contact_hidden_otherwise() {
        assert!(!contact_visible(&with_age(FieldValue::Int(18))));
        assert!(!contact_visible(&with_age("abc".into())));
        assert!(!contact_visible(&with_age(FieldValue::empty())));
        assert!(!contact_visible(&ValueMap::new()));
    }

    #[test]
    fn test_visible_fields_inserts_contact_after_age() {
        let names = visible_fields(&seed_fields(), &with_age(FieldValue::Int(30)));
        assert_eq!(
            names,
            vec!["username", "email", "age", "contact", "phone", "newsletter"]
        );
    }

    #[test]
    fn test_visible_fields_without_contact() {
        let names = visible_fields(&seed_fields(), &with_age(FieldValue::Int(10)));
        assert!(!names.iter().any(|n| n == CONTACT_FIELD));
        assert_eq!(names.len(), seed_fields().len());
    }

    #[test]
    fn test_fetched_contact_descriptor_is_never_rendered() {
        let fields = vec![
            FieldDescriptor::new("contact", FieldType::Text),
            FieldDescriptor::new("bio", FieldType::Text),
        ];
        assert_eq!(visible_fields(&fields, &ValueMap::new()), vec!["bio"]);
    }
}
