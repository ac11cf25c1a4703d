//! The schema builder: descriptor list to validation ruleset.

use std::collections::HashMap;

use fieldform_core::checks::CONTACT_FIELD;
use fieldform_store::{FieldDescriptor, FieldValue};

use crate::fields::FieldRule;

/// A validation ruleset: one rule per descriptor name plus the synthetic
/// `contact` rule.
///
/// A schema has no identity of its own; it is rebuilt whenever the
/// descriptor list changes.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    rules: HashMap<String, FieldRule>,
    order: Vec<String>,
}

impl Schema {
    /// Builds the ruleset for `fields`. Never fails.
    ///
    /// If two descriptors share a name the later one wins. A descriptor
    /// named `contact` is replaced by the synthetic rule.
    pub fn build(fields: &[FieldDescriptor]) -> Self {
        let mut schema = Self::default();
        for field in fields {
            if field.name == CONTACT_FIELD {
                tracing::warn!("descriptor named '{CONTACT_FIELD}' is shadowed by the synthetic rule");
                continue;
            }
            schema.insert(FieldRule::for_descriptor(field));
        }
        schema.insert(FieldRule::contact());
        schema
    }

    fn insert(&mut self, rule: FieldRule) {
        if self.rules.contains_key(&rule.name) {
            tracing::warn!(field = %rule.name, "duplicate field name; the later descriptor wins");
        } else {
            self.order.push(rule.name.clone());
        }
        self.rules.insert(rule.name.clone(), rule);
    }

    /// Returns the rule for `name`.
    pub fn get(&self, name: &str) -> Option<&FieldRule> {
        self.rules.get(name)
    }

    /// Returns `true` if there is a rule for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Returns the rules in descriptor order, `contact` last.
    pub fn rules(&self) -> impl Iterator<Item = &FieldRule> {
        self.order.iter().filter_map(|name| self.rules.get(name))
    }

    /// Returns the number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if the schema has no rules. A built schema always has
    /// at least the `contact` rule.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Validates a single field. Unknown names yield `None`.
    pub fn validate_field(
        &self,
        name: &str,
        value: Option<&FieldValue>,
    ) -> Option<Result<Option<FieldValue>, Vec<String>>> {
        self.get(name).map(|rule| rule.clean(value))
    }
}

/// Shorthand for [`Schema::build`].
pub fn build_schema(fields: &[FieldDescriptor]) -> Schema {
    Schema::build(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FieldKind;
    use fieldform_store::{seed_fields, FieldType};

    #[test]
    fn test_one_rule_per_name_plus_contact() {
        let fields = seed_fields();
        let schema = build_schema(&fields);
        assert_eq!(schema.len(), fields.len() + 1);
        for field in &fields {
            assert!(schema.contains(&field.name));
        }
        assert!(schema.contains(CONTACT_FIELD));
    }

    #[test]
    fn test_empty_list_has_only_contact() {
        let schema = build_schema(&[]);
        assert_eq!(schema.len(), 1);
        assert_eq!(schema.get(CONTACT_FIELD).unwrap().kind, FieldKind::Contact);
    }

    #[test]
    fn test_duplicate_names_last_wins() {
        let schema = build_schema(&[
            FieldDescriptor::new("x", FieldType::Text),
            FieldDescriptor::new("x", FieldType::Email),
        ]);
        assert_eq!(schema.len(), 2);
        assert_eq!(schema.get("x").unwrap().kind, FieldKind::Email);
        assert_eq!(schema.rules().count(), 2);
    }

    #[test]
    fn test_contact_descriptor_is_shadowed() {
        let schema = build_schema(&[FieldDescriptor::new("contact", FieldType::Text)]);
        assert_eq!(schema.len(), 1);
        assert_eq!(schema.get(CONTACT_FIELD).unwrap().kind, FieldKind::Contact);
    }

    #[test]
    fn test_rules_keep_descriptor_order() {
        let schema = build_schema(&seed_fields());
        let names: Vec<_> = schema.rules().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["username", "email", "age", "phone", "newsletter", "contact"]);
    }

    #[test]
    fn test_validate_field_unknown_name() {
        let schema = build_schema(&seed_fields());
        assert!(schema.validate_field("nope", None).is_none());
        assert!(schema
            .validate_field("age", Some(&FieldValue::Int(121)))
            .unwrap()
            .is_err());
    }
}
