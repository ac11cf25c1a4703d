//! Per-session form state.
//!
//! A [`FormSession`] holds the live value map, the interaction counters,
//! and the current per-field errors of one rendering session. Readers get
//! shared references; only the controller in this crate mutates it.

use std::collections::HashMap;

use fieldform_store::FieldValue;

use crate::defaults::ValueMap;

/// Live state of one form session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormSession {
    values: ValueMap,
    interactions: HashMap<String, u32>,
    errors: HashMap<String, Vec<String>>,
}

impl FormSession {
    /// Starts a session from derived defaults.
    pub fn new(defaults: ValueMap) -> Self {
        Self {
            values: defaults,
            ..Self::default()
        }
    }

    /// Returns the live value map.
    pub const fn values(&self) -> &ValueMap {
        &self.values
    }

    /// Returns the live value of `name`.
    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Returns how many times `name` has been changed by the user.
    pub fn interactions(&self, name: &str) -> u32 {
        self.interactions.get(name).copied().unwrap_or(0)
    }

    /// Returns the total number of change events in this session.
    pub fn total_interactions(&self) -> u32 {
        self.interactions.values().sum()
    }

    /// Returns the current errors of `name`.
    pub fn errors_for(&self, name: &str) -> &[String] {
        self.errors.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns every field's current errors.
    pub const fn errors(&self) -> &HashMap<String, Vec<String>> {
        &self.errors
    }

    /// Returns `true` if any field has errors.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub(crate) fn record_change(&mut self, name: &str, value: FieldValue) {
        self.values.insert(name.to_string(), value);
        *self.interactions.entry(name.to_string()).or_insert(0) += 1;
    }

    pub(crate) fn set_field_errors(&mut self, name: &str, errors: Vec<String>) {
        if errors.is_empty() {
            self.errors.remove(name);
        } else {
            self.errors.insert(name.to_string(), errors);
        }
    }

    pub(crate) fn replace_errors(&mut self, errors: HashMap<String, Vec<String>>) {
        self.errors = errors;
    }

    /// Gives fields that have no live value their default, keeping edits.
    pub(crate) fn fill_missing(&mut self, defaults: &ValueMap) {
        for (name, value) in defaults {
            self.values
                .entry(name.clone())
                .or_insert_with(|| value.clone());
        }
    }

    pub(crate) fn reset(&mut self, defaults: ValueMap) {
        *self = Self::new(defaults);
    }
}
