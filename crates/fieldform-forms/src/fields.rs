//! Field rules and type-level validation.
//!
//! Each [`FieldRule`] pairs a field name and label with a [`FieldKind`] that
//! carries the kind's constraint parameters. [`FieldRule::for_descriptor`]
//! is the single place a descriptor's `type` tag selects a strategy; the
//! [`clean_field_value`] function dispatches on the kind to coerce and check
//! one value.

use once_cell::sync::Lazy;
use regex::Regex;

use fieldform_core::checks::CONTACT_FIELD;
use fieldform_store::{FieldDescriptor, FieldType, FieldValue};

/// Name of the field whose number rule carries the age bounds and messages.
pub const AGE_FIELD: &str = "age";

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$").expect("valid regex")
});

static TEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+]?[(]?[0-9]{3}[)]?[-\s.]?[0-9]{3}[-\s.]?[0-9]{4,6}$").expect("valid regex")
});

/// Returns `true` if `s` looks like an email address.
pub fn is_email(s: &str) -> bool {
    EMAIL_RE.is_match(s)
}

/// Returns `true` if `s` looks like a phone number.
pub fn is_phone(s: &str) -> bool {
    TEL_RE.is_match(s)
}

/// Inclusive bounds and messages for a number rule.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberBounds {
    /// Smallest accepted value.
    pub min: f64,
    /// Largest accepted value.
    pub max: f64,
    /// Message for input that does not coerce to a number.
    pub not_a_number: String,
    /// Message for a number outside `[min, max]`.
    pub out_of_range: String,
}

impl NumberBounds {
    /// The `[1, 120]` bounds used for the `age` field.
    pub fn age() -> Self {
        Self {
            min: 1.0,
            max: 120.0,
            not_a_number: "Age must be a number".to_string(),
            out_of_range: "Age must be between 1 and 120".to_string(),
        }
    }

    /// The `[1, 100]` bounds used for every other number field.
    pub fn generic(label: &str) -> Self {
        Self {
            min: 1.0,
            max: 100.0,
            not_a_number: format!("{label} must be a number"),
            out_of_range: format!("{label} must be between 1 and 100"),
        }
    }

    fn contains(&self, n: f64) -> bool {
        (self.min..=self.max).contains(&n)
    }
}

/// The validation strategy of a rule.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Any string; required means non-blank after trimming.
    Text,
    /// An email address.
    Email,
    /// A number coerced from its input representation.
    Number(NumberBounds),
    /// A phone number.
    Tel,
    /// A boolean. Never fails.
    Checkbox,
    /// Either an email address or a phone number.
    Contact,
}

/// A validation rule for one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRule {
    /// The field name.
    pub name: String,
    /// The label used in messages.
    pub label: String,
    /// Whether a blank value fails.
    pub required: bool,
    /// The strategy.
    pub kind: FieldKind,
}

impl FieldRule {
    /// Builds the rule for a descriptor.
    ///
    /// Unknown type tags fall back to [`FieldKind::Text`]. A checkbox is
    /// optional whatever its `required` flag says.
    pub fn for_descriptor(field: &FieldDescriptor) -> Self {
        let label = field.display_label().to_string();
        let (kind, required) = match &field.field_type {
            FieldType::Email => (FieldKind::Email, field.required),
            FieldType::Number if field.name == AGE_FIELD => {
                (FieldKind::Number(NumberBounds::age()), field.required)
            }
            FieldType::Number => (FieldKind::Number(NumberBounds::generic(&label)), field.required),
            FieldType::Tel => (FieldKind::Tel, field.required),
            FieldType::Checkbox => (FieldKind::Checkbox, false),
            FieldType::Text | FieldType::Other(_) => (FieldKind::Text, field.required),
        };
        Self {
            name: field.name.clone(),
            label,
            required,
            kind,
        }
    }

    /// Builds the synthetic `contact` rule.
    pub fn contact() -> Self {
        Self {
            name: CONTACT_FIELD.to_string(),
            label: "Contact".to_string(),
            required: true,
            kind: FieldKind::Contact,
        }
    }

    /// Returns the message for a blank required value.
    pub fn required_message(&self) -> String {
        format!("{} is required", self.label)
    }

    /// Validates one value against this rule. See [`clean_field_value`].
    pub fn clean(&self, value: Option<&FieldValue>) -> Result<Option<FieldValue>, Vec<String>> {
        clean_field_value(self, value)
    }
}

/// Cleans one value against a rule.
///
/// Returns the coerced value, `Ok(None)` for a blank optional value, or the
/// error messages. An absent value is treated as blank.
///
/// Coercion per kind:
/// - text keeps the input as a string
/// - number becomes an integer when whole, a float otherwise
/// - checkbox becomes a boolean
/// - email, tel, and contact keep the input as a string
pub fn clean_field_value(
    rule: &FieldRule,
    value: Option<&FieldValue>,
) -> Result<Option<FieldValue>, Vec<String>> {
    if rule.kind == FieldKind::Checkbox {
        return Ok(Some(FieldValue::Bool(value.is_some_and(FieldValue::truthy))));
    }

    let blank = value.map_or(true, FieldValue::is_blank);
    if blank {
        return match rule.kind {
            FieldKind::Contact => Err(vec![contact_message()]),
            _ if rule.required => Err(vec![rule.required_message()]),
            // Optional text keeps an empty string; other kinds are absent.
            FieldKind::Text => Ok(Some(value.cloned().unwrap_or_else(FieldValue::empty))),
            _ => Ok(None),
        };
    }
    let Some(value) = value else {
        return Ok(None);
    };

    match &rule.kind {
        FieldKind::Text => Ok(Some(FieldValue::String(value.as_text().into_owned()))),
        FieldKind::Email => {
            let text = value.as_text();
            if is_email(text.trim()) {
                Ok(Some(FieldValue::String(text.into_owned())))
            } else {
                Err(vec!["Invalid email address".to_string()])
            }
        }
        FieldKind::Tel => {
            let text = value.as_text();
            if is_phone(text.trim()) {
                Ok(Some(FieldValue::String(text.into_owned())))
            } else {
                Err(vec!["Invalid phone number".to_string()])
            }
        }
        FieldKind::Number(bounds) => match value.as_number() {
            Some(n) if bounds.contains(n) => Ok(Some(FieldValue::from_number(n))),
            Some(_) => Err(vec![bounds.out_of_range.clone()]),
            None => Err(vec![bounds.not_a_number.clone()]),
        },
        FieldKind::Contact => {
            let text = value.as_text();
            let trimmed = text.trim();
            if is_email(trimmed) || is_phone(trimmed) {
                Ok(Some(FieldValue::String(text.into_owned())))
            } else {
                Err(vec![contact_message()])
            }
        }
        FieldKind::Checkbox => Ok(Some(FieldValue::Bool(value.truthy()))),
    }
}

fn contact_message() -> String {
    "Please enter a valid email or phone number".to_string()
}
