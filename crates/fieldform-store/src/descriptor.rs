//! Field descriptors: the server-supplied description of one form input.
//!
//! A [`FieldDescriptor`] is passive data. The form engine reads its `type`
//! to pick a validation strategy, its `value` to derive a default, and its
//! display strings to render a control. The wire format is camelCase JSON:
//!
//! ```json
//! { "name": "age", "type": "number", "label": "Age", "required": true,
//!   "value": 25, "rowIndex": 2, "variant": "Input" }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use fieldform_core::checks::FieldSummary;

use crate::value::FieldValue;

/// The declared type of a field.
///
/// Unknown tags are kept verbatim in [`FieldType::Other`] so a list read
/// from the store serializes back unchanged; the form engine validates them
/// as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    /// Free text.
    #[default]
    Text,
    /// A number, entered as text and coerced.
    Number,
    /// An email address.
    Email,
    /// A telephone number.
    Tel,
    /// A boolean checkbox.
    Checkbox,
    /// Any tag not listed above.
    Other(String),
}

impl FieldType {
    /// Returns the wire tag for this type.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Email => "email",
            Self::Tel => "tel",
            Self::Checkbox => "checkbox",
            Self::Other(tag) => tag,
        }
    }

    /// Returns `true` if this tag maps to a known validation strategy.
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for FieldType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "text" => Self::Text,
            "number" => Self::Number,
            "email" => Self::Email,
            "tel" => Self::Tel,
            "checkbox" => Self::Checkbox,
            _ => Self::Other(tag),
        }
    }
}

impl From<&str> for FieldType {
    fn from(tag: &str) -> Self {
        Self::from(tag.to_string())
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which control renders the field, independent of its type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Variant {
    /// A single-line input whose HTML type follows the field type.
    Input,
    /// A checkbox.
    Checkbox,
    /// Any other selector, kept verbatim and rendered as an input.
    Other(String),
}

impl Variant {
    /// Returns the wire name of this variant.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Input => "Input",
            Self::Checkbox => "Checkbox",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for Variant {
    fn from(name: String) -> Self {
        match name.as_str() {
            "Input" => Self::Input,
            "Checkbox" => Self::Checkbox,
            _ => Self::Other(name),
        }
    }
}

impl From<Variant> for String {
    fn from(variant: Variant) -> Self {
        match variant {
            Variant::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

/// Description of one form input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// Unique key within a form; used as map key and wire identifier.
    pub name: String,
    /// Declared type; selects the validation strategy.
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    /// Human-readable label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Placeholder text shown in an empty input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Help text displayed under the input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the field must be filled in.
    #[serde(default)]
    pub required: bool,
    /// Rendering hint; not enforced by validation.
    #[serde(default)]
    pub disabled: bool,
    /// Current value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<FieldValue>,
    /// Layout row; no effect on validation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_index: Option<i64>,
    /// Rendering-control selector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<Variant>,
}

impl FieldDescriptor {
    /// Creates a descriptor with the given name and type and nothing else set.
    pub fn new(name: impl Into<String>, field_type: impl Into<FieldType>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            label: None,
            placeholder: None,
            description: None,
            required: false,
            disabled: false,
            value: None,
            row_index: None,
            variant: None,
        }
    }

    /// Sets the label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the placeholder.
    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets whether the field is required.
    #[must_use]
    pub const fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets whether the field is disabled.
    #[must_use]
    pub const fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Sets the current value.
    #[must_use]
    pub fn value(mut self, value: impl Into<FieldValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Sets the layout row.
    #[must_use]
    pub const fn row_index(mut self, row: i64) -> Self {
        self.row_index = Some(row);
        self
    }

    /// Sets the rendering variant.
    #[must_use]
    pub fn variant(mut self, variant: Variant) -> Self {
        self.variant = Some(variant);
        self
    }

    /// Returns the label, falling back to the name.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    /// Returns the variant that renders this field: the declared one, or
    /// `Checkbox` for checkbox fields and `Input` for everything else.
    pub fn effective_variant(&self) -> Variant {
        self.variant.clone().unwrap_or(match self.field_type {
            FieldType::Checkbox => Variant::Checkbox,
            _ => Variant::Input,
        })
    }

    /// Returns the facts the descriptor checks look at.
    pub fn summary(&self) -> FieldSummary {
        FieldSummary::new(
            self.name.clone(),
            self.field_type.as_str(),
            self.field_type.is_known(),
        )
    }
}

/// Summarizes a whole list for [`fieldform_core::checks::CheckRegistry`].
pub fn summarize(fields: &[FieldDescriptor]) -> Vec<FieldSummary> {
    fields.iter().map(FieldDescriptor::summary).collect()
}
