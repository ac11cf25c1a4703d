//! Field values as they travel on the wire and through a form session.
//!
//! A descriptor's `value` is a JSON scalar: string, number, or boolean.
//! [`FieldValue`] keeps integers and floats apart so a whole number read
//! from the store is written back unchanged.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A scalar field value.
///
/// Deserialization is untagged: `true` is a `Bool`, `121` an `Int`, `1.5` a
/// `Float`, and anything quoted a `String`. Absence is modelled as
/// `Option<FieldValue>` by the callers, never as a variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// A boolean (checkbox state).
    Bool(bool),
    /// A whole number.
    Int(i64),
    /// A fractional number.
    Float(f64),
    /// Free text, including raw user input for numeric inputs.
    String(String),
}

impl FieldValue {
    /// Returns the empty string value, the default for non-boolean inputs.
    pub fn empty() -> Self {
        Self::String(String::new())
    }

    /// Returns `true` for strings that are empty or whitespace-only.
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::String(s) if s.trim().is_empty())
    }

    /// Coerces the value to a number.
    ///
    /// Strings are trimmed and parsed; blank strings, booleans, and
    /// non-numeric text yield `None`, as do non-finite results.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            Self::Int(i) => *i as f64,
            Self::Float(f) => *f,
            Self::String(s) => s.trim().parse::<f64>().ok()?,
            Self::Bool(_) => return None,
        };
        n.is_finite().then_some(n)
    }

    /// Coerces the value to a boolean the way a checkbox reads it.
    pub fn truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
            Self::String(s) => matches!(
                s.trim().to_lowercase().as_str(),
                "true" | "1" | "yes" | "on"
            ),
        }
    }

    /// Returns the value as text, borrowing when it already is a string.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::String(s) => Cow::Borrowed(s),
            other => Cow::Owned(other.to_string()),
        }
    }

    /// Builds a numeric value, preferring `Int` for whole numbers.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_number(n: f64) -> Self {
        if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
            Self::Int(n as i64)
        } else {
            Self::Float(n)
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}
