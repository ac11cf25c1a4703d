//! Core error types for fieldform.
//!
//! [`FormError`] covers the three user-visible failure kinds of a form
//! session (fetch, per-field validation, submit) plus the configuration and
//! I/O errors raised by the ambient layers.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// Represents a validation error with optional field-level errors.
///
/// Validation errors can be either simple (a single message) or compound
/// (containing per-field message lists).
///
/// # Examples
///
/// ```
/// use fieldform_core::error::ValidationError;
///
/// let err = ValidationError::new("Username is required", "required");
///
/// let mut field_errors = std::collections::HashMap::new();
/// field_errors.insert("email".to_string(), vec!["Invalid email address".to_string()]);
/// let err = ValidationError::with_field_errors(field_errors);
/// assert_eq!(err.error_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationError {
    /// The primary error message.
    pub message: String,
    /// A short code identifying the type of failure (e.g. "required", "invalid").
    pub code: String,
    /// Per-field messages, keyed by field name.
    pub field_errors: HashMap<String, Vec<String>>,
}

impl ValidationError {
    /// Creates a new `ValidationError` with a message and code.
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            field_errors: HashMap::new(),
        }
    }

    /// Creates a `ValidationError` containing per-field errors.
    pub fn with_field_errors(field_errors: HashMap<String, Vec<String>>) -> Self {
        Self {
            message: String::new(),
            code: "invalid".to_string(),
            field_errors,
        }
    }

    /// Returns the number of fields that failed.
    pub fn error_count(&self) -> usize {
        self.field_errors.len()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.message.is_empty() {
            return write!(f, "{}", self.message);
        }
        // Sorted so the rendering is stable across runs.
        let mut fields: Vec<_> = self.field_errors.iter().collect();
        fields.sort_by(|a, b| a.0.cmp(b.0));
        let mut first = true;
        for (field, messages) in fields {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// The primary error type for fieldform.
///
/// Each variant maps to an HTTP status code via [`FormError::status_code`]
/// so the server crate can turn it into a response directly.
#[derive(Error, Debug)]
pub enum FormError {
    // ── Session errors ───────────────────────────────────────────────

    /// The descriptor list could not be retrieved.
    #[error("Failed to load form fields: {0}")]
    Fetch(String),

    /// The descriptor list could not be persisted.
    #[error("Failed to save form fields: {0}")]
    Submit(String),

    /// One or more fields failed validation.
    #[error("Validation error: {0}")]
    Validation(ValidationError),

    /// An edit or lookup named a field the session does not know.
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// A submit was attempted while another one is still pending.
    #[error("A submit is already in progress")]
    SubmitInProgress,

    /// The operation requires descriptors to be loaded first.
    #[error("Form is not ready")]
    NotReady,

    // ── Ambient ──────────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An error occurred during serialization or deserialization.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FormError {
    /// Returns the HTTP status code associated with this error.
    ///
    /// - `Validation`, `UnknownField`, `Serialization` -> 400
    /// - `SubmitInProgress`, `NotReady` -> 409
    /// - `Fetch` -> 503
    /// - everything else -> 500
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::UnknownField(_) | Self::Serialization(_) => 400,
            Self::SubmitInProgress | Self::NotReady => 409,
            Self::Fetch(_) => 503,
            Self::Submit(_) | Self::Configuration(_) | Self::Io(_) => 500,
        }
    }

    /// Returns `true` if the session can continue after this error.
    ///
    /// Fetch failures block the form until a reload; everything else leaves
    /// the user's edits in place.
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Fetch(_))
    }
}

impl From<serde_json::Error> for FormError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// A convenience type alias for `Result<T, FormError>`.
pub type FormResult<T> = Result<T, FormError>;
