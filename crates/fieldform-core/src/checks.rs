//! Diagnostics over a descriptor list.
//!
//! The form engine tolerates malformed descriptor lists (unknown types
//! degrade to text, duplicate names collapse to one rule), so these checks
//! are how an operator finds out that a list is not what they meant.
//!
//! ## Overview
//!
//! - [`CheckMessage`]: A diagnostic message (level, message, hint, object, id).
//! - [`CheckLevel`]: Info, Warning, or Error.
//! - [`CheckRegistry`]: Registry for check functions with tag-based filtering.
//! - [`FieldSummary`]: The per-descriptor facts the checks look at.
//!
//! ## Examples
//!
//! ```
//! use fieldform_core::checks::{CheckRegistry, FieldSummary};
//!
//! let fields = vec![
//!     FieldSummary::new("email", "email", true),
//!     FieldSummary::new("email", "text", true),
//! ];
//! let messages = CheckRegistry::with_builtins().run_checks(None, &fields);
//! assert!(messages.iter().any(|m| m.id.as_deref() == Some("fields.E001")));
//! ```

use std::collections::HashSet;

/// Name of the synthetic field added to every ruleset.
pub const CONTACT_FIELD: &str = "contact";

/// How bad a finding is. Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CheckLevel {
    /// Worth knowing; nothing to fix. Built-in checks never emit it, but
    /// registered checks may.
    Info,
    /// The list works, but probably not as intended.
    Warning,
    /// Two descriptors collide; one of them is unreachable.
    Error,
}

impl std::fmt::Display for CheckLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// A diagnostic message produced by a check.
#[derive(Debug, Clone)]
pub struct CheckMessage {
    /// The severity level.
    pub level: CheckLevel,
    /// The human-readable message describing the issue.
    pub msg: String,
    /// An optional hint on how to fix the issue.
    pub hint: Option<String>,
    /// The descriptor the issue relates to.
    pub obj: Option<String>,
    /// A unique identifier for this check message (e.g. "fields.W001").
    pub id: Option<String>,
}

impl CheckMessage {
    /// Creates a new `CheckMessage` with the given level and details.
    pub fn new(
        level: CheckLevel,
        msg: impl Into<String>,
        hint: Option<&str>,
        obj: Option<&str>,
        id: Option<&str>,
    ) -> Self {
        Self {
            level,
            msg: msg.into(),
            hint: hint.map(String::from),
            obj: obj.map(String::from),
            id: id.map(String::from),
        }
    }

    /// Creates an info-level message.
    pub fn info(msg: impl Into<String>, hint: Option<&str>, obj: Option<&str>, id: Option<&str>) -> Self {
        Self::new(CheckLevel::Info, msg, hint, obj, id)
    }

    /// Creates a warning-level message.
    pub fn warning(msg: impl Into<String>, hint: Option<&str>, obj: Option<&str>, id: Option<&str>) -> Self {
        Self::new(CheckLevel::Warning, msg, hint, obj, id)
    }

    /// Creates an error-level message.
    pub fn error(msg: impl Into<String>, hint: Option<&str>, obj: Option<&str>, id: Option<&str>) -> Self {
        Self::new(CheckLevel::Error, msg, hint, obj, id)
    }

    /// Returns `true` for error-level findings.
    pub fn is_error(&self) -> bool {
        self.level >= CheckLevel::Error
    }
}

impl std::fmt::Display for CheckMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref id) = self.id {
            write!(f, "({id}) ")?;
        }
        write!(f, "{}: {}", self.level, self.msg)?;
        if let Some(ref hint) = self.hint {
            write!(f, "\n\tHINT: {hint}")?;
        }
        if let Some(ref obj) = self.obj {
            write!(f, "\n\tObject: {obj}")?;
        }
        Ok(())
    }
}

/// The facts about one descriptor that the checks inspect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSummary {
    /// The descriptor's `name`.
    pub name: String,
    /// The raw `type` tag as it appeared on the wire.
    pub type_tag: String,
    /// Whether the type tag maps to a known validation strategy.
    pub known_type: bool,
}

impl FieldSummary {
    /// Creates a new summary.
    pub fn new(name: impl Into<String>, type_tag: impl Into<String>, known_type: bool) -> Self {
        Self {
            name: name.into(),
            type_tag: type_tag.into(),
            known_type,
        }
    }
}

/// A check function that receives descriptor summaries and returns messages.
pub type CheckFn = fn(&[FieldSummary]) -> Vec<CheckMessage>;

struct RegisteredCheck {
    func: CheckFn,
    tags: Vec<String>,
}

/// Registry for descriptor check functions.
///
/// Check functions can be registered with tags, and then run all at once
/// or filtered by tag.
pub struct CheckRegistry {
    checks: Vec<RegisteredCheck>,
}

impl CheckRegistry {
    /// Creates a new empty check registry.
    pub const fn new() -> Self {
        Self { checks: Vec::new() }
    }

    /// Creates a new check registry pre-loaded with the built-in checks.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(check_duplicate_names, &["fields", "names"]);
        registry.register(check_empty_names, &["fields", "names"]);
        registry.register(check_unknown_types, &["fields", "types"]);
        registry.register(check_contact_shadowed, &["fields", "names"]);
        registry
    }

    /// Registers a check function with the given tags.
    pub fn register(&mut self, func: CheckFn, tags: &[&str]) {
        self.checks.push(RegisteredCheck {
            func,
            tags: tags.iter().map(|t| (*t).to_string()).collect(),
        });
    }

    /// Runs all registered checks (or only those matching the given tags)
    /// and collects all resulting messages.
    pub fn run_checks(&self, tags: Option<&[&str]>, fields: &[FieldSummary]) -> Vec<CheckMessage> {
        let mut messages = Vec::new();

        for check in &self.checks {
            let should_run = tags.map_or(true, |filter_tags| {
                filter_tags.iter().any(|t| check.tags.iter().any(|own| own == t))
            });

            if should_run {
                messages.extend((check.func)(fields));
            }
        }

        messages
    }

    /// Returns the number of registered checks.
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Returns `true` if no checks are registered.
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

impl Default for CheckRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================
// Built-in checks
// ============================================================

/// Names are map keys; a duplicate silently collapses two inputs into one.
fn check_duplicate_names(fields: &[FieldSummary]) -> Vec<CheckMessage> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut messages = Vec::new();

    for field in fields {
        if !seen.insert(field.name.as_str()) && reported.insert(field.name.as_str()) {
            messages.push(CheckMessage::error(
                format!("Field name '{}' is used more than once.", field.name),
                Some("Give every descriptor a unique name."),
                Some(&field.name),
                Some("fields.E001"),
            ));
        }
    }

    messages
}

fn check_empty_names(fields: &[FieldSummary]) -> Vec<CheckMessage> {
    fields
        .iter()
        .enumerate()
        .filter(|(_, field)| field.name.trim().is_empty())
        .map(|(index, _)| {
            CheckMessage::warning(
                format!("Descriptor at position {index} has an empty name."),
                Some("Empty names cannot be addressed by edits or submits."),
                None,
                Some("fields.W003"),
            )
        })
        .collect()
}

fn check_unknown_types(fields: &[FieldSummary]) -> Vec<CheckMessage> {
    fields
        .iter()
        .filter(|field| !field.known_type)
        .map(|field| {
            CheckMessage::warning(
                format!(
                    "Field '{}' has unknown type '{}'; it will be validated as text.",
                    field.name, field.type_tag
                ),
                Some("Use one of: text, number, email, tel, checkbox."),
                Some(&field.name),
                Some("fields.W001"),
            )
        })
        .collect()
}

fn check_contact_shadowed(fields: &[FieldSummary]) -> Vec<CheckMessage> {
    fields
        .iter()
        .filter(|field| field.name == CONTACT_FIELD)
        .take(1)
        .map(|field| {
            CheckMessage::warning(
                "A descriptor named 'contact' is shadowed by the synthetic contact field.",
                Some("Rename the descriptor; its rule and value are replaced on submit."),
                Some(&field.name),
                Some("fields.W002"),
            )
        })
        .collect()
}
