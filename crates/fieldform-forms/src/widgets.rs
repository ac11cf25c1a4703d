//! Widget system for rendering HTML form controls.
//!
//! Each widget knows how to render itself as HTML and which `id` its
//! `<label>` should target. A descriptor's `variant` picks between an input
//! and a checkbox; for inputs, the descriptor's `type` picks the HTML input
//! type.

use std::collections::BTreeMap;
use std::fmt;

use fieldform_store::{FieldDescriptor, FieldType, FieldValue, Variant};

/// Enumerates the built-in widget types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetType {
    /// `<input type="text">`.
    TextInput,
    /// `<input type="number">`.
    NumberInput,
    /// `<input type="email">`.
    EmailInput,
    /// `<input type="tel">`.
    TelInput,
    /// `<input type="checkbox">`.
    CheckboxInput,
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TextInput => "TextInput",
            Self::NumberInput => "NumberInput",
            Self::EmailInput => "EmailInput",
            Self::TelInput => "TelInput",
            Self::CheckboxInput => "CheckboxInput",
        };
        write!(f, "{name}")
    }
}

/// An HTML attribute map. Ordered so rendering is deterministic.
pub type Attrs = BTreeMap<String, String>;

/// A trait for HTML form widgets.
pub trait Widget: Send + Sync + fmt::Debug {
    /// Returns the widget type.
    fn widget_type(&self) -> WidgetType;

    /// Renders the widget for `name` with the current `value` and extra
    /// attributes.
    fn render(&self, name: &str, value: Option<&FieldValue>, attrs: &Attrs) -> String;

    /// Returns the `id` a `<label>` targeting this widget should use.
    fn id_for_label(&self, id: &str) -> String {
        id.to_string()
    }
}

/// Escapes HTML special characters.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Formats attributes as ` key="value"`, escaping values.
fn render_attrs(attrs: &Attrs) -> String {
    attrs
        .iter()
        .map(|(k, v)| format!(r#" {k}="{}""#, escape_html(v)))
        .collect()
}

/// A single-line `<input>` of the given HTML type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Input {
    widget_type: WidgetType,
}

impl Input {
    /// Returns the HTML `type` attribute value.
    pub const fn html_type(&self) -> &'static str {
        match self.widget_type {
            WidgetType::NumberInput => "number",
            WidgetType::EmailInput => "email",
            WidgetType::TelInput => "tel",
            WidgetType::TextInput | WidgetType::CheckboxInput => "text",
        }
    }
}

impl Widget for Input {
    fn widget_type(&self) -> WidgetType {
        self.widget_type
    }

    fn render(&self, name: &str, value: Option<&FieldValue>, attrs: &Attrs) -> String {
        let val = value.map(FieldValue::as_text).unwrap_or_default();
        format!(
            r#"<input type="{}" name="{}" value="{}"{} />"#,
            self.html_type(),
            escape_html(name),
            escape_html(&val),
            render_attrs(attrs)
        )
    }
}

/// An `<input type="checkbox">`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckboxInput;

impl Widget for CheckboxInput {
    fn widget_type(&self) -> WidgetType {
        WidgetType::CheckboxInput
    }

    fn render(&self, name: &str, value: Option<&FieldValue>, attrs: &Attrs) -> String {
        let checked_attr = if value.is_some_and(FieldValue::truthy) {
            " checked"
        } else {
            ""
        };
        format!(
            r#"<input type="checkbox" name="{}"{checked_attr}{} />"#,
            escape_html(name),
            render_attrs(attrs)
        )
    }
}

/// Creates a boxed widget from a `WidgetType`.
pub fn create_widget(widget_type: WidgetType) -> Box<dyn Widget> {
    match widget_type {
        WidgetType::CheckboxInput => Box::new(CheckboxInput),
        other => Box::new(Input { widget_type: other }),
    }
}

/// Returns the widget type that renders `field`.
///
/// A `Checkbox` variant renders a checkbox whatever the type; every other
/// variant renders an input typed after the field type.
pub fn widget_type_for(field: &FieldDescriptor) -> WidgetType {
    match field.effective_variant() {
        Variant::Checkbox => WidgetType::CheckboxInput,
        Variant::Input | Variant::Other(_) => match field.field_type {
            FieldType::Number => WidgetType::NumberInput,
            FieldType::Email => WidgetType::EmailInput,
            FieldType::Tel => WidgetType::TelInput,
            FieldType::Text | FieldType::Checkbox | FieldType::Other(_) => WidgetType::TextInput,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_input_render() {
        let w = create_widget(WidgetType::TextInput);
        let html = w.render("username", Some(&"shadcn".into()), &Attrs::new());
        assert!(html.contains(r#"type="text""#));
        assert!(html.contains(r#"name="username""#));
        assert!(html.contains(r#"value="shadcn""#));
    }

    #[test]
    fn test_number_input_renders_int() {
        let w = create_widget(WidgetType::NumberInput);
        let html = w.render("age", Some(&FieldValue::Int(25)), &Attrs::new());
        assert!(html.contains(r#"type="number""#));
        assert!(html.contains(r#"value="25""#));
    }

    #[test]
    fn test_input_without_value() {
        let w = create_widget(WidgetType::EmailInput);
        let html = w.render("email", None, &Attrs::new());
        assert!(html.contains(r#"type="email""#));
        assert!(html.contains(r#"value="""#));
    }

    #[test]
    fn test_value_is_escaped() {
        let w = create_widget(WidgetType::TextInput);
        let html = w.render("bio", Some(&r#""><script>"#.into()), &Attrs::new());
        assert!(html.contains("&quot;&gt;&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_checkbox_render() {
        let w = create_widget(WidgetType::CheckboxInput);
        let checked = w.render("newsletter", Some(&FieldValue::Bool(true)), &Attrs::new());
        assert!(checked.contains(r#"type="checkbox""#));
        assert!(checked.contains(" checked"));
        let unchecked = w.render("newsletter", Some(&FieldValue::Bool(false)), &Attrs::new());
        assert!(!unchecked.contains("checked"));
    }

    #[test]
    fn test_attrs_sorted() {
        let w = create_widget(WidgetType::TelInput);
        let attrs = Attrs::from([
            ("placeholder".to_string(), "555".to_string()),
            ("id".to_string(), "id_phone".to_string()),
        ]);
        let html = w.render("phone", None, &attrs);
        let id_at = html.find("id=").unwrap();
        let placeholder_at = html.find("placeholder=").unwrap();
        assert!(id_at < placeholder_at);
    }

    #[test]
    fn test_widget_type_for_descriptor() {
        assert_eq!(
            widget_type_for(&FieldDescriptor::new("age", FieldType::Number)),
            WidgetType::NumberInput
        );
        assert_eq!(
            widget_type_for(&FieldDescriptor::new("phone", FieldType::Tel)),
            WidgetType::TelInput
        );
        assert_eq!(
            widget_type_for(&FieldDescriptor::new("newsletter", FieldType::Checkbox)),
            WidgetType::CheckboxInput
        );
        assert_eq!(
            widget_type_for(
                &FieldDescriptor::new("agree", FieldType::Text).variant(Variant::Checkbox)
            ),
            WidgetType::CheckboxInput
        );
        assert_eq!(
            widget_type_for(&FieldDescriptor::new("dob", "date")),
            WidgetType::TextInput
        );
    }

    #[test]
    fn test_widget_type_display() {
        assert_eq!(WidgetType::TelInput.to_string(), "TelInput");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#x27;");
    }
}
