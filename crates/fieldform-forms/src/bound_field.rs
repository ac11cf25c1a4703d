//! Bound fields: descriptors paired with live session state.
//!
//! A [`BoundField`] is what the rendering surface consumes for one visible
//! field: display strings from the descriptor, the live value, current
//! errors, hints, the interaction counter, and a widget to render with.

use fieldform_core::checks::CONTACT_FIELD;
use fieldform_store::{FieldDescriptor, FieldType, FieldValue, Variant};

use crate::session::FormSession;
use crate::visibility::visible_fields;
use crate::widgets::{self, escape_html, Attrs, Widget};

/// A form field bound to session state.
#[derive(Debug)]
pub struct BoundField {
    /// The field name, also the HTML `name` attribute.
    pub name: String,
    /// Label, falling back to the name.
    pub label: String,
    /// Placeholder text.
    pub placeholder: Option<String>,
    /// Help text.
    pub description: Option<String>,
    /// The declared type tag.
    pub field_type: FieldType,
    /// The rendering variant.
    pub variant: Variant,
    /// Layout row.
    pub row_index: Option<i64>,
    /// The live value.
    pub value: Option<FieldValue>,
    /// Current validation errors.
    pub errors: Vec<String>,
    /// Rendering hint.
    pub disabled: bool,
    /// Rendering hint.
    pub required: bool,
    /// User change events on this field so far.
    pub interactions: u32,
    /// The widget used for rendering.
    pub widget: Box<dyn Widget>,
}

impl BoundField {
    /// Binds `field` to the state in `session`.
    pub fn new(field: &FieldDescriptor, session: &FormSession) -> Self {
        Self {
            name: field.name.clone(),
            label: field.display_label().to_string(),
            placeholder: field.placeholder.clone(),
            description: field.description.clone(),
            field_type: field.field_type.clone(),
            variant: field.effective_variant(),
            row_index: field.row_index,
            value: session.value(&field.name).cloned(),
            errors: session.errors_for(&field.name).to_vec(),
            disabled: field.disabled,
            required: field.required,
            interactions: session.interactions(&field.name),
            widget: widgets::create_widget(widgets::widget_type_for(field)),
        }
    }

    /// Renders the widget HTML for this field.
    pub fn render(&self, extra_attrs: &Attrs) -> String {
        let mut attrs = extra_attrs.clone();
        attrs.entry("id".to_string()).or_insert_with(|| self.auto_id());
        if let Some(placeholder) = &self.placeholder {
            attrs
                .entry("placeholder".to_string())
                .or_insert_with(|| placeholder.clone());
        }
        if self.disabled {
            attrs.insert("disabled".to_string(), "disabled".to_string());
        }
        if self.required && self.variant != Variant::Checkbox {
            attrs.insert("required".to_string(), "required".to_string());
        }
        if self.has_errors() {
            attrs.insert("aria-invalid".to_string(), "true".to_string());
        }
        self.widget.render(&self.name, self.value.as_ref(), &attrs)
    }

    /// Renders a `<label>` element for this field.
    pub fn label_tag(&self) -> String {
        let label_id = self.widget.id_for_label(&self.auto_id());
        format!(
            r#"<label for="{}">{}</label>"#,
            escape_html(&label_id),
            escape_html(&self.label)
        )
    }

    /// Returns the HTML `id` of this field's control.
    pub fn auto_id(&self) -> String {
        format!("id_{}", self.name)
    }

    /// Returns `true` if this field has any errors.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Renders the error list as an HTML `<ul>` element.
    pub fn errors_as_ul(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        let items: String = self
            .errors
            .iter()
            .map(|e| format!("<li>{}</li>", escape_html(e)))
            .collect();
        format!(r#"<ul class="errorlist">{items}</ul>"#)
    }

    /// Renders label, control, help text, and errors as one block.
    pub fn as_div(&self) -> String {
        let help = self
            .description
            .as_deref()
            .map(|d| format!(r#"<p class="helptext">{}</p>"#, escape_html(d)))
            .unwrap_or_default();
        format!(
            r#"<div class="field" data-interactions="{}">{}{}{}{}</div>"#,
            self.interactions,
            self.label_tag(),
            self.render(&Attrs::new()),
            help,
            self.errors_as_ul()
        )
    }
}

/// Returns the descriptor the synthetic `contact` field renders from.
pub fn contact_descriptor() -> FieldDescriptor {
    FieldDescriptor::new(CONTACT_FIELD, FieldType::Text)
        .label("Contact")
        .placeholder("Email or phone number")
        .description("How can we reach you?")
        .required(true)
        .variant(Variant::Input)
}

/// Binds every visible field, ordered by `rowIndex`.
///
/// The sort is stable: fields without a row keep their relative order after
/// every field with one, and `contact` shares the row of `age`.
pub fn bind_fields(fields: &[FieldDescriptor], session: &FormSession) -> Vec<BoundField> {
    let contact = contact_descriptor();
    let mut bound: Vec<BoundField> = visible_fields(fields, session.values())
        .iter()
        .filter_map(|name| {
            if name == CONTACT_FIELD {
                let mut field = BoundField::new(&contact, session);
                field.row_index = fields
                    .iter()
                    .find(|f| f.name == crate::fields::AGE_FIELD)
                    .and_then(|f| f.row_index);
                Some(field)
            } else {
                fields
                    .iter()
                    .rev()
                    .find(|f| &f.name == name)
                    .map(|f| BoundField::new(f, session))
            }
        })
        .collect();
    bound.sort_by_key(|f| f.row_index.unwrap_or(i64::MAX));
    bound
}
