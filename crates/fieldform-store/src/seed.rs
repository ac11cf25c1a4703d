//! The sample profile form served when no data file is configured.

use crate::descriptor::{FieldDescriptor, FieldType, Variant};

/// Returns the sample descriptor list: a username, an email, an age, a
/// phone number, and a newsletter opt-in, one per row.
pub fn seed_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("username", FieldType::Text)
            .label("Username")
            .placeholder("shadcn")
            .description("This is your public display name.")
            .required(true)
            .value("shadcn")
            .row_index(0)
            .variant(Variant::Input),
        FieldDescriptor::new("email", FieldType::Email)
            .label("Email")
            .placeholder("you@example.com")
            .required(true)
            .row_index(1)
            .variant(Variant::Input),
        FieldDescriptor::new("age", FieldType::Number)
            .label("Age")
            .placeholder("18")
            .description("Must be between 1 and 120.")
            .row_index(2)
            .variant(Variant::Input),
        FieldDescriptor::new("phone", FieldType::Tel)
            .label("Phone")
            .placeholder("555-123-4567")
            .row_index(3)
            .variant(Variant::Input),
        FieldDescriptor::new("newsletter", FieldType::Checkbox)
            .label("Subscribe to the newsletter")
            .value(false)
            .row_index(4)
            .variant(Variant::Checkbox),
    ]
}
