//! ROF 5 intake: the captured form and named-field access to it.

mod fields;
mod form;

pub use fields::{canonical_field, template_key, FieldLookup};
pub use form::{Rof5Form, FIELD_NAMES, REQUIRED_FIELDS};
