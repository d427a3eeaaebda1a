//! Field lookup by name across intake forms and binding tables.
//!
//! Forms name fields in camelCase (`monthlyRent`) while templates use
//! snake_case keys (`monthly_rent`); the rule table accepts either.

use std::collections::HashMap;

use crate::template::DocumentVariable;

/// Read access to named string fields.
pub trait FieldLookup {
    /// Raw value of a field, `None` if the field does not exist.
    fn lookup(&self, name: &str) -> Option<&str>;

    /// Value of a field when it exists and is non-empty.
    fn filled(&self, name: &str) -> Option<&str> {
        self.lookup(name).filter(|v| !v.is_empty())
    }
}

/// Form-side (camelCase) name for a field or template key.
pub fn canonical_field(name: &str) -> String {
    let camel = if name.contains('_') { snake_to_camel(name) } else { name.to_string() };
    match camel.as_str() {
        "escalationRate" => "rentEscalation".to_string(),
        _ => camel,
    }
}

/// Template-side (snake_case) key for a field or template key.
pub fn template_key(name: &str) -> String {
    match canonical_field(name).as_str() {
        "rentEscalation" => "escalation_rate".to_string(),
        other => camel_to_snake(other),
    }
}

fn snake_to_camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '_' {
            upper = !out.is_empty();
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn camel_to_snake(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            if !out.is_empty() {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

impl FieldLookup for [DocumentVariable] {
    fn lookup(&self, name: &str) -> Option<&str> {
        let key = template_key(name);
        self.iter()
            .find(|b| b.key == name)
            .or_else(|| self.iter().find(|b| b.key == key))
            .map(|b| b.value.as_str())
    }
}

impl FieldLookup for HashMap<String, String> {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.get(name)
            .or_else(|| self.get(&canonical_field(name)))
            .or_else(|| self.get(&template_key(name)))
            .map(String::as_str)
    }
}
