//! Placeholder substitution.
//!
//! Substitution is literal and global: every `{{key}}` for a bound key is
//! replaced, bindings are applied in list order, and placeholders without a
//! binding are left in the text so a reviewer can see what is missing.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([A-Za-z0-9_]+)\}\}").expect("placeholder pattern is valid"));

/// A `(key, value)` binding for one placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentVariable {
    /// Placeholder key, without braces
    pub key: String,

    /// Replacement text
    pub value: String,
}

impl DocumentVariable {
    /// Create a binding.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { key: key.into(), value: value.into() }
    }
}

/// Output of rendering a catalog template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedDocument {
    /// Template that was rendered
    pub template_id: String,

    /// Substituted text
    pub content: String,

    /// Declared variables still present as `{{key}}` in the output
    pub missing: Vec<String>,
}

impl RenderedDocument {
    /// Whether every declared variable was substituted.
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Format a key as its placeholder token.
pub fn placeholder(key: &str) -> String {
    format!("{{{{{key}}}}}")
}

/// Substitute every occurrence of each bound key, in binding order.
pub fn render_content(content: &str, bindings: &[DocumentVariable]) -> String {
    bindings.iter().fold(content.to_string(), |text, binding| {
        text.replace(&placeholder(&binding.key), &binding.value)
    })
}

/// Placeholder keys present in `text`, in first-appearance order.
pub fn placeholders(text: &str) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(text) {
        let key = &caps[1];
        if !keys.iter().any(|k| k == key) {
            keys.push(key.to_string());
        }
    }
    keys
}
