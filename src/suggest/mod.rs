//! Rule-based suggestions.
//!
//! Everything here is a deterministic lookup over the intake form. The
//! [`SuggestionProvider`] trait is the seam callers depend on; the only
//! implementation is [`RuleBasedProvider`].

mod actions;
mod autofill;
mod deadline;
mod priority;
mod rules;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use actions::workflow_suggestions;
pub use autofill::auto_fill;
pub use deadline::{
    deadline_days, smart_deadline, DEFAULT_DEADLINE_DAYS, HIGH_DEADLINE_DAYS, MEDIUM_DEADLINE_DAYS,
};
pub use priority::{priority_score, smart_priority};
pub use rules::{form_suggestions, leading_float, leading_int, location_options};

use crate::intake::{FieldLookup, Rof5Form};
use crate::workflow::{Instruction, Priority};

/// What a suggestion is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuggestionKind {
    FormCompletion,
    WorkflowAction,
    Priority,
    Deadline,
}

/// A suggested value for one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub value: String,
    pub confidence: f32,
    pub reason: String,
}

impl Suggestion {
    /// A form-completion suggestion for `field`.
    pub fn form(
        field: &str,
        value: impl Into<String>,
        confidence: f32,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            kind: SuggestionKind::FormCompletion,
            field: Some(field.to_string()),
            value: value.into(),
            confidence,
            reason: reason.into(),
        }
    }
}

/// A suggested next step for an instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSuggestion {
    pub action: String,
    pub reason: String,
    pub priority: Priority,
    pub estimated_days: u32,
}

/// Source of suggestions for forms and instructions.
pub trait SuggestionProvider: Send + Sync {
    /// Provider name, for logs.
    fn name(&self) -> &str;

    /// Suggested values for `field`, best first. Empty when no rule applies.
    fn form_suggestions(&self, form: &dyn FieldLookup, field: &str) -> Vec<Suggestion>;

    /// Priority implied by the form.
    fn smart_priority(&self, form: &Rof5Form) -> Priority;

    /// Target completion date for an instruction of `priority`.
    fn smart_deadline(&self, form: &Rof5Form, priority: Priority, today: NaiveDate) -> NaiveDate;

    /// Next steps for an instruction at its current stage.
    fn workflow_suggestions(&self, instruction: &Instruction) -> Vec<WorkflowSuggestion>;
}

/// The fixed rule table.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleBasedProvider;

impl RuleBasedProvider {
    /// Create the provider.
    pub fn new() -> Self {
        Self
    }
}

impl SuggestionProvider for RuleBasedProvider {
    fn name(&self) -> &str {
        "rules"
    }

    fn form_suggestions(&self, form: &dyn FieldLookup, field: &str) -> Vec<Suggestion> {
        form_suggestions(form, field)
    }

    fn smart_priority(&self, form: &Rof5Form) -> Priority {
        smart_priority(form)
    }

    fn smart_deadline(&self, form: &Rof5Form, priority: Priority, today: NaiveDate) -> NaiveDate {
        smart_deadline(form, priority, today)
    }

    fn workflow_suggestions(&self, instruction: &Instruction) -> Vec<WorkflowSuggestion> {
        workflow_suggestions(instruction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_delegates_to_rules() {
        let provider: Box<dyn SuggestionProvider> = Box::new(RuleBasedProvider::new());
        let form = Rof5Form { county: "mombasa".into(), ..Rof5Form::default() };

        assert_eq!(provider.name(), "rules");
        assert_eq!(provider.form_suggestions(&form, "siteLocation").len(), 4);
        assert_eq!(provider.smart_priority(&form), Priority::Low);
    }

    #[test]
    fn test_suggestion_serializes_type_tag() {
        let suggestion = Suggestion::form("deposit", "100000", 0.85, "Two months' rent");
        let json = serde_json::to_value(&suggestion).unwrap();
        assert_eq!(json["type"], "form-completion");
        assert_eq!(json["field"], "deposit");
    }
}
