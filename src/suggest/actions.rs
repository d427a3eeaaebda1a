//! Next-step suggestions per workflow stage.

use super::WorkflowSuggestion;
use crate::workflow::{Instruction, Priority, Stage};

fn suggestion(action: &str, reason: &str, priority: Priority, days: u32) -> WorkflowSuggestion {
    WorkflowSuggestion {
        action: action.to_string(),
        reason: reason.to_string(),
        priority,
        estimated_days: days,
    }
}

/// Suggested next steps for an instruction. Nothing past execution.
pub fn workflow_suggestions(instruction: &Instruction) -> Vec<WorkflowSuggestion> {
    let mut suggestions = Vec::new();

    match instruction.stage {
        Stage::DocumentDrafting => {
            suggestions.push(suggestion(
                "Review and finalize lease agreement",
                "Standard lease template generated, requires legal review",
                Priority::Medium,
                2,
            ));
            if instruction.form_data.requested_priority() == Some(Priority::High) {
                suggestions.push(suggestion(
                    "Expedite external counsel review",
                    "High priority instruction requires faster processing",
                    Priority::High,
                    1,
                ));
            }
        }
        Stage::Execution => suggestions.push(suggestion(
            "Schedule landlord meeting for signing",
            "Documents ready for execution, coordination needed",
            Priority::Medium,
            3,
        )),
        Stage::Registration | Stage::Completed => {}
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::intake::Rof5Form;

    fn instruction(stage: Stage, urgency: &str) -> Instruction {
        let form = Rof5Form { urgency_level: urgency.into(), ..Rof5Form::default() };
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let mut instruction = Instruction::from_form("ROF-2026-001", form, today);
        instruction.stage = stage;
        instruction
    }

    #[test]
    fn test_drafting() {
        let s = workflow_suggestions(&instruction(Stage::DocumentDrafting, "low"));
        assert_eq!(s.len(), 1);
        assert_eq!(s[0].action, "Review and finalize lease agreement");
        assert_eq!(s[0].estimated_days, 2);
    }

    #[test]
    fn test_drafting_high_urgency_adds_expedite() {
        let s = workflow_suggestions(&instruction(Stage::DocumentDrafting, "high"));
        assert_eq!(s.len(), 2);
        assert_eq!(s[1].action, "Expedite external counsel review");
        assert_eq!(s[1].priority, Priority::High);
        assert_eq!(s[1].estimated_days, 1);
    }

    #[test]
    fn test_execution_and_later() {
        let s = workflow_suggestions(&instruction(Stage::Execution, "high"));
        assert_eq!(s.len(), 1);
        assert_eq!(s[0].action, "Schedule landlord meeting for signing");

        assert!(workflow_suggestions(&instruction(Stage::Registration, "high")).is_empty());
        assert!(workflow_suggestions(&instruction(Stage::Completed, "")).is_empty());
    }
}
