//! Instruction record, lifecycle stages and audit entries.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::intake::Rof5Form;

/// Lifecycle stage of an instruction.
///
/// Declaration order is the canonical progression, so `Ord` compares stages
/// by how far along they are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    DocumentDrafting,
    Execution,
    Registration,
    Completed,
}

impl Stage {
    /// All stages in canonical order.
    pub const ALL: [Self; 4] =
        [Self::DocumentDrafting, Self::Execution, Self::Registration, Self::Completed];

    /// Progress percentage a stage implies.
    pub fn progress(self) -> u8 {
        match self {
            Self::DocumentDrafting => 25,
            Self::Execution => 60,
            Self::Registration => 85,
            Self::Completed => 100,
        }
    }

    /// Canonical next action once an instruction enters this stage.
    pub fn next_action(self) -> &'static str {
        match self {
            Self::DocumentDrafting => "EC Review",
            Self::Execution => "POA Signature",
            Self::Registration => "Document Return",
            Self::Completed => "Instruction Closed",
        }
    }

    /// Stage immediately after this one.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::DocumentDrafting => Some(Self::Execution),
            Self::Execution => Some(Self::Registration),
            Self::Registration => Some(Self::Completed),
            Self::Completed => None,
        }
    }

    /// Stages strictly after this one.
    pub fn later_stages(self) -> Vec<Self> {
        Self::ALL.into_iter().filter(|s| *s > self).collect()
    }

    /// Whether no transition leaves this stage.
    pub fn is_terminal(self) -> bool {
        self == Self::Completed
    }

    /// Kebab-case identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DocumentDrafting => "document-drafting",
            Self::Execution => "execution",
            Self::Registration => "registration",
            Self::Completed => "completed",
        }
    }

    /// Human-readable name.
    pub fn title(self) -> &'static str {
        match self {
            Self::DocumentDrafting => "Document Drafting",
            Self::Execution => "Execution",
            Self::Registration => "Registration",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| format!("Unknown stage: {s}"))
    }
}

/// Instruction priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// All priorities, lowest first.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Lowercase identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!("Unknown priority: {s}")),
        }
    }
}

/// Who performed an audited action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum AuditUser {
    /// Automated workflow step
    System,
    /// Rule-based suggestion applied on someone's behalf
    Assistant,
    /// A named person
    Human(String),
}

impl AuditUser {
    /// A named person, or the system when the name is blank.
    pub fn human_or_system(name: &str) -> Self {
        let name = name.trim();
        if name.is_empty() {
            Self::System
        } else {
            Self::Human(name.to_string())
        }
    }
}

impl fmt::Display for AuditUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::System => f.write_str("System"),
            Self::Assistant => f.write_str("AI Assistant"),
            Self::Human(name) => f.write_str(name),
        }
    }
}

/// One appended record of an action taken against an instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: String,
    pub action: String,
    pub user: AuditUser,
    pub timestamp: DateTime<Utc>,
    pub details: String,
}

/// A property-leasing case tracked through its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instruction {
    pub id: String,
    pub site_code: String,
    pub site_location: String,
    pub landlord_name: String,
    pub stage: Stage,
    pub progress: u8,
    pub created_at: NaiveDate,
    pub last_updated: NaiveDate,
    pub assignee: String,
    pub next_action: String,
    pub priority: Priority,
    pub form_data: Rof5Form,
    pub generated_documents: Vec<String>,
    audit_trail: Vec<AuditEntry>,
}

impl Instruction {
    /// Build a record at the start of its lifecycle with an empty audit trail.
    ///
    /// Descriptive fields are copied from the form; the store appends the
    /// first audit entry.
    pub fn from_form(id: impl Into<String>, form: Rof5Form, today: NaiveDate) -> Self {
        Self {
            id: id.into(),
            site_code: form.site_code.clone(),
            site_location: form.site_location.clone(),
            landlord_name: form.landlord_name.clone(),
            stage: Stage::DocumentDrafting,
            progress: Stage::DocumentDrafting.progress(),
            created_at: today,
            last_updated: today,
            assignee: form.instructing_counsel.clone(),
            next_action: "Generate Documents".to_string(),
            priority: Priority::Medium,
            form_data: form,
            generated_documents: Vec::new(),
            audit_trail: Vec::new(),
        }
    }

    /// Audit entries, oldest first.
    pub fn audit_trail(&self) -> &[AuditEntry] {
        &self.audit_trail
    }

    /// Most recent audit entry.
    pub fn last_audit(&self) -> Option<&AuditEntry> {
        self.audit_trail.last()
    }

    pub(crate) fn push_audit(&mut self, entry: AuditEntry) {
        self.audit_trail.push(entry);
    }
}

/// Partial update merged into an instruction.
///
/// Stage, progress, documents and the audit trail are owned by the state
/// machine and cannot be patched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstructionUpdate {
    pub site_code: Option<String>,
    pub site_location: Option<String>,
    pub landlord_name: Option<String>,
    pub assignee: Option<String>,
    pub next_action: Option<String>,
    pub priority: Option<Priority>,
    pub form_data: Option<Rof5Form>,
}

impl InstructionUpdate {
    /// Whether the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self.changed_fields().is_empty()
    }

    /// Names of the fields this update sets.
    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.site_code.is_some() {
            fields.push("siteCode");
        }
        if self.site_location.is_some() {
            fields.push("siteLocation");
        }
        if self.landlord_name.is_some() {
            fields.push("landlordName");
        }
        if self.assignee.is_some() {
            fields.push("assignee");
        }
        if self.next_action.is_some() {
            fields.push("nextAction");
        }
        if self.priority.is_some() {
            fields.push("priority");
        }
        if self.form_data.is_some() {
            fields.push("formData");
        }
        fields
    }

    pub(crate) fn apply(self, instruction: &mut Instruction) {
        if let Some(v) = self.site_code {
            instruction.site_code = v;
        }
        if let Some(v) = self.site_location {
            instruction.site_location = v;
        }
        if let Some(v) = self.landlord_name {
            instruction.landlord_name = v;
        }
        if let Some(v) = self.assignee {
            instruction.assignee = v;
        }
        if let Some(v) = self.next_action {
            instruction.next_action = v;
        }
        if let Some(v) = self.priority {
            instruction.priority = v;
        }
        if let Some(v) = self.form_data {
            instruction.form_data = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        assert!(Stage::DocumentDrafting < Stage::Execution);
        assert!(Stage::Registration < Stage::Completed);
        assert_eq!(Stage::Execution.later_stages(), vec![Stage::Registration, Stage::Completed]);
        assert!(Stage::Completed.later_stages().is_empty());
    }

    #[test]
    fn test_stage_progress_table() {
        let progress: Vec<u8> = Stage::ALL.iter().map(|s| s.progress()).collect();
        assert_eq!(progress, vec![25, 60, 85, 100]);
    }

    #[test]
    fn test_stage_next() {
        assert_eq!(Stage::DocumentDrafting.next(), Some(Stage::Execution));
        assert_eq!(Stage::Completed.next(), None);
        assert!(Stage::Completed.is_terminal());
    }

    #[test]
    fn test_stage_parse_and_serde() {
        assert_eq!("document-drafting".parse::<Stage>().unwrap(), Stage::DocumentDrafting);
        assert_eq!(" Registration ".parse::<Stage>().unwrap(), Stage::Registration);
        assert!("drafting".parse::<Stage>().is_err());
        assert_eq!(
            serde_json::to_string(&Stage::DocumentDrafting).unwrap(),
            "\"document-drafting\""
        );
    }

    #[test]
    fn test_priority_parse() {
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert!("urgent".parse::<Priority>().is_err());
        assert!(Priority::Low < Priority::High);
    }

    #[test]
    fn test_audit_user() {
        assert_eq!(AuditUser::human_or_system("  "), AuditUser::System);
        assert_eq!(AuditUser::human_or_system("Jane Smith"), AuditUser::Human("Jane Smith".into()));
        assert_eq!(AuditUser::Assistant.to_string(), "AI Assistant");

        let json = serde_json::to_string(&AuditUser::Human("John Doe".into())).unwrap();
        assert_eq!(json, r#"{"kind":"human","name":"John Doe"}"#);
        let json = serde_json::to_string(&AuditUser::System).unwrap();
        assert_eq!(json, r#"{"kind":"system"}"#);
    }

    #[test]
    fn test_from_form() {
        let form = Rof5Form {
            site_code: "NBI001".into(),
            instructing_counsel: "John Doe".into(),
            ..Rof5Form::default()
        };
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let instruction = Instruction::from_form("ROF-2026-001", form, today);

        assert_eq!(instruction.stage, Stage::DocumentDrafting);
        assert_eq!(instruction.progress, 25);
        assert_eq!(instruction.assignee, "John Doe");
        assert_eq!(instruction.site_code, "NBI001");
        assert!(instruction.audit_trail().is_empty());
    }

    #[test]
    fn test_update_changed_fields() {
        let update = InstructionUpdate {
            assignee: Some("Jane".into()),
            priority: Some(Priority::High),
            ..InstructionUpdate::default()
        };
        assert_eq!(update.changed_fields(), vec!["assignee", "priority"]);
        assert!(InstructionUpdate::default().is_empty());
    }
}
