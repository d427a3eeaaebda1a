//! Error types for Fanisi.

use thiserror::Error;

use crate::workflow::Stage;

/// Result type for workflow, template and intake operations.
pub type FanisiResult<T> = Result<T, FanisiError>;

/// Errors surfaced to callers of the library.
///
/// Every variant is a local, recoverable condition. Nothing here is retried.
#[derive(Debug, Error)]
pub enum FanisiError {
    /// No template with this id in the catalog.
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// No instruction with this id in the store.
    #[error("Instruction not found: {0}")]
    InstructionNotFound(String),

    /// No reminder with this id in the store.
    #[error("Reminder not found: {0}")]
    ReminderNotFound(String),

    /// Required intake fields are blank.
    #[error("Missing required fields: {}", missing.join(", "))]
    Validation { missing: Vec<String> },

    /// Stage change that is not strictly forward.
    #[error("Instruction '{id}' cannot move from {from} to {to}")]
    InvalidTransition { id: String, from: Stage, to: Stage },

    /// An instruction with this id is already tracked.
    #[error("Instruction '{0}' already exists")]
    DuplicateInstruction(String),

    /// The intake form has no field with this name.
    #[error("Unknown form field: {0}")]
    UnknownField(String),

    /// Document generation was cancelled before it committed.
    #[error("Document generation cancelled for instruction '{0}'")]
    Cancelled(String),

    /// Template file could not be parsed.
    #[error("Invalid template file: {0}")]
    TemplateParse(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FanisiError {
    /// Whether this is an unknown template, instruction or reminder id.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::TemplateNotFound(_) | Self::InstructionNotFound(_) | Self::ReminderNotFound(_)
        )
    }
}
