//! Instruction lifecycle.
//!
//! ## Stages
//!
//! `document-drafting` → `execution` → `registration` → `completed`
//!
//! - [`WorkflowStore`] owns the instructions and applies every mutation
//! - [`StageTransition`] events come from manual advances or assignments
//! - [`WorkflowReport`] summarizes the current set
//! - [`Reminder`]s and overdue checks raise [`Notice`]s

mod instruction;
mod reminder;
mod report;
mod store;
mod transition;

pub use instruction::{AuditEntry, AuditUser, Instruction, InstructionUpdate, Priority, Stage};
pub use reminder::{
    overdue_days, NewReminder, Notice, NoticeKind, Reminder, ReminderFrequency, ReminderUpdate,
    OVERDUE_AFTER_DAYS,
};
pub use report::{export_json, WorkflowReport};
pub use store::{CreateMode, WorkflowStore, GENERATION_PROGRESS, INTAKE_PROGRESS};
pub use transition::{assignment_advance, AssignmentEvent, StageTransition, TransitionTrigger};
