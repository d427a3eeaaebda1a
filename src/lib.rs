//! # Fanisi
//!
//! Property-leasing instruction workflow: ROF 5 intake, document templates,
//! a forward-only stage machine with an append-only audit trail, and a fixed
//! suggestion rule table.
//!
//! ## Features
//!
//! - **Templates**: `{{key}}` substitution that leaves unbound placeholders visible
//! - **Workflow**: drafting → execution → registration → completed, with audit entries
//! - **Assignment**: role-based assignment that can move an instruction forward
//! - **Suggestions**: rule-based form completion, priority and deadline
//! - **Reminders**: scheduled follow-ups and overdue notices
//!
//! ## Quick Start
//!
//! ```bash
//! # List templates
//! fanisi templates
//!
//! # Submit a ROF 5 form and write the generated documents
//! fanisi submit rof5.json --out-dir out/
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
// Allow common patterns that are intentional in this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::significant_drop_tightening)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::format_push_string)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::float_cmp)]
#![allow(clippy::use_self)]

pub mod access;
pub mod app;
pub mod core;
pub mod error;
pub mod intake;
pub mod suggest;
pub mod template;
pub mod workflow;

// Re-export commonly used types
pub use access::{Permission, Role, User, UserDirectory};
pub use app::{App, Assessment, SubmissionOutcome};
pub use crate::core::Config;
pub use error::{FanisiError, FanisiResult};
pub use intake::Rof5Form;
pub use suggest::{RuleBasedProvider, Suggestion, SuggestionProvider, WorkflowSuggestion};
pub use template::{DocumentTemplate, DocumentVariable, TemplateCatalog};
pub use workflow::{
    AuditEntry, AuditUser, CreateMode, Instruction, InstructionUpdate, NewReminder, Notice,
    Priority, Reminder, ReminderFrequency, Stage, WorkflowStore,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "fanisi";
