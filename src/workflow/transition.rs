//! Stage transition events.
//!
//! Assigning an instruction can imply a stage change. The assignment rule
//! only emits a [`StageTransition`]; the store applies it through the same
//! path as a manual advance.

use serde::Serialize;

use super::instruction::Stage;
use crate::access::Role;

/// What caused a stage change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TransitionTrigger {
    /// Explicit advance request
    Manual,
    /// Assignment of a user in the given role
    Assignment { role: Role },
}

/// A requested move from one stage to a later one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageTransition {
    pub instruction_id: String,
    pub from: Stage,
    pub to: Stage,
    pub trigger: TransitionTrigger,
}

impl StageTransition {
    /// Whether `to` is strictly after `from`.
    pub fn is_forward(&self) -> bool {
        self.to > self.from
    }
}

/// Stage an assignment moves an instruction to, if any.
///
/// Only two pairs advance: External Counsel during drafting, and Property
/// Operations during execution.
pub fn assignment_advance(role: Role, stage: Stage) -> Option<Stage> {
    match (role, stage) {
        (Role::ExternalCounsel, Stage::DocumentDrafting) => Some(Stage::Execution),
        (Role::PropertyOperations, Stage::Execution) => Some(Stage::Registration),
        _ => None,
    }
}

/// Emitted when an instruction is assigned to someone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentEvent {
    pub instruction_id: String,
    pub assignee: String,
    pub role: Role,
    pub stage: Stage,
}

impl AssignmentEvent {
    /// The stage transition this assignment implies.
    pub fn transition(&self) -> Option<StageTransition> {
        assignment_advance(self.role, self.stage).map(|to| StageTransition {
            instruction_id: self.instruction_id.clone(),
            from: self.stage,
            to,
            trigger: TransitionTrigger::Assignment { role: self.role },
        })
    }
}
