//! Workflow store: the owned set of instructions and every operation that
//! mutates them.
//!
//! Each mutation appends exactly one audit entry per action it performs, and
//! stage changes only move forward in canonical order. Callers hold the store
//! explicitly; there is no global instance.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tokio_util::sync::CancellationToken;

use super::instruction::{AuditEntry, AuditUser, Instruction, InstructionUpdate, Priority, Stage};
use super::reminder::{overdue_days, NewReminder, Notice, NoticeKind, Reminder, ReminderUpdate};
use super::transition::{AssignmentEvent, StageTransition, TransitionTrigger};
use crate::access::Role;
use crate::core::{Clock, IdGenerator, RandomIdGenerator, SystemClock};
use crate::error::{FanisiError, FanisiResult};
use crate::intake::Rof5Form;
use crate::suggest::WorkflowSuggestion;

/// Progress recorded by the validated intake path.
pub const INTAKE_PROGRESS: u8 = 15;

/// Progress recorded when documents are generated, regardless of stage.
pub const GENERATION_PROGRESS: u8 = 50;

/// Attempts at a fresh instruction id before falling back to a suffixed one.
const MAX_ID_ATTEMPTS: usize = 16;

/// Which creation flow produced an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateMode {
    /// No validation, progress 25.
    Quick,
    /// Required fields checked, progress 15.
    Validated,
}

/// In-memory owner of all instructions, their reminders and raised notices.
pub struct WorkflowStore {
    instructions: Vec<Instruction>,
    reminders: Vec<Reminder>,
    notices: Vec<Notice>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    id_prefix: String,
    default_priority: Priority,
}

impl std::fmt::Debug for WorkflowStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowStore")
            .field("instructions", &self.instructions.len())
            .field("reminders", &self.reminders.len())
            .field("notices", &self.notices.len())
            .field("id_prefix", &self.id_prefix)
            .field("default_priority", &self.default_priority)
            .finish()
    }
}

impl Default for WorkflowStore {
    fn default() -> Self {
        Self::new(Arc::new(RandomIdGenerator::new()), Arc::new(SystemClock))
    }
}

impl WorkflowStore {
    /// Create an empty store with the given id source and clock.
    pub fn new(ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self {
            instructions: Vec::new(),
            reminders: Vec::new(),
            notices: Vec::new(),
            ids,
            clock,
            id_prefix: "ROF".to_string(),
            default_priority: Priority::Medium,
        }
    }

    /// Use a different instruction id prefix.
    pub fn with_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = prefix.into();
        self
    }

    /// Priority for forms that do not name one.
    pub fn with_default_priority(mut self, priority: Priority) -> Self {
        self.default_priority = priority;
        self
    }

    /// The store's clock.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    // ------------------------------------------------------------------
    // Creation
    // ------------------------------------------------------------------

    /// Create an instruction without validation, at progress 25.
    pub fn create_quick(&mut self, form: Rof5Form) -> Instruction {
        self.create(form, CreateMode::Quick)
    }

    /// Create an instruction after checking required fields, at progress 15.
    pub fn create_validated(&mut self, form: Rof5Form) -> FanisiResult<Instruction> {
        form.validate()?;
        Ok(self.create(form, CreateMode::Validated))
    }

    /// Create through the named flow.
    pub fn create_instruction(
        &mut self,
        form: Rof5Form,
        mode: CreateMode,
    ) -> FanisiResult<Instruction> {
        match mode {
            CreateMode::Quick => Ok(self.create_quick(form)),
            CreateMode::Validated => self.create_validated(form),
        }
    }

    fn create(&mut self, form: Rof5Form, mode: CreateMode) -> Instruction {
        let now = self.clock.now();
        let id = self.fresh_instruction_id(now);
        let user = AuditUser::human_or_system(&form.instructing_counsel);
        let priority = form.requested_priority().unwrap_or(self.default_priority);

        let mut instruction = Instruction::from_form(id, form, now.date_naive());
        instruction.priority = priority;

        let (action, details) = match mode {
            CreateMode::Quick => {
                ("ROF 5 Submitted", "Initial property instruction created".to_string())
            }
            CreateMode::Validated => {
                instruction.progress = INTAKE_PROGRESS;
                (
                    "Instruction Created",
                    format!("ROF 5 intake validated for site {}", instruction.site_code),
                )
            }
        };
        instruction.push_audit(self.audit_entry(now, action, user, details));

        tracing::info!(
            id = %instruction.id,
            site = %instruction.site_code,
            mode = ?mode,
            priority = %instruction.priority,
            "Instruction created"
        );

        self.instructions.push(instruction.clone());
        instruction
    }

    fn fresh_instruction_id(&self, now: DateTime<Utc>) -> String {
        let mut id = self.ids.instruction_id(&self.id_prefix, now);
        for _ in 1..MAX_ID_ATTEMPTS {
            if !self.contains(&id) {
                return id;
            }
            tracing::debug!(id = %id, "Instruction id already taken");
            id = self.ids.instruction_id(&self.id_prefix, now);
        }

        let base = id;
        let mut n = 2;
        while self.contains(&format!("{base}-{n}")) {
            n += 1;
        }
        format!("{base}-{n}")
    }

    /// Track an externally built instruction.
    ///
    /// A record with no audit history gets an "Instruction Imported" entry.
    pub fn insert_instruction(&mut self, mut instruction: Instruction) -> FanisiResult<()> {
        if self.contains(&instruction.id) {
            return Err(FanisiError::DuplicateInstruction(instruction.id));
        }

        if instruction.audit_trail().is_empty() {
            let now = self.clock.now();
            let entry = self.audit_entry(
                now,
                "Instruction Imported",
                AuditUser::System,
                format!("Imported at stage {}", instruction.stage.title()),
            );
            instruction.push_audit(entry);
        }

        tracing::info!(id = %instruction.id, stage = %instruction.stage, "Instruction imported");
        self.instructions.push(instruction);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Merge `update` into the instruction and refresh `lastUpdated`.
    ///
    /// A non-empty update appends an "Instruction Updated" entry naming the
    /// changed fields.
    pub fn update_instruction(
        &mut self,
        id: &str,
        update: InstructionUpdate,
        user: AuditUser,
    ) -> FanisiResult<()> {
        let idx = self.index_of(id)?;
        let now = self.clock.now();

        let changed = update.changed_fields();
        let entry = (!changed.is_empty()).then(|| {
            self.audit_entry(
                now,
                "Instruction Updated",
                user,
                format!("Updated {}", changed.join(", ")),
            )
        });

        let instruction = &mut self.instructions[idx];
        update.apply(instruction);
        instruction.last_updated = now.date_naive();
        if let Some(entry) = entry {
            instruction.push_audit(entry);
        }

        Ok(())
    }

    /// Move an instruction to a strictly later stage.
    ///
    /// Sets progress and next action from the stage tables.
    pub fn advance_stage(
        &mut self,
        id: &str,
        new_stage: Stage,
        user: AuditUser,
    ) -> FanisiResult<StageTransition> {
        let idx = self.index_of(id)?;
        let transition = StageTransition {
            instruction_id: self.instructions[idx].id.clone(),
            from: self.instructions[idx].stage,
            to: new_stage,
            trigger: TransitionTrigger::Manual,
        };
        self.apply_transition(idx, &transition, user)?;
        Ok(transition)
    }

    fn apply_transition(
        &mut self,
        idx: usize,
        transition: &StageTransition,
        user: AuditUser,
    ) -> FanisiResult<()> {
        let current = self.instructions[idx].stage;
        if transition.from != current || !transition.is_forward() {
            return Err(FanisiError::InvalidTransition {
                id: transition.instruction_id.clone(),
                from: current,
                to: transition.to,
            });
        }

        let now = self.clock.now();
        let mut details =
            format!("Moved from {} to {}", transition.from.title(), transition.to.title());
        if let TransitionTrigger::Assignment { role } = transition.trigger {
            details.push_str(&format!(" on assignment to {role}"));
        }
        let entry = self.audit_entry(now, "Stage Advanced", user, details);

        let instruction = &mut self.instructions[idx];
        instruction.stage = transition.to;
        instruction.progress = transition.to.progress();
        instruction.next_action = transition.to.next_action().to_string();
        instruction.last_updated = now.date_naive();
        instruction.push_audit(entry);

        tracing::info!(
            id = %transition.instruction_id,
            from = %transition.from,
            to = %transition.to,
            "Stage advanced"
        );
        Ok(())
    }

    /// Record one generated document per template id, in order.
    ///
    /// References are named `{templateId}-{instructionId}`. Progress is set to
    /// the fixed generation marker without touching the stage. The step can be
    /// cancelled until it commits; a cancelled call leaves the instruction
    /// unchanged.
    pub async fn attach_generated_documents<S: AsRef<str>>(
        &mut self,
        id: &str,
        template_ids: &[S],
        cancel: &CancellationToken,
    ) -> FanisiResult<Vec<String>> {
        let idx = self.index_of(id)?;

        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                tracing::warn!(id = %id, "Document generation cancelled");
                return Err(FanisiError::Cancelled(id.to_string()));
            }
            () = tokio::task::yield_now() => {}
        }

        let template_ids: Vec<&str> = template_ids.iter().map(AsRef::as_ref).collect();
        let instruction_id = self.instructions[idx].id.clone();
        let refs: Vec<String> =
            template_ids.iter().map(|t| format!("{t}-{instruction_id}")).collect();

        let now = self.clock.now();
        let entry = self.audit_entry(
            now,
            "Documents Generated",
            AuditUser::System,
            format!("Generated {} documents: {}", template_ids.len(), template_ids.join(", ")),
        );

        let instruction = &mut self.instructions[idx];
        instruction.generated_documents.extend(refs.iter().cloned());
        instruction.progress = GENERATION_PROGRESS;
        instruction.last_updated = now.date_naive();
        instruction.push_audit(entry);

        tracing::info!(id = %instruction_id, count = refs.len(), "Documents generated");
        Ok(refs)
    }

    /// Assign the instruction to a user acting in `role`.
    ///
    /// The assignee becomes `"{user_id} ({role})"`. If the role and current
    /// stage imply a transition, it is applied afterwards and returned.
    pub fn assign_to_role(
        &mut self,
        id: &str,
        user_id: &str,
        role: Role,
        actor: AuditUser,
    ) -> FanisiResult<Option<StageTransition>> {
        let idx = self.index_of(id)?;
        let now = self.clock.now();
        let assignee = format!("{user_id} ({role})");
        let entry =
            self.audit_entry(now, "Instruction Assigned", actor, format!("Assigned to {assignee}"));

        let instruction = &mut self.instructions[idx];
        instruction.assignee = assignee.clone();
        instruction.last_updated = now.date_naive();
        instruction.push_audit(entry);

        let event = AssignmentEvent {
            instruction_id: instruction.id.clone(),
            assignee,
            role,
            stage: instruction.stage,
        };
        tracing::info!(
            id = %event.instruction_id,
            assignee = %event.assignee,
            "Instruction assigned"
        );

        let transition = event.transition();
        if let Some(ref transition) = transition {
            self.apply_transition(idx, transition, AuditUser::System)?;
        }
        Ok(transition)
    }

    /// Apply a workflow suggestion's next action and priority.
    pub fn apply_workflow_suggestion(
        &mut self,
        id: &str,
        suggestion: &WorkflowSuggestion,
    ) -> FanisiResult<()> {
        let idx = self.index_of(id)?;
        let now = self.clock.now();
        let entry = self.audit_entry(
            now,
            "AI Suggestion Applied",
            AuditUser::Assistant,
            format!("Applied suggestion: {}", suggestion.action),
        );

        let instruction = &mut self.instructions[idx];
        instruction.next_action = suggestion.action.clone();
        instruction.priority = suggestion.priority;
        instruction.last_updated = now.date_naive();
        instruction.push_audit(entry);
        Ok(())
    }

    /// Append a free-form audit entry.
    pub fn add_audit_entry(
        &mut self,
        id: &str,
        action: impl Into<String>,
        user: AuditUser,
        details: impl Into<String>,
    ) -> FanisiResult<AuditEntry> {
        let idx = self.index_of(id)?;
        let now = self.clock.now();
        let entry = self.audit_entry(now, action, user, details);

        let instruction = &mut self.instructions[idx];
        instruction.last_updated = now.date_naive();
        instruction.push_audit(entry.clone());
        Ok(entry)
    }

    fn audit_entry(
        &self,
        now: DateTime<Utc>,
        action: impl Into<String>,
        user: AuditUser,
        details: impl Into<String>,
    ) -> AuditEntry {
        AuditEntry {
            id: self.ids.audit_id(now),
            action: action.into(),
            user,
            timestamp: now,
            details: details.into(),
        }
    }

    // ------------------------------------------------------------------
    // Reminders and notices
    // ------------------------------------------------------------------

    /// Schedule a reminder on an existing instruction.
    pub fn add_reminder(&mut self, reminder: NewReminder) -> FanisiResult<Reminder> {
        self.index_of(&reminder.instruction_id)?;
        let id = self.ids.record_id("reminder", self.clock.now());
        let reminder = reminder.into_reminder(id);

        tracing::info!(
            id = %reminder.id,
            instruction = %reminder.instruction_id,
            due = %reminder.due_date,
            frequency = %reminder.frequency,
            "Reminder added"
        );
        self.reminders.push(reminder.clone());
        Ok(reminder)
    }

    /// Merge `update` into a reminder.
    pub fn update_reminder(&mut self, id: &str, update: ReminderUpdate) -> FanisiResult<&Reminder> {
        let idx = self.reminder_index(id)?;
        update.apply(&mut self.reminders[idx]);
        tracing::debug!(id = %id, "Reminder updated");
        Ok(&self.reminders[idx])
    }

    /// Remove a reminder, returning it.
    pub fn delete_reminder(&mut self, id: &str) -> FanisiResult<Reminder> {
        let idx = self.reminder_index(id)?;
        tracing::debug!(id = %id, "Reminder deleted");
        Ok(self.reminders.remove(idx))
    }

    /// All reminders in creation order.
    pub fn reminders(&self) -> &[Reminder] {
        &self.reminders
    }

    /// Reminders attached to one instruction.
    pub fn reminders_for(&self, instruction_id: &str) -> Vec<&Reminder> {
        self.reminders.iter().filter(|r| r.instruction_id == instruction_id).collect()
    }

    fn reminder_index(&self, id: &str) -> FanisiResult<usize> {
        self.reminders
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| FanisiError::ReminderNotFound(id.to_string()))
    }

    /// Raise an overdue notice for every open instruction created more than
    /// thirty days before `today` that does not have one yet.
    ///
    /// Returns the notices raised by this call.
    pub fn overdue(&mut self, today: NaiveDate) -> Vec<Notice> {
        let late: Vec<(String, String, i64)> = self
            .instructions
            .iter()
            .filter(|i| !self.has_notice(&i.id, NoticeKind::Overdue))
            .filter_map(|i| {
                overdue_days(i, today).map(|days| (i.id.clone(), i.site_location.clone(), days))
            })
            .collect();

        let mut raised = Vec::with_capacity(late.len());
        for (instruction_id, location, days) in late {
            tracing::warn!(id = %instruction_id, days, "Instruction overdue");
            let notice = self.notice(
                NoticeKind::Overdue,
                "Overdue Instruction",
                format!("Instruction {instruction_id} for {location} is overdue ({days} days)"),
                instruction_id,
                Priority::High,
                None,
                today,
            );
            raised.push(notice);
        }
        raised
    }

    /// Fire every reminder due on `today`, recording when it was sent.
    ///
    /// Returns the notices raised by this call.
    pub fn due_reminders(&mut self, today: NaiveDate) -> Vec<Notice> {
        let due: Vec<usize> = self
            .reminders
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_due(today))
            .map(|(idx, _)| idx)
            .collect();

        let mut raised = Vec::with_capacity(due.len());
        for idx in due {
            self.reminders[idx].mark_sent(today);
            let reminder = self.reminders[idx].clone();
            tracing::info!(
                id = %reminder.id,
                instruction = %reminder.instruction_id,
                "Reminder sent"
            );
            raised.push(self.notice(
                NoticeKind::Reminder,
                reminder.title,
                reminder.message,
                reminder.instruction_id,
                Priority::Medium,
                Some(reminder.due_date),
                today,
            ));
        }
        raised
    }

    /// Run the overdue and reminder checks for the clock's current day.
    pub fn check_notices(&mut self) -> Vec<Notice> {
        let today = self.clock.today();
        let mut raised = self.overdue(today);
        raised.extend(self.due_reminders(today));
        raised
    }

    /// Every notice raised so far, newest first.
    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter().rev()
    }

    /// Number of notices not yet read.
    pub fn unread_count(&self) -> usize {
        self.notices.iter().filter(|n| !n.read).count()
    }

    /// Mark a notice read. Unknown ids are ignored.
    pub fn mark_notice_read(&mut self, id: &str) {
        if let Some(notice) = self.notices.iter_mut().find(|n| n.id == id) {
            notice.read = true;
        }
    }

    fn has_notice(&self, instruction_id: &str, kind: NoticeKind) -> bool {
        self.notices.iter().any(|n| n.instruction_id == instruction_id && n.kind == kind)
    }

    #[allow(clippy::too_many_arguments)]
    fn notice(
        &mut self,
        kind: NoticeKind,
        title: impl Into<String>,
        message: impl Into<String>,
        instruction_id: String,
        priority: Priority,
        due_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Notice {
        let notice = Notice {
            id: self.ids.record_id("notif", self.clock.now()),
            kind,
            title: title.into(),
            message: message.into(),
            instruction_id,
            priority,
            read: false,
            created_at: today,
            due_date,
        };
        self.notices.push(notice.clone());
        notice
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    fn index_of(&self, id: &str) -> FanisiResult<usize> {
        self.instructions
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| FanisiError::InstructionNotFound(id.to_string()))
    }

    /// Look up an instruction.
    pub fn get(&self, id: &str) -> FanisiResult<&Instruction> {
        self.index_of(id).map(|idx| &self.instructions[idx])
    }

    /// Whether an instruction with this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.instructions.iter().any(|i| i.id == id)
    }

    /// All instructions in creation order.
    pub fn list(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Instructions currently in `stage`.
    pub fn by_stage(&self, stage: Stage) -> Vec<&Instruction> {
        self.instructions.iter().filter(|i| i.stage == stage).collect()
    }

    /// Case-insensitive match on id, site code, landlord or location.
    pub fn search(&self, query: &str) -> Vec<&Instruction> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.instructions.iter().collect();
        }
        self.instructions
            .iter()
            .filter(|i| {
                [&i.id, &i.site_code, &i.landlord_name, &i.site_location]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&query))
            })
            .collect()
    }

    /// Instruction count per stage, every stage present.
    pub fn stage_counts(&self) -> BTreeMap<Stage, usize> {
        let mut counts: BTreeMap<Stage, usize> = Stage::ALL.into_iter().map(|s| (s, 0)).collect();
        for instruction in &self.instructions {
            *counts.entry(instruction.stage).or_default() += 1;
        }
        counts
    }

    /// Instruction count per priority, every priority present.
    pub fn priority_counts(&self) -> BTreeMap<Priority, usize> {
        let mut counts: BTreeMap<Priority, usize> =
            Priority::ALL.into_iter().map(|p| (p, 0)).collect();
        for instruction in &self.instructions {
            *counts.entry(instruction.priority).or_default() += 1;
        }
        counts
    }
}
