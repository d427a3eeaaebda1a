//! Follow-up reminders and the notices raised by periodic checks.
//!
//! An instruction still open more than [`OVERDUE_AFTER_DAYS`] days after it
//! was created raises a single overdue notice. Reminders fire on or after
//! their due date according to their frequency.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::instruction::{Instruction, Priority, Stage};

/// Days an open instruction may run before it is overdue.
pub const OVERDUE_AFTER_DAYS: i64 = 30;

/// How often an active reminder repeats once due.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderFrequency {
    /// Fires once, then deactivates.
    #[default]
    Once,
    /// At most once per calendar day.
    Daily,
    /// At most once per seven days.
    Weekly,
}

impl ReminderFrequency {
    /// Lowercase identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Once => "once",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }
}

impl fmt::Display for ReminderFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReminderFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "once" => Ok(Self::Once),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            _ => Err(format!("Unknown reminder frequency: {s}")),
        }
    }
}

/// A scheduled follow-up on an instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: String,
    pub instruction_id: String,
    pub title: String,
    pub message: String,
    pub due_date: NaiveDate,
    pub frequency: ReminderFrequency,
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sent: Option<NaiveDate>,
}

impl Reminder {
    /// Whether the reminder fires on `today`.
    pub fn is_due(&self, today: NaiveDate) -> bool {
        if !self.active || self.due_date > today {
            return false;
        }
        match (self.frequency, self.last_sent) {
            (ReminderFrequency::Once, _) | (_, None) => true,
            (ReminderFrequency::Daily, Some(sent)) => sent != today,
            (ReminderFrequency::Weekly, Some(sent)) => (today - sent).num_days() >= 7,
        }
    }

    /// Record a firing on `today`. A one-off reminder deactivates.
    pub(crate) fn mark_sent(&mut self, today: NaiveDate) {
        self.last_sent = Some(today);
        self.active = self.frequency != ReminderFrequency::Once;
    }
}

/// Fields of a reminder before the store assigns its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReminder {
    pub instruction_id: String,
    pub title: String,
    #[serde(default)]
    pub message: String,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub frequency: ReminderFrequency,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl NewReminder {
    /// An active one-off reminder.
    pub fn once(
        instruction_id: impl Into<String>,
        title: impl Into<String>,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            instruction_id: instruction_id.into(),
            title: title.into(),
            message: String::new(),
            due_date,
            frequency: ReminderFrequency::Once,
            active: true,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_frequency(mut self, frequency: ReminderFrequency) -> Self {
        self.frequency = frequency;
        self
    }

    pub(crate) fn into_reminder(self, id: String) -> Reminder {
        Reminder {
            id,
            instruction_id: self.instruction_id,
            title: self.title,
            message: self.message,
            due_date: self.due_date,
            frequency: self.frequency,
            active: self.active,
            last_sent: None,
        }
    }
}

/// Partial update merged into a reminder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReminderUpdate {
    pub title: Option<String>,
    pub message: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub frequency: Option<ReminderFrequency>,
    pub active: Option<bool>,
}

impl ReminderUpdate {
    pub(crate) fn apply(self, reminder: &mut Reminder) {
        if let Some(v) = self.title {
            reminder.title = v;
        }
        if let Some(v) = self.message {
            reminder.message = v;
        }
        if let Some(v) = self.due_date {
            reminder.due_date = v;
        }
        if let Some(v) = self.frequency {
            reminder.frequency = v;
        }
        if let Some(v) = self.active {
            reminder.active = v;
        }
    }
}

/// What raised a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Reminder,
    Overdue,
}

/// A raised notification about an instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
    pub instruction_id: String,
    pub priority: Priority,
    pub read: bool,
    pub created_at: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

/// Days `instruction` has run past creation when it counts as overdue.
pub fn overdue_days(instruction: &Instruction, today: NaiveDate) -> Option<i64> {
    let days = (today - instruction.created_at).num_days();
    (days > OVERDUE_AFTER_DAYS && instruction.stage != Stage::Completed).then_some(days)
}
