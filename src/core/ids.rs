//! Identifier generation for instructions, audit entries, reminders and
//! notices.
//!
//! The store never mints ids itself; it asks an [`IdGenerator`] so tests can
//! swap in [`SequentialIdGenerator`] and assert on exact ids.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Datelike, Utc};
use parking_lot::Mutex;

/// Source of unique ids.
pub trait IdGenerator: Send + Sync {
    /// Id for a new instruction, e.g. `ROF-2026-001`.
    fn instruction_id(&self, prefix: &str, now: DateTime<Utc>) -> String;

    /// Id for a new audit entry.
    fn audit_id(&self, now: DateTime<Utc>) -> String;

    /// Id for any other store record, e.g. `reminder-...` or `notif-...`.
    fn record_id(&self, kind: &str, now: DateTime<Utc>) -> String;
}

/// Time plus random suffix ids.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdGenerator;

impl RandomIdGenerator {
    /// Create a new generator.
    pub fn new() -> Self {
        Self
    }
}

impl IdGenerator for RandomIdGenerator {
    fn instruction_id(&self, prefix: &str, now: DateTime<Utc>) -> String {
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        format!("{}-{}-{}", prefix, now.year(), suffix[..6].to_uppercase())
    }

    fn audit_id(&self, now: DateTime<Utc>) -> String {
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        format!("audit-{}-{}", now.timestamp_millis(), &suffix[..9])
    }

    fn record_id(&self, kind: &str, now: DateTime<Utc>) -> String {
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        format!("{}-{}-{}", kind, now.timestamp_millis(), &suffix[..9])
    }
}

/// Counter-based ids for deterministic tests and demos.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    next_instruction: AtomicU64,
    next_audit: AtomicU64,
    next_record: Mutex<HashMap<String, u64>>,
}

impl SequentialIdGenerator {
    /// Start every counter at 1.
    pub fn new() -> Self {
        Self {
            next_instruction: AtomicU64::new(1),
            next_audit: AtomicU64::new(1),
            next_record: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn instruction_id(&self, prefix: &str, now: DateTime<Utc>) -> String {
        let n = self.next_instruction.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}-{:03}", prefix, now.year(), n)
    }

    fn audit_id(&self, _now: DateTime<Utc>) -> String {
        let n = self.next_audit.fetch_add(1, Ordering::Relaxed);
        format!("audit-{:04}", n)
    }

    fn record_id(&self, kind: &str, _now: DateTime<Utc>) -> String {
        let mut counters = self.next_record.lock();
        let n = counters.entry(kind.to_string()).or_insert(0);
        *n += 1;
        format!("{}-{:04}", kind, n)
    }
}
