//! Summary counts and JSON export of the instruction set.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::instruction::{Instruction, Priority, Stage};
use super::store::WorkflowStore;

/// Snapshot of where instructions stand.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowReport {
    pub generated_on: NaiveDate,
    pub total: usize,
    pub by_stage: BTreeMap<Stage, usize>,
    pub by_priority: BTreeMap<Priority, usize>,
    pub documents_generated: usize,
    pub average_progress: f64,
}

impl WorkflowReport {
    /// Build a report over the store's current contents.
    pub fn from_store(store: &WorkflowStore) -> Self {
        let instructions = store.list();
        let total = instructions.len();
        let progress_sum: u32 = instructions.iter().map(|i| u32::from(i.progress)).sum();

        Self {
            generated_on: store.clock().today(),
            total,
            by_stage: store.stage_counts(),
            by_priority: store.priority_counts(),
            documents_generated: instructions.iter().map(|i| i.generated_documents.len()).sum(),
            average_progress: if total == 0 {
                0.0
            } else {
                f64::from(progress_sum) / total as f64
            },
        }
    }

    /// Instructions not yet completed.
    pub fn open(&self) -> usize {
        self.total - self.by_stage.get(&Stage::Completed).copied().unwrap_or(0)
    }

    /// Plain-text summary, one line per stage.
    pub fn to_text(&self) -> String {
        let mut out = format!("Instructions: {} ({} open)\n", self.total, self.open());
        for (stage, count) in &self.by_stage {
            out.push_str(&format!("  {:<18} {}\n", stage.title(), count));
        }
        out.push_str(&format!("Documents generated: {}\n", self.documents_generated));
        out.push_str(&format!("Average progress: {:.0}%\n", self.average_progress));
        out
    }
}

/// Pretty JSON array of every instruction, audit trails included.
pub fn export_json(instructions: &[Instruction]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(instructions)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::core::{FixedClock, SequentialIdGenerator};
    use crate::intake::Rof5Form;
    use crate::workflow::AuditUser;

    fn store() -> WorkflowStore {
        WorkflowStore::new(
            Arc::new(SequentialIdGenerator::new()),
            Arc::new(FixedClock::on(2026, 10, 19)),
        )
    }

    #[test]
    fn test_empty_report() {
        let report = WorkflowReport::from_store(&store());
        assert_eq!(report.total, 0);
        assert_eq!(report.open(), 0);
        assert_eq!(report.average_progress, 0.0);
        assert_eq!(report.by_stage.len(), 4);
    }

    #[test]
    fn test_report_counts() {
        let mut store = store();
        let first = store.create_quick(Rof5Form::default()).id;
        store.create_quick(Rof5Form { urgency_level: "high".into(), ..Rof5Form::default() });
        store.advance_stage(&first, Stage::Completed, AuditUser::System).unwrap();

        let report = WorkflowReport::from_store(&store);
        assert_eq!(report.total, 2);
        assert_eq!(report.open(), 1);
        assert_eq!(report.by_stage[&Stage::Completed], 1);
        assert_eq!(report.by_priority[&Priority::High], 1);
        assert_eq!(report.average_progress, 62.5);
        assert!(report.to_text().contains("Completed"));
    }

    #[test]
    fn test_report_json_keys() {
        let report = WorkflowReport::from_store(&store());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["byStage"]["document-drafting"], 0);
        assert_eq!(json["byPriority"]["high"], 0);
        assert_eq!(json["generatedOn"], "2026-10-19");
    }

    #[test]
    fn test_export_json() {
        let mut store = store();
        store.create_quick(Rof5Form { site_code: "NBI001".into(), ..Rof5Form::default() });

        let json = export_json(store.list()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["siteCode"], "NBI001");
        assert_eq!(value[0]["auditTrail"][0]["action"], "ROF 5 Submitted");
    }
}
