//! Run reports: what was changed, what failed, and why.

mod change_log;
mod stats;

pub use change_log::{ChangeKind, ChangeLog, ChangeRecord};
pub use stats::EditStats;

use crate::error::Result;
use crate::locate::{LocateMethod, SectionAnchor};
use crate::matching::Strategy;
use crate::render::{to_json, JsonFormat};
use serde::{Deserialize, Serialize};

/// Outcome of one intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// The intent produced a change
    Applied {
        /// How the target was found
        strategy: Strategy,
    },
    /// The intent could not be applied
    Failed {
        /// Error message
        reason: String,
    },
    /// The intent was deliberately not applied
    Skipped {
        /// Why it was skipped
        reason: String,
    },
}

/// One intent's entry in a section report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentOutcome {
    /// Position of the intent in the section's list
    pub index: usize,

    /// Intent type name
    pub kind: String,

    /// What happened
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

impl IntentOutcome {
    /// Whether the intent produced a change.
    pub fn is_applied(&self) -> bool {
        matches!(self.status, OutcomeStatus::Applied { .. })
    }

    /// Whether the intent failed.
    pub fn is_failed(&self) -> bool {
        matches!(self.status, OutcomeStatus::Failed { .. })
    }

    /// Whether the intent was skipped.
    pub fn is_skipped(&self) -> bool {
        matches!(self.status, OutcomeStatus::Skipped { .. })
    }
}

/// Terminal state of a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SectionStatus {
    /// Located and processed (individual intents may still have failed)
    Done,
    /// The section could not be located; no intent ran
    NotFound {
        /// Error message
        reason: String,
    },
}

/// Report for one section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionReport {
    /// Section name
    pub name: String,

    /// Terminal state
    pub status: SectionStatus,

    /// Where the section was found
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<SectionAnchor>,

    /// How it was found
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<LocateMethod>,

    /// Per-intent outcomes in order
    #[serde(default)]
    pub outcomes: Vec<IntentOutcome>,
}

impl SectionReport {
    /// Number of applied intents.
    pub fn applied(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_applied()).count()
    }

    /// Number of failed intents.
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    /// Number of skipped intents.
    pub fn skipped(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_skipped()).count()
    }
}

/// Everything a run did.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Per-section reports in processing order
    pub sections: Vec<SectionReport>,

    /// Applied mutations in order
    pub changes: ChangeLog,

    /// Run statistics
    pub stats: EditStats,
}

impl RunReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report for a section by name.
    pub fn section(&self, name: &str) -> Option<&SectionReport> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Whether every section was found and every intent applied or skipped.
    pub fn is_clean(&self) -> bool {
        self.stats.failed == 0 && self.stats.sections_not_found == 0
    }

    /// Serialize the report to JSON.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        to_json(self, JsonFormat::pretty(pretty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section() -> SectionReport {
        SectionReport {
            name: "1_4".into(),
            status: SectionStatus::Done,
            anchor: Some(SectionAnchor::TableRow { table: 0, row: 1 }),
            method: Some(LocateMethod::Keywords),
            outcomes: vec![
                IntentOutcome {
                    index: 0,
                    kind: "delete_text".into(),
                    status: OutcomeStatus::Applied {
                        strategy: Strategy::Exact,
                    },
                },
                IntentOutcome {
                    index: 1,
                    kind: "replace_text".into(),
                    status: OutcomeStatus::Failed {
                        reason: "not found".into(),
                    },
                },
            ],
        }
    }

    #[test]
    fn test_section_counts() {
        let report = section();
        assert_eq!(report.applied(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.skipped(), 0);
    }

    #[test]
    fn test_run_report_json() {
        let mut report = RunReport::new();
        report.sections.push(section());
        let json = report.to_json(false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["sections"][0]["status"]["state"], "done");
        assert_eq!(value["sections"][0]["outcomes"][0]["status"], "applied");
        assert_eq!(value["sections"][0]["outcomes"][1]["reason"], "not found");
        assert!(value["changes"].as_array().unwrap().is_empty());
        assert!(report.section("1_4").is_some());
        assert!(report.is_clean());
    }
}
