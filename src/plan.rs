//! Edit plans: the ordered list of sections and what to do in each.

use crate::edit::SectionEdits;
use crate::error::Result;
use crate::render::{to_json, JsonFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Edits for one named section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionPlan {
    /// Section name
    pub section: String,

    /// Intents and row marks
    #[serde(flatten)]
    pub edits: SectionEdits,
}

/// Sections in the order they are processed.
///
/// ```
/// use docmend::EditPlan;
///
/// let plan = EditPlan::from_json(r#"{
///     "sections": [
///         {"section": "1_4", "intents": [{"type": "delete_text", "text": "Check fees.", "cell": 0}]},
///         {"section": "2_1", "row_marks": {"left_fully_marked": true, "right_fully_marked": true}}
///     ]
/// }"#).unwrap();
/// assert_eq!(plan.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditPlan {
    /// Section plans
    #[serde(default)]
    pub sections: Vec<SectionPlan>,
}

impl EditPlan {
    /// Create an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a section.
    pub fn with_section(mut self, section: impl Into<String>, edits: SectionEdits) -> Self {
        self.sections.push(SectionPlan {
            section: section.into(),
            edits,
        });
        self
    }

    /// Parse a plan from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a plan from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serialize the plan to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        to_json(self, JsonFormat::Pretty)
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the plan has no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Total number of intents across sections.
    pub fn intent_count(&self) -> usize {
        self.sections.iter().map(|s| s.edits.intents.len()).sum()
    }

    /// Iterate over sections.
    pub fn iter(&self) -> impl Iterator<Item = &SectionPlan> {
        self.sections.iter()
    }
}
