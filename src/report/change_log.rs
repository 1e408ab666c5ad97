//! Append-only record of applied mutations.

use crate::matching::Strategy;
use crate::model::ParagraphShift;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of mutation a change record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// Text removed from a paragraph (or the paragraph cleared)
    TextDeleted,
    /// Text replaced inside a paragraph
    TextReplaced,
    /// A table row removed
    RowDeleted,
    /// A note appended to a paragraph
    TextAppended,
    /// A bullet removed together with its sub-bullets
    DotPointDeleted,
    /// An empty bullet filled in
    PlaceholderFilled,
    /// A new bullet inserted
    DotPointAdded,
}

/// One completed mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// What happened
    pub kind: ChangeKind,

    /// Section the mutation belongs to
    pub section: String,

    /// Where it happened (paragraph or row reference)
    pub location: String,

    /// Text before the mutation
    pub original_text: String,

    /// Text after the mutation (empty for removals)
    pub new_text: String,

    /// How the target was found
    pub strategy: Strategy,

    /// Paragraphs removed from the document
    #[serde(default)]
    pub paragraphs_removed: usize,

    /// When the mutation was applied
    pub timestamp: DateTime<Utc>,

    /// Paragraph insertions and removals, in the order they happened
    #[serde(skip)]
    pub shifts: Vec<ParagraphShift>,
}

impl ChangeRecord {
    /// Create a record stamped with the current time.
    pub fn new(
        kind: ChangeKind,
        section: impl Into<String>,
        location: impl Into<String>,
        strategy: Strategy,
    ) -> Self {
        Self {
            kind,
            section: section.into(),
            location: location.into(),
            original_text: String::new(),
            new_text: String::new(),
            strategy,
            paragraphs_removed: 0,
            timestamp: Utc::now(),
            shifts: Vec::new(),
        }
    }

    /// Set the before and after text.
    pub fn with_text(mut self, original: impl Into<String>, new: impl Into<String>) -> Self {
        self.original_text = original.into();
        self.new_text = new.into();
        self
    }

    /// Set the number of paragraphs removed.
    pub fn with_removed(mut self, count: usize) -> Self {
        self.paragraphs_removed = count;
        self
    }

    /// Set the paragraph shifts the mutation caused.
    pub fn with_shifts(mut self, shifts: Vec<ParagraphShift>) -> Self {
        self.shifts = shifts;
        self
    }
}

/// Ordered, append-only list of change records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeLog {
    records: Vec<ChangeRecord>,
}

impl ChangeLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record.
    pub fn push(&mut self, record: ChangeRecord) {
        self.records.push(record);
    }

    /// Records in application order.
    pub fn records(&self) -> &[ChangeRecord] {
        &self.records
    }

    /// Iterate over records.
    pub fn iter(&self) -> impl Iterator<Item = &ChangeRecord> {
        self.records.iter()
    }

    /// Records for one section.
    pub fn for_section<'a>(&'a self, section: &'a str) -> impl Iterator<Item = &'a ChangeRecord> {
        self.records.iter().filter(move |r| r.section == section)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no mutation was recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
