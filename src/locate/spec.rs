//! Section descriptions and anchors.

use crate::model::{ParagraphRef, ParagraphShift, Scope};
use serde::{Deserialize, Serialize};

/// How a named section is recognised in a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSpec {
    /// Section name (e.g. "1_4")
    #[serde(default)]
    pub name: String,

    /// Keywords whose presence identifies the section
    pub keywords: Vec<String>,

    /// Keyword hits required for a confident match
    #[serde(default = "default_min_matches")]
    pub min_keyword_matches: usize,

    /// Row to use when no row contains any keyword
    #[serde(default)]
    pub fallback: Option<RowPosition>,

    /// What the section is made of
    #[serde(default)]
    pub kind: SectionKind,
}

fn default_min_matches() -> usize {
    2
}

impl SectionSpec {
    /// Create a table-row section spec.
    pub fn new<S: Into<String>>(name: impl Into<String>, keywords: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.into(),
            keywords: keywords.into_iter().map(Into::into).collect(),
            min_keyword_matches: default_min_matches(),
            fallback: None,
            kind: SectionKind::TableRow,
        }
    }

    /// Set the required keyword hits.
    pub fn with_min_matches(mut self, min: usize) -> Self {
        self.min_keyword_matches = min;
        self
    }

    /// Set the fallback row.
    pub fn with_fallback(mut self, table: usize, row: usize) -> Self {
        self.fallback = Some(RowPosition { table, row });
        self
    }

    /// Make this a paragraph-set section.
    pub fn paragraphs(mut self) -> Self {
        self.kind = SectionKind::Paragraphs;
        self
    }

    /// Number of keywords occurring in `text`, ignoring case.
    pub fn keyword_hits(&self, text: &str) -> usize {
        let haystack = text.to_lowercase();
        self.keywords
            .iter()
            .filter(|k| !k.is_empty() && haystack.contains(&k.to_lowercase()))
            .count()
    }
}

/// A table row by table ordinal and row index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowPosition {
    /// Table ordinal
    pub table: usize,
    /// Row index
    pub row: usize,
}

/// The structural shape of a section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// One row of a form table
    #[default]
    TableRow,
    /// A run of body paragraphs outside tables
    Paragraphs,
}

/// Where a section was found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SectionAnchor {
    /// A table row
    TableRow {
        /// Table ordinal
        table: usize,
        /// Row index
        row: usize,
    },
    /// A set of body paragraphs
    Paragraphs {
        /// Paragraphs in document order
        paragraphs: Vec<ParagraphRef>,
    },
}

impl SectionAnchor {
    /// The search scope this anchor covers.
    pub fn scope(&self) -> Scope {
        match self {
            SectionAnchor::TableRow { table, row } => Scope::Row {
                table: *table,
                row: *row,
            },
            SectionAnchor::Paragraphs { paragraphs } => Scope::Paragraphs(paragraphs.clone()),
        }
    }

    /// Follow paragraph insertions and removals made after locating.
    ///
    /// Removed paragraphs leave a paragraph-set anchor and later ones move.
    /// Edits only insert next to a section's own paragraphs, so a paragraph
    /// inserted into the body joins the set. Row anchors are unaffected.
    pub fn rebase(&mut self, shifts: &[ParagraphShift]) {
        let SectionAnchor::Paragraphs { paragraphs } = self else {
            return;
        };
        for shift in shifts {
            *paragraphs = paragraphs.iter().filter_map(|p| p.after(shift)).collect();
            if let ParagraphShift::Inserted(at @ ParagraphRef::Body { .. }) = shift {
                let position = paragraphs.partition_point(|p| p.index() < at.index());
                paragraphs.insert(position, at.clone());
            }
        }
    }

    /// The row position, for table-row anchors.
    pub fn row(&self) -> Option<RowPosition> {
        match *self {
            SectionAnchor::TableRow { table, row } => Some(RowPosition { table, row }),
            SectionAnchor::Paragraphs { .. } => None,
        }
    }
}

/// How a section was located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocateMethod {
    /// Enough keywords matched
    Keywords,
    /// Fewer keywords than required, but the best row had at least one
    BestEffort,
    /// The configured fallback row
    Fallback,
    /// No spec configured; the whole document is the scope
    WholeDocument,
}

/// Result of locating a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Located {
    /// The anchor, or `None` for whole-document scope
    pub anchor: Option<SectionAnchor>,

    /// How the anchor was found
    pub method: LocateMethod,

    /// Keyword hits of the winning row (0 for fallback)
    pub matches: usize,
}

impl Located {
    /// The search scope for intents in this section.
    pub fn scope(&self) -> Scope {
        self.anchor
            .as_ref()
            .map(SectionAnchor::scope)
            .unwrap_or(Scope::Document)
    }

    /// Rebase the anchor after paragraphs were inserted or removed.
    pub fn rebase(&mut self, shifts: &[ParagraphShift]) {
        if let Some(anchor) = self.anchor.as_mut() {
            anchor.rebase(shifts);
        }
    }

    /// Whole-document scope, used when a section has no spec.
    pub fn whole_document() -> Self {
        Self {
            anchor: None,
            method: LocateMethod::WholeDocument,
            matches: 0,
        }
    }
}
