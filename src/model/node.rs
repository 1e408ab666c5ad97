//! Addressing and text-bearing node access.
//!
//! Body paragraphs and table-cell paragraphs are reached through the same
//! [`ParagraphRef`] and [`TextNode`] types, so code that searches or edits
//! text never needs to know which container a paragraph lives in.

use super::{Document, Paragraph};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Location of a paragraph inside a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "in", rename_all = "snake_case")]
pub enum ParagraphRef {
    /// A top-level paragraph, by block index.
    Body {
        /// Index into `Document::blocks`
        block: usize,
    },
    /// A paragraph inside a table cell.
    Cell {
        /// Table ordinal
        table: usize,
        /// Row index
        row: usize,
        /// Cell index within the row
        cell: usize,
        /// Paragraph index within the cell
        paragraph: usize,
    },
}

impl ParagraphRef {
    /// The table row containing this paragraph, if any.
    pub fn row(&self) -> Option<(usize, usize)> {
        match *self {
            ParagraphRef::Cell { table, row, .. } => Some((table, row)),
            ParagraphRef::Body { .. } => None,
        }
    }

    /// Whether the paragraph lives in a table cell.
    pub fn is_cell(&self) -> bool {
        matches!(self, ParagraphRef::Cell { .. })
    }
}

impl ParagraphRef {
    /// Whether `other` lives in the same container (the body, or one cell).
    pub fn same_container(&self, other: &ParagraphRef) -> bool {
        match (self, other) {
            (ParagraphRef::Body { .. }, ParagraphRef::Body { .. }) => true,
            (
                ParagraphRef::Cell {
                    table, row, cell, ..
                },
                ParagraphRef::Cell {
                    table: t,
                    row: r,
                    cell: c,
                    ..
                },
            ) => table == t && row == r && cell == c,
            _ => false,
        }
    }

    /// Index within the container.
    pub fn index(&self) -> usize {
        match *self {
            ParagraphRef::Body { block } => block,
            ParagraphRef::Cell { paragraph, .. } => paragraph,
        }
    }

    /// The position right after this paragraph in its container.
    pub fn next(&self) -> ParagraphRef {
        self.with_index(self.index() + 1)
    }

    fn with_index(&self, index: usize) -> ParagraphRef {
        match *self {
            ParagraphRef::Body { .. } => ParagraphRef::Body { block: index },
            ParagraphRef::Cell {
                table, row, cell, ..
            } => ParagraphRef::Cell {
                table,
                row,
                cell,
                paragraph: index,
            },
        }
    }

    /// Where this reference points after `shift`, or `None` if its
    /// paragraph was the one removed.
    pub fn after(&self, shift: &ParagraphShift) -> Option<ParagraphRef> {
        match shift {
            ParagraphShift::Removed(at) if at == self => None,
            ParagraphShift::Removed(at) if self.same_container(at) && self.index() > at.index() => {
                Some(self.with_index(self.index() - 1))
            }
            ParagraphShift::Inserted(at) if self.same_container(at) && self.index() >= at.index() => {
                Some(self.with_index(self.index() + 1))
            }
            _ => Some(self.clone()),
        }
    }
}

/// A paragraph added to or taken out of its container.
///
/// Later siblings move by one, so references taken before the change must
/// be passed through [`ParagraphRef::after`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParagraphShift {
    /// The paragraph that was at this reference is gone
    Removed(ParagraphRef),
    /// A new paragraph now sits at this reference
    Inserted(ParagraphRef),
}

impl fmt::Display for ParagraphRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParagraphRef::Body { block } => write!(f, "body[{}]", block),
            ParagraphRef::Cell {
                table,
                row,
                cell,
                paragraph,
            } => write!(f, "T{}R{}C{}P{}", table, row, cell, paragraph),
        }
    }
}

/// The region of a document a search runs over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Every body paragraph and every table cell
    Document,
    /// All cells of one table row
    Row {
        /// Table ordinal
        table: usize,
        /// Row index
        row: usize,
    },
    /// One cell of one table row
    Cell {
        /// Table ordinal
        table: usize,
        /// Row index
        row: usize,
        /// Cell index
        cell: usize,
    },
    /// An explicit paragraph set
    Paragraphs(Vec<ParagraphRef>),
}

impl Scope {
    /// Narrow a row scope to one of its cells. Other scopes are returned unchanged.
    pub fn narrow_to_cell(&self, cell: usize) -> Scope {
        match *self {
            Scope::Row { table, row } => Scope::Cell { table, row, cell },
            _ => self.clone(),
        }
    }

    /// The table row this scope is bound to, if any.
    pub fn row(&self) -> Option<(usize, usize)> {
        match *self {
            Scope::Row { table, row } | Scope::Cell { table, row, .. } => Some((table, row)),
            _ => None,
        }
    }
}

/// Mutable handle to one paragraph, wherever it lives.
pub struct TextNode<'a> {
    doc: &'a mut Document,
    at: ParagraphRef,
}

impl<'a> TextNode<'a> {
    pub(crate) fn new(doc: &'a mut Document, at: ParagraphRef) -> Self {
        Self { doc, at }
    }

    /// Where the node lives.
    pub fn location(&self) -> &ParagraphRef {
        &self.at
    }

    fn paragraph(&self) -> Result<&Paragraph> {
        self.doc
            .paragraph(&self.at)
            .ok_or_else(|| Error::InvalidReference(self.at.to_string()))
    }

    fn paragraph_mut(&mut self) -> Result<&mut Paragraph> {
        let at = self.at.to_string();
        self.doc
            .paragraph_mut(&self.at)
            .ok_or(Error::InvalidReference(at))
    }

    /// Full text of the paragraph.
    pub fn text(&self) -> Result<String> {
        Ok(self.paragraph()?.plain_text())
    }

    /// Whether the paragraph is a list item.
    pub fn is_bullet(&self) -> Result<bool> {
        Ok(self.paragraph()?.is_list_item())
    }

    /// Replace the paragraph text, keeping its style and list membership.
    pub fn set_text(&mut self, text: impl Into<String>) -> Result<()> {
        self.paragraph_mut()?.set_text(text);
        Ok(())
    }

    /// Clear the paragraph text, keeping the paragraph itself.
    pub fn clear(&mut self) -> Result<()> {
        self.paragraph_mut()?.clear();
        Ok(())
    }

    /// Remove the paragraph from its parent container.
    pub fn remove(self) -> Result<Paragraph> {
        self.doc.remove_paragraph(&self.at)
    }
}
