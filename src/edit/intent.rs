//! Edit intents.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// A typed description of one handwritten edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditIntent {
    /// Delete a phrase or sentence.
    DeleteText {
        /// Text to delete
        text: String,
    },
    /// Replace a phrase.
    ReplaceText {
        /// Text as it appears in the document
        original: String,
        /// Text to put in its place
        replacement: String,
    },
    /// Delete the section's table row.
    DeleteRow,
    /// Append a handwritten note.
    AppendText {
        /// Note text
        text: String,
        /// Paragraph to append to; the last non-empty paragraph when absent
        #[serde(default, skip_serializing_if = "Option::is_none")]
        anchor: Option<String>,
    },
    /// Delete a bullet and its sub-bullets.
    DeleteDotPoint {
        /// Bullet text
        text: String,
    },
    /// Delete a parent bullet together with its sub-bullets.
    CascadeDeleteSubpoints {
        /// Parent bullet text
        text: String,
    },
    /// Write text into the next empty bullet.
    FillPlaceholder {
        /// Text to write
        text: String,
    },
    /// Add a new bullet, filling an empty one first if the section has one.
    AddDotPoint {
        /// Bullet text
        text: String,
        /// Bullet the new one goes after; the last non-empty paragraph when absent
        #[serde(default, skip_serializing_if = "Option::is_none")]
        after: Option<String>,
    },
}

impl EditIntent {
    /// Snake-case name of the intent type.
    pub fn name(&self) -> &'static str {
        match self {
            EditIntent::DeleteText { .. } => "delete_text",
            EditIntent::ReplaceText { .. } => "replace_text",
            EditIntent::DeleteRow => "delete_row",
            EditIntent::AppendText { .. } => "append_text",
            EditIntent::DeleteDotPoint { .. } => "delete_dot_point",
            EditIntent::CascadeDeleteSubpoints { .. } => "cascade_delete_subpoints",
            EditIntent::FillPlaceholder { .. } => "fill_placeholder",
            EditIntent::AddDotPoint { .. } => "add_dot_point",
        }
    }

    /// The document text this intent looks for, if any.
    pub fn target(&self) -> Option<&str> {
        match self {
            EditIntent::DeleteText { text }
            | EditIntent::DeleteDotPoint { text }
            | EditIntent::CascadeDeleteSubpoints { text } => Some(text),
            EditIntent::ReplaceText { original, .. } => Some(original),
            EditIntent::AppendText { anchor, .. } => anchor.as_deref(),
            EditIntent::AddDotPoint { after, .. } => after.as_deref(),
            EditIntent::DeleteRow | EditIntent::FillPlaceholder { .. } => None,
        }
    }

    /// Whether the intent removes text.
    pub fn is_deletion(&self) -> bool {
        matches!(
            self,
            EditIntent::DeleteText { .. }
                | EditIntent::DeleteDotPoint { .. }
                | EditIntent::CascadeDeleteSubpoints { .. }
        )
    }

    /// Copy of the intent with a different target text.
    pub(crate) fn retarget(&self, target: String) -> EditIntent {
        match self {
            EditIntent::DeleteText { .. } => EditIntent::DeleteText { text: target },
            EditIntent::DeleteDotPoint { .. } => EditIntent::DeleteDotPoint { text: target },
            EditIntent::CascadeDeleteSubpoints { .. } => {
                EditIntent::CascadeDeleteSubpoints { text: target }
            }
            EditIntent::ReplaceText { replacement, .. } => EditIntent::ReplaceText {
                original: target,
                replacement: replacement.clone(),
            },
            other => other.clone(),
        }
    }

    /// Normalize text fields (NFC, single spaces) and reject empty ones.
    pub fn validate(&self) -> Result<EditIntent> {
        let intent = match self {
            EditIntent::DeleteText { text } => EditIntent::DeleteText {
                text: required(self, "text", text)?,
            },
            EditIntent::ReplaceText {
                original,
                replacement,
            } => EditIntent::ReplaceText {
                original: required(self, "original", original)?,
                replacement: required(self, "replacement", replacement)?,
            },
            EditIntent::DeleteRow => EditIntent::DeleteRow,
            EditIntent::AppendText { text, anchor } => EditIntent::AppendText {
                text: required(self, "text", text)?,
                anchor: anchor
                    .as_deref()
                    .map(normalize_text)
                    .filter(|a| !a.is_empty()),
            },
            EditIntent::DeleteDotPoint { text } => EditIntent::DeleteDotPoint {
                text: required(self, "text", text)?,
            },
            EditIntent::CascadeDeleteSubpoints { text } => EditIntent::CascadeDeleteSubpoints {
                text: required(self, "text", text)?,
            },
            EditIntent::FillPlaceholder { text } => EditIntent::FillPlaceholder {
                text: required(self, "text", text)?,
            },
            EditIntent::AddDotPoint { text, after } => EditIntent::AddDotPoint {
                text: required(self, "text", text)?,
                after: after
                    .as_deref()
                    .map(normalize_text)
                    .filter(|a| !a.is_empty()),
            },
        };
        Ok(intent)
    }
}

fn required(intent: &EditIntent, field: &str, value: &str) -> Result<String> {
    let value = normalize_text(value);
    if value.is_empty() {
        return Err(Error::MalformedIntent(format!(
            "{} has an empty {} field",
            intent.name(),
            field
        )));
    }
    Ok(value)
}

/// NFC-normalize and collapse whitespace runs to single spaces.
pub fn normalize_text(text: &str) -> String {
    let composed: String = text.nfc().collect();
    composed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// An intent plus the cell it is limited to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionEdit {
    /// The intent
    #[serde(flatten)]
    pub intent: EditIntent,

    /// Cell of a table-row section to search (0 = left box)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell: Option<usize>,
}

impl SectionEdit {
    /// An intent searched across the whole section.
    pub fn new(intent: EditIntent) -> Self {
        Self { intent, cell: None }
    }

    /// Limit the intent to one cell.
    pub fn in_cell(mut self, cell: usize) -> Self {
        self.cell = Some(cell);
        self
    }
}

impl From<EditIntent> for SectionEdit {
    fn from(intent: EditIntent) -> Self {
        Self::new(intent)
    }
}

/// Whole-row strike-through marks for a table-row section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowMarks {
    /// The left box is struck through entirely
    pub left_fully_marked: bool,

    /// The right box is struck through entirely
    pub right_fully_marked: bool,

    /// The row is marked for deletion outright
    pub delete_row: bool,
}

impl RowMarks {
    /// Whether the marks call for deleting the row.
    pub fn requests_deletion(&self) -> bool {
        self.delete_row || (self.left_fully_marked && self.right_fully_marked)
    }
}

/// Everything to do in one section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionEdits {
    /// Intents in application order
    #[serde(default)]
    pub intents: Vec<SectionEdit>,

    /// Row-level marks
    #[serde(default)]
    pub row_marks: RowMarks,
}

impl SectionEdits {
    /// Create empty section edits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an intent.
    pub fn with(mut self, edit: impl Into<SectionEdit>) -> Self {
        self.intents.push(edit.into());
        self
    }

    /// Set row marks.
    pub fn with_row_marks(mut self, marks: RowMarks) -> Self {
        self.row_marks = marks;
        self
    }

    /// Whether the row itself is to be deleted, by marks or by intent.
    pub fn deletes_row(&self) -> bool {
        self.row_marks.requests_deletion()
            || self
                .intents
                .iter()
                .any(|e| matches!(e.intent, EditIntent::DeleteRow))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_json() {
        let edit: SectionEdit = serde_json::from_str(
            r#"{"type": "replace_text", "original": "annually", "replacement": "quarterly", "cell": 1}"#,
        )
        .unwrap();
        assert_eq!(edit.cell, Some(1));
        assert_eq!(edit.intent.name(), "replace_text");
        assert_eq!(edit.intent.target(), Some("annually"));

        let edit: SectionEdit = serde_json::from_str(r#"{"type": "delete_row"}"#).unwrap();
        assert_eq!(edit.intent, EditIntent::DeleteRow);
        assert_eq!(edit.cell, None);
    }

    #[test]
    fn test_add_dot_point_json() {
        let edit: SectionEdit = serde_json::from_str(
            r#"{"type": "add_dot_point", "text": " Aged  care ", "after": "Estate planning", "cell": 0}"#,
        )
        .unwrap();
        assert_eq!(edit.intent.name(), "add_dot_point");
        assert_eq!(edit.intent.target(), Some("Estate planning"));
        assert!(!edit.intent.is_deletion());
        assert_eq!(
            edit.intent.validate().unwrap(),
            EditIntent::AddDotPoint {
                text: "Aged care".into(),
                after: Some("Estate planning".into()),
            }
        );
    }

    #[test]
    fn test_unknown_intent_is_rejected() {
        let result = serde_json::from_str::<EditIntent>(r#"{"type": "underline", "text": "x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_normalizes() {
        let intent = EditIntent::DeleteText {
            text: "  Cafe\u{301}   fees \n".into(),
        };
        let intent = intent.validate().unwrap();
        assert_eq!(
            intent,
            EditIntent::DeleteText {
                text: "Café fees".into()
            }
        );
    }

    #[test]
    fn test_validate_rejects_empty() {
        let intent = EditIntent::ReplaceText {
            original: "fees".into(),
            replacement: "  ".into(),
        };
        assert!(matches!(intent.validate(), Err(Error::MalformedIntent(_))));

        let intent = EditIntent::AppendText {
            text: "see attached".into(),
            anchor: Some(" ".into()),
        };
        assert_eq!(
            intent.validate().unwrap(),
            EditIntent::AppendText {
                text: "see attached".into(),
                anchor: None
            }
        );
    }

    #[test]
    fn test_row_marks() {
        assert!(!RowMarks::default().requests_deletion());
        let half = RowMarks {
            left_fully_marked: true,
            ..Default::default()
        };
        assert!(!half.requests_deletion());
        let both = RowMarks {
            left_fully_marked: true,
            right_fully_marked: true,
            delete_row: false,
        };
        assert!(both.requests_deletion());

        let edits = SectionEdits::new().with(EditIntent::DeleteRow);
        assert!(edits.deletes_row());
    }
}
