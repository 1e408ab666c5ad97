//! Paragraphs, runs and list membership.

use serde::{Deserialize, Serialize};

/// A paragraph: formatted runs plus paragraph properties.
///
/// Edits rewrite the runs and never touch `props`, so a bullet stays a
/// bullet at the same level after its text is replaced or cleared.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Runs in reading order
    #[serde(default)]
    pub runs: Vec<TextRun>,

    /// Paragraph properties
    #[serde(default, rename = "props")]
    pub style: ParagraphStyle,
}

impl Paragraph {
    /// Create a paragraph with no runs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paragraph with one unformatted run.
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut p = Self::new();
        p.add_text(text);
        p
    }

    /// Create a bullet at the given nesting level.
    pub fn bullet(text: impl Into<String>, level: u8) -> Self {
        let mut p = Self::with_text(text);
        p.style.list_info = Some(ListInfo::bullet(level));
        p
    }

    /// Create an empty bullet waiting to be filled in.
    pub fn placeholder_bullet(level: u8) -> Self {
        let mut p = Self::new();
        p.style.list_info = Some(ListInfo::bullet(level));
        p
    }

    /// Create a numbered list item.
    pub fn numbered(text: impl Into<String>, level: u8, number: u32) -> Self {
        let mut p = Self::with_text(text);
        p.style.list_info = Some(ListInfo::numbered(level, number));
        p
    }

    /// Append an unformatted run.
    pub fn add_text(&mut self, text: impl Into<String>) {
        self.runs.push(TextRun::new(text));
    }

    /// Append a run.
    pub fn add_run(&mut self, run: TextRun) {
        self.runs.push(run);
    }

    /// Concatenated run text.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Replace the full text of the paragraph.
    ///
    /// The runs collapse into a single run carrying the formatting of the
    /// first original run.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let style = self
            .runs
            .first()
            .map(|r| r.style.clone())
            .unwrap_or_default();
        self.runs.clear();
        self.runs.push(TextRun {
            text: text.into(),
            style,
        });
    }

    /// Remove all text, keeping the paragraph and its properties.
    pub fn clear(&mut self) {
        self.runs.clear();
    }

    /// No visible text.
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|r| r.text.trim().is_empty())
    }

    /// Member of a bulleted or numbered list.
    pub fn is_list_item(&self) -> bool {
        self.style.list_info.is_some()
    }

    /// List nesting level, or `None` for non-list paragraphs.
    pub fn list_level(&self) -> Option<u8> {
        self.style.list_info.as_ref().map(|info| info.level)
    }

    /// A list item with no text.
    pub fn is_placeholder_bullet(&self) -> bool {
        self.is_list_item() && self.is_empty()
    }
}

/// A run of text sharing one set of character properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// Run text
    pub text: String,

    /// Character formatting
    #[serde(default, rename = "format", skip_serializing_if = "TextStyle::is_plain")]
    pub style: TextStyle,
}

impl TextRun {
    /// Create an unformatted run.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle::default(),
        }
    }

    /// Create a bold run.
    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle {
                bold: true,
                ..Default::default()
            },
        }
    }
}

/// Character properties carried through edits untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    /// Bold
    pub bold: bool,

    /// Italic
    pub italic: bool,

    /// Underlined
    pub underline: bool,

    /// Typeface name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,

    /// Size in half-points, as word processors store it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,

    /// Hex RGB colour
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl TextStyle {
    /// No formatting at all.
    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }
}

/// Paragraph properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParagraphStyle {
    /// Named paragraph style from the template (e.g. "ListBullet")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_id: Option<String>,

    /// List membership
    #[serde(rename = "list", skip_serializing_if = "Option::is_none")]
    pub list_info: Option<ListInfo>,
}

/// List membership of a paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListInfo {
    /// Bullet or numbering
    pub style: ListStyle,

    /// Nesting level (0 = top level)
    #[serde(default)]
    pub level: u8,
}

impl ListInfo {
    /// Bullet list membership at a level.
    pub fn bullet(level: u8) -> Self {
        Self {
            style: ListStyle::Bullet { marker: '•' },
            level,
        }
    }

    /// Numbered list membership at a level.
    pub fn numbered(level: u8, number: u32) -> Self {
        Self {
            style: ListStyle::Numbered { number },
            level,
        }
    }
}

/// How list items are marked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ListStyle {
    /// Numbered item
    Numbered {
        /// Item number
        number: u32,
    },
    /// Bulleted item
    Bullet {
        /// Bullet glyph
        marker: char,
    },
}
