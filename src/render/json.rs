//! JSON output for documents, plans and reports.

use crate::error::{Error, Result};
use serde::Serialize;

/// JSON layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Indented, one field per line
    #[default]
    Pretty,
    /// One line, no extra whitespace
    Compact,
}

impl JsonFormat {
    /// `Pretty` when `pretty` is set, else `Compact`.
    pub fn pretty(pretty: bool) -> Self {
        if pretty {
            Self::Pretty
        } else {
            Self::Compact
        }
    }
}

/// Serialize any model value; failures surface as [`Error::Render`].
pub fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let out = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };
    out.map_err(|e| Error::Render(format!("cannot serialize to JSON: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Document, Paragraph, Table, TableRow};

    #[test]
    fn test_pretty_document() {
        let mut doc = Document::new();
        doc.metadata.title = Some("Record of advice".to_string());
        doc.add_paragraph(Paragraph::with_text("Hello"));

        let json = to_json(&doc, JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"title\""));
        assert!(json.contains("Record of advice"));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_compact_document_reloads() {
        let mut doc = Document::new();
        let mut table = Table::new();
        table.add_row(TableRow::from_strings(["Review super.", "Send statement."]));
        doc.add_table(table);
        doc.add_paragraph(Paragraph::bullet("Item", 1));

        let json = to_json(&doc, JsonFormat::pretty(false)).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.contains("\"type\":\"table\""));

        let back: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_unserializable_map_key() {
        let mut map = std::collections::HashMap::new();
        map.insert((1, 2), "pair keys are not JSON object keys");
        assert!(matches!(
            to_json(&map, JsonFormat::Compact),
            Err(Error::Render(_))
        ));
    }
}
