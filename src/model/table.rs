//! Form tables: rows of left/right boxes holding paragraphs.

use super::Paragraph;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A table of form rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Rows in order
    #[serde(default)]
    pub rows: Vec<TableRow>,

    /// Leading rows repeated as column headings
    #[serde(default, skip_serializing_if = "is_zero")]
    pub header_rows: u8,
}

fn is_zero(n: &u8) -> bool {
    *n == 0
}

impl Table {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// A table whose first `header_rows` rows are headings.
    pub fn with_header(header_rows: u8) -> Self {
        Self {
            header_rows,
            ..Self::new()
        }
    }

    /// Append a row.
    pub fn add_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cells per row, or `None` when rows disagree or there are none.
    pub fn column_count(&self) -> Option<usize> {
        let first = self.rows.first()?.cells.len();
        self.rows
            .iter()
            .all(|r| r.cells.len() == first)
            .then_some(first)
    }

    /// Remove a row and return it.
    ///
    /// The row count must drop by exactly one; the heading count shrinks
    /// when a heading row goes.
    pub fn remove_row(&mut self, index: usize) -> Result<TableRow> {
        let before = self.rows.len();
        if index >= before {
            return Err(Error::StructuralMutation(format!(
                "row {} out of range (table has {} rows)",
                index, before
            )));
        }

        let removed = self.rows.remove(index);

        if self.rows.len() + 1 != before {
            return Err(Error::StructuralMutation(format!(
                "row count went from {} to {} after removing row {}",
                before,
                self.rows.len(),
                index
            )));
        }
        if index < self.header_rows as usize {
            self.header_rows -= 1;
        }

        Ok(removed)
    }

    /// Rows as tab-separated lines.
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// One table row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// Cells left to right
    #[serde(default)]
    pub cells: Vec<TableCell>,

    /// Heading row
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_header: bool,
}

impl TableRow {
    /// Create a body row.
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self {
            cells,
            is_header: false,
        }
    }

    /// Create a heading row.
    pub fn header(cells: Vec<TableCell>) -> Self {
        Self {
            cells,
            is_header: true,
        }
    }

    /// A row of single-paragraph cells.
    pub fn from_strings<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self::new(values.into_iter().map(TableCell::text).collect())
    }

    /// Whether the row has the two boxes (or more) of a form row.
    pub fn is_form_row(&self) -> bool {
        self.cells.len() >= 2
    }

    /// Cell texts joined by tabs.
    pub fn plain_text(&self) -> String {
        self.cells
            .iter()
            .map(|c| c.plain_text())
            .collect::<Vec<_>>()
            .join("\t")
    }
}

/// One box of a form row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    /// Paragraphs in the cell
    #[serde(default)]
    pub content: Vec<Paragraph>,
}

impl TableCell {
    /// A cell with a single paragraph.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![Paragraph::with_text(text)],
        }
    }

    /// A cell holding the given paragraphs.
    pub fn with_content(content: Vec<Paragraph>) -> Self {
        Self { content }
    }

    /// Non-empty paragraph texts joined by spaces.
    pub fn plain_text(&self) -> String {
        self.content
            .iter()
            .map(|p| p.plain_text())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut table = Table::with_header(1);
        table.add_row(TableRow::header(vec![
            TableCell::text("ITEMS DISCUSSED"),
            TableCell::text("ACTION TAKEN"),
        ]));
        table.add_row(TableRow::from_strings(["Review super.", "Send statement."]));
        table.add_row(TableRow::from_strings(["Check fees.", "Call provider."]));
        table
    }

    #[test]
    fn test_remove_row() {
        let mut table = sample();
        let removed = table.remove_row(1).unwrap();

        assert_eq!(removed.plain_text(), "Review super.\tSend statement.");
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[1].plain_text(), "Check fees.\tCall provider.");
        assert_eq!(table.header_rows, 1);
        assert_eq!(table.column_count(), Some(2));
    }

    #[test]
    fn test_ragged_table_has_no_column_count() {
        let mut table = sample();
        table.add_row(TableRow::from_strings(["Notes"]));
        assert_eq!(table.column_count(), None);
        assert_eq!(Table::new().column_count(), None);
    }

    #[test]
    fn test_remove_header_row_adjusts_header_count() {
        let mut table = sample();
        table.remove_row(0).unwrap();
        assert_eq!(table.header_rows, 0);
    }

    #[test]
    fn test_remove_row_out_of_range() {
        let mut table = sample();
        let err = table.remove_row(7).unwrap_err();
        assert!(matches!(err, Error::StructuralMutation(_)));
        assert_eq!(table.row_count(), 3);
    }

    #[test]
    fn test_form_row() {
        assert!(TableRow::from_strings(["a", "b"]).is_form_row());
        assert!(!TableRow::from_strings(["Single heading"]).is_form_row());
    }

    #[test]
    fn test_cell_text_skips_empty_paragraphs() {
        let cell = TableCell::with_content(vec![
            Paragraph::with_text("Hello"),
            Paragraph::placeholder_bullet(0),
            Paragraph::with_text("world"),
        ]);
        assert_eq!(cell.plain_text(), "Hello world");
    }

    #[test]
    fn test_plain_rows_serialize_compactly() {
        let json = serde_json::to_string(&TableRow::from_strings(["a"])).unwrap();
        assert_eq!(json, r#"{"cells":[{"content":[{"runs":[{"text":"a"}],"props":{}}]}]}"#);
    }
}
