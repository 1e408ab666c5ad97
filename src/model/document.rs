//! Document-level types.

use super::{Paragraph, ParagraphRef, Scope, Table, TableRow, TextNode};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A structured rich-text document.
///
/// The document owns its blocks in reading order. Tables are addressed by
/// their ordinal among tables (the first table is table 0), paragraphs by a
/// [`ParagraphRef`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document metadata
    #[serde(default)]
    pub metadata: Metadata,

    /// Content blocks in document order
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a paragraph to the document body.
    pub fn add_paragraph(&mut self, paragraph: Paragraph) {
        self.blocks.push(Block::Paragraph(paragraph));
    }

    /// Add a table to the document body.
    pub fn add_table(&mut self, table: Table) {
        self.blocks.push(Block::Table(table));
    }

    /// Check if the document has any content.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Top-level paragraphs with their block index.
    pub fn paragraphs(&self) -> impl Iterator<Item = (usize, &Paragraph)> {
        self.blocks
            .iter()
            .enumerate()
            .filter_map(|(i, block)| match block {
                Block::Paragraph(p) => Some((i, p)),
                Block::Table(_) => None,
            })
    }

    /// Tables in document order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Table(t) => Some(t),
            Block::Paragraph(_) => None,
        })
    }

    /// Number of tables in the document.
    pub fn table_count(&self) -> usize {
        self.tables().count()
    }

    /// Get a table by ordinal.
    pub fn table(&self, ordinal: usize) -> Option<&Table> {
        self.tables().nth(ordinal)
    }

    /// Get a mutable table by ordinal.
    pub fn table_mut(&mut self, ordinal: usize) -> Option<&mut Table> {
        self.blocks
            .iter_mut()
            .filter_map(|block| match block {
                Block::Table(t) => Some(t),
                Block::Paragraph(_) => None,
            })
            .nth(ordinal)
    }

    /// Check whether a table row exists.
    pub fn has_row(&self, table: usize, row: usize) -> bool {
        self.table(table).is_some_and(|t| row < t.row_count())
    }

    /// Resolve a paragraph reference.
    pub fn paragraph(&self, at: &ParagraphRef) -> Option<&Paragraph> {
        match *at {
            ParagraphRef::Body { block } => match self.blocks.get(block)? {
                Block::Paragraph(p) => Some(p),
                Block::Table(_) => None,
            },
            ParagraphRef::Cell {
                table,
                row,
                cell,
                paragraph,
            } => self
                .table(table)?
                .rows
                .get(row)?
                .cells
                .get(cell)?
                .content
                .get(paragraph),
        }
    }

    /// Resolve a paragraph reference mutably.
    pub fn paragraph_mut(&mut self, at: &ParagraphRef) -> Option<&mut Paragraph> {
        match *at {
            ParagraphRef::Body { block } => match self.blocks.get_mut(block)? {
                Block::Paragraph(p) => Some(p),
                Block::Table(_) => None,
            },
            ParagraphRef::Cell {
                table,
                row,
                cell,
                paragraph,
            } => self
                .table_mut(table)?
                .rows
                .get_mut(row)?
                .cells
                .get_mut(cell)?
                .content
                .get_mut(paragraph),
        }
    }

    /// Get a text-bearing node handle for a paragraph.
    pub fn node(&mut self, at: ParagraphRef) -> Result<TextNode<'_>> {
        if self.paragraph(&at).is_none() {
            return Err(Error::InvalidReference(at.to_string()));
        }
        Ok(TextNode::new(self, at))
    }

    /// Remove a paragraph from its parent (body or table cell).
    ///
    /// References to later siblings in the same container shift down by one;
    /// callers removing several paragraphs must go from the highest index
    /// to the lowest.
    pub fn remove_paragraph(&mut self, at: &ParagraphRef) -> Result<Paragraph> {
        match *at {
            ParagraphRef::Body { block } => {
                if !matches!(self.blocks.get(block), Some(Block::Paragraph(_))) {
                    return Err(Error::StructuralMutation(format!(
                        "{} is not a paragraph",
                        at
                    )));
                }
                match self.blocks.remove(block) {
                    Block::Paragraph(p) => Ok(p),
                    Block::Table(t) => {
                        self.blocks.insert(block, Block::Table(t));
                        Err(Error::StructuralMutation(format!("{} is a table", at)))
                    }
                }
            }
            ParagraphRef::Cell {
                table,
                row,
                cell,
                paragraph,
            } => {
                let content = self
                    .table_mut(table)
                    .and_then(|t| t.rows.get_mut(row))
                    .and_then(|r| r.cells.get_mut(cell))
                    .map(|c| &mut c.content)
                    .ok_or_else(|| Error::StructuralMutation(format!("{} has no parent cell", at)))?;
                if paragraph >= content.len() {
                    return Err(Error::StructuralMutation(format!("{} is stale", at)));
                }
                Ok(content.remove(paragraph))
            }
        }
    }

    /// Insert a paragraph so that it ends up at `at`.
    ///
    /// The paragraph previously at `at` and its later siblings shift up by
    /// one. `at` may point one past the last paragraph of its container.
    pub fn insert_paragraph(&mut self, at: &ParagraphRef, paragraph: Paragraph) -> Result<()> {
        match *at {
            ParagraphRef::Body { block } => {
                if block > self.blocks.len() {
                    return Err(Error::StructuralMutation(format!(
                        "{} is past the end of the body",
                        at
                    )));
                }
                self.blocks.insert(block, Block::Paragraph(paragraph));
            }
            ParagraphRef::Cell {
                table,
                row,
                cell,
                paragraph: index,
            } => {
                let content = self
                    .table_mut(table)
                    .and_then(|t| t.rows.get_mut(row))
                    .and_then(|r| r.cells.get_mut(cell))
                    .map(|c| &mut c.content)
                    .ok_or_else(|| Error::StructuralMutation(format!("{} has no parent cell", at)))?;
                if index > content.len() {
                    return Err(Error::StructuralMutation(format!(
                        "{} is past the end of its cell",
                        at
                    )));
                }
                content.insert(index, paragraph);
            }
        }
        Ok(())
    }

    /// Remove a table row, verifying the table shrank by exactly one row.
    pub fn remove_row(&mut self, table: usize, row: usize) -> Result<TableRow> {
        let t = self
            .table_mut(table)
            .ok_or_else(|| Error::StructuralMutation(format!("table {} not found", table)))?;
        t.remove_row(row)
    }

    /// Snapshot of every paragraph reference inside a scope, in document order.
    ///
    /// Document scope walks the blocks in order, descending into each table
    /// row by row and cell by cell.
    pub fn paragraph_refs(&self, scope: &Scope) -> Vec<ParagraphRef> {
        match scope {
            Scope::Document => {
                let mut refs = Vec::new();
                let mut table_ordinal = 0;
                for (block_index, block) in self.blocks.iter().enumerate() {
                    match block {
                        Block::Paragraph(_) => refs.push(ParagraphRef::Body { block: block_index }),
                        Block::Table(t) => {
                            for (row, r) in t.rows.iter().enumerate() {
                                for (cell, c) in r.cells.iter().enumerate() {
                                    refs.extend((0..c.content.len()).map(|paragraph| {
                                        ParagraphRef::Cell {
                                            table: table_ordinal,
                                            row,
                                            cell,
                                            paragraph,
                                        }
                                    }));
                                }
                            }
                            table_ordinal += 1;
                        }
                    }
                }
                refs
            }
            Scope::Row { table, row } => {
                let Some(r) = self.table(*table).and_then(|t| t.rows.get(*row)) else {
                    return Vec::new();
                };
                r.cells
                    .iter()
                    .enumerate()
                    .flat_map(|(cell, c)| {
                        (0..c.content.len()).map(move |paragraph| ParagraphRef::Cell {
                            table: *table,
                            row: *row,
                            cell,
                            paragraph,
                        })
                    })
                    .collect()
            }
            Scope::Cell { table, row, cell } => {
                let Some(c) = self
                    .table(*table)
                    .and_then(|t| t.rows.get(*row))
                    .and_then(|r| r.cells.get(*cell))
                else {
                    return Vec::new();
                };
                (0..c.content.len())
                    .map(|paragraph| ParagraphRef::Cell {
                        table: *table,
                        row: *row,
                        cell: *cell,
                        paragraph,
                    })
                    .collect()
            }
            Scope::Paragraphs(refs) => refs
                .iter()
                .filter(|r| self.paragraph(r).is_some())
                .cloned()
                .collect(),
        }
    }

    /// References to the paragraphs following `at` in the same container.
    ///
    /// For body paragraphs the run ends at the next table.
    pub fn following_siblings(&self, at: &ParagraphRef) -> Vec<ParagraphRef> {
        match *at {
            ParagraphRef::Body { block } => self
                .blocks
                .iter()
                .enumerate()
                .skip(block + 1)
                .take_while(|(_, b)| matches!(b, Block::Paragraph(_)))
                .map(|(i, _)| ParagraphRef::Body { block: i })
                .collect(),
            ParagraphRef::Cell {
                table,
                row,
                cell,
                paragraph,
            } => {
                let len = self
                    .table(table)
                    .and_then(|t| t.rows.get(row))
                    .and_then(|r| r.cells.get(cell))
                    .map(|c| c.content.len())
                    .unwrap_or(0);
                (paragraph + 1..len)
                    .map(|p| ParagraphRef::Cell {
                        table,
                        row,
                        cell,
                        paragraph: p,
                    })
                    .collect()
            }
        }
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|block| match block {
                Block::Paragraph(p) => p.plain_text(),
                Block::Table(t) => t.plain_text(),
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// A content block in the document body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A paragraph of text
    Paragraph(Paragraph),

    /// A table
    Table(Table),
}

/// Document metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Template the document was produced from
    pub template: Option<String>,

    /// Document author
    pub author: Option<String>,

    /// Creation date
    pub created: Option<DateTime<Utc>>,

    /// Last modification date
    pub modified: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TableCell, TableRow};

    fn sample() -> Document {
        let mut doc = Document::new();
        doc.add_paragraph(Paragraph::with_text("Dear client,"));
        let mut table = Table::new();
        table.add_row(TableRow::from_strings(["A", "B"]));
        table.add_row(TableRow::new(vec![
            TableCell::with_content(vec![
                Paragraph::bullet("Parent", 0),
                Paragraph::bullet("Child", 1),
            ]),
            TableCell::text("Right"),
        ]));
        doc.add_table(table);
        doc.add_paragraph(Paragraph::with_text("Kind regards"));
        doc
    }

    #[test]
    fn test_document_new() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.table_count(), 0);
    }

    #[test]
    fn test_document_order_refs() {
        let doc = sample();
        let refs = doc.paragraph_refs(&Scope::Document);
        let texts: Vec<String> = refs
            .iter()
            .map(|r| doc.paragraph(r).unwrap().plain_text())
            .collect();
        assert_eq!(
            texts,
            vec!["Dear client,", "A", "B", "Parent", "Child", "Right", "Kind regards"]
        );
    }

    #[test]
    fn test_row_scope_covers_both_cells() {
        let doc = sample();
        let refs = doc.paragraph_refs(&Scope::Row { table: 0, row: 1 });
        assert_eq!(refs.len(), 3);
    }

    #[test]
    fn test_missing_scope_is_empty() {
        let doc = sample();
        assert!(doc.paragraph_refs(&Scope::Row { table: 3, row: 0 }).is_empty());
        assert!(doc
            .paragraph_refs(&Scope::Cell {
                table: 0,
                row: 1,
                cell: 5
            })
            .is_empty());
    }

    #[test]
    fn test_remove_cell_paragraph() {
        let mut doc = sample();
        let at = ParagraphRef::Cell {
            table: 0,
            row: 1,
            cell: 0,
            paragraph: 0,
        };
        let removed = doc.remove_paragraph(&at).unwrap();
        assert_eq!(removed.plain_text(), "Parent");
        assert_eq!(doc.paragraph(&at).unwrap().plain_text(), "Child");
    }

    #[test]
    fn test_remove_body_paragraph_rejects_table() {
        let mut doc = sample();
        let err = doc
            .remove_paragraph(&ParagraphRef::Body { block: 1 })
            .unwrap_err();
        assert!(matches!(err, Error::StructuralMutation(_)));
    }

    #[test]
    fn test_insert_paragraph() {
        let mut doc = sample();
        let at = ParagraphRef::Cell {
            table: 0,
            row: 1,
            cell: 0,
            paragraph: 2,
        };
        doc.insert_paragraph(&at, Paragraph::bullet("Sibling", 0)).unwrap();
        assert_eq!(doc.paragraph(&at).unwrap().plain_text(), "Sibling");

        doc.insert_paragraph(&ParagraphRef::Body { block: 1 }, Paragraph::with_text("Re: advice"))
            .unwrap();
        let body: Vec<String> = doc.paragraphs().map(|(_, p)| p.plain_text()).collect();
        assert_eq!(body, vec!["Dear client,", "Re: advice", "Kind regards"]);
        assert!(doc.table(0).is_some());

        let past_end = ParagraphRef::Cell {
            table: 0,
            row: 1,
            cell: 1,
            paragraph: 5,
        };
        assert!(doc.insert_paragraph(&past_end, Paragraph::new()).is_err());
    }

    #[test]
    fn test_following_siblings() {
        let doc = sample();
        let at = ParagraphRef::Cell {
            table: 0,
            row: 1,
            cell: 0,
            paragraph: 0,
        };
        assert_eq!(doc.following_siblings(&at).len(), 1);
        assert!(doc
            .following_siblings(&ParagraphRef::Body { block: 0 })
            .is_empty());
    }

    #[test]
    fn test_remove_row() {
        let mut doc = sample();
        doc.remove_row(0, 0).unwrap();
        assert_eq!(doc.table(0).unwrap().row_count(), 1);
        assert!(doc.remove_row(2, 0).is_err());
    }
}
