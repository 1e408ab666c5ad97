//! Document model types.
//!
//! This module defines the in-memory representation edits are applied to:
//! a body of paragraphs and tables, tables of rows of cells, and cells of
//! paragraphs. The model is serde-serializable so documents can be loaded
//! from and written back to JSON.

mod document;
mod node;
mod paragraph;
mod table;

pub use document::{Block, Document, Metadata};
pub use node::{ParagraphRef, ParagraphShift, Scope, TextNode};
pub use paragraph::{
    ListInfo, ListStyle, Paragraph, ParagraphStyle, TextRun, TextStyle,
};
pub use table::{Table, TableCell, TableRow};
