//! Plain text rendering for documents.

use crate::error::Result;
use crate::model::{Block, Document, ListStyle, Paragraph, Table};

/// Convert a document to plain text.
///
/// List items are indented two spaces per level and prefixed with their
/// marker; table rows become tab-separated lines.
pub fn to_text(doc: &Document) -> Result<String> {
    let mut lines = Vec::new();

    for block in &doc.blocks {
        match block {
            Block::Paragraph(p) => lines.push(paragraph_line(p)),
            Block::Table(t) => render_table(t, &mut lines),
        }
    }

    Ok(lines.join("\n").trim().to_string())
}

fn paragraph_line(paragraph: &Paragraph) -> String {
    let text = paragraph.plain_text();
    match &paragraph.style.list_info {
        Some(info) => {
            let indent = "  ".repeat(info.level as usize);
            let marker = match &info.style {
                ListStyle::Numbered { number } => format!("{}.", number),
                ListStyle::Bullet { marker } => marker.to_string(),
            };
            format!("{}{} {}", indent, marker, text).trim_end().to_string()
        }
        None => text,
    }
}

fn render_table(table: &Table, lines: &mut Vec<String>) {
    for row in &table.rows {
        let cells: Vec<String> = row
            .cells
            .iter()
            .map(|cell| {
                cell.content
                    .iter()
                    .map(paragraph_line)
                    .filter(|l| !l.trim().is_empty())
                    .collect::<Vec<_>>()
                    .join(" / ")
            })
            .collect();
        lines.push(cells.join("\t"));
    }
}
