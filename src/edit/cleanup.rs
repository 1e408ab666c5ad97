//! Tidying a table cell after bullets were removed from it.

use crate::error::Result;
use crate::model::{Document, Paragraph, ParagraphRef, Scope};

/// Cells longer than this are left alone.
pub const MAX_CLEANUP_PARAGRAPHS: usize = 20;

const BULLET_GLYPHS: &[char] = &['•', '◦', '‣', '▪', '-', '*', '·'];

/// A short paragraph made only of bullet glyphs left behind by a removal.
fn is_glyph_artifact(paragraph: &Paragraph) -> bool {
    let text = paragraph.plain_text();
    let text = text.trim();
    !text.is_empty()
        && text.chars().count() <= 3
        && text
            .chars()
            .all(|c| c.is_whitespace() || BULLET_GLYPHS.contains(&c))
}

fn is_debris(paragraph: &Paragraph) -> bool {
    if paragraph.is_placeholder_bullet() {
        return false;
    }
    paragraph.is_empty() || is_glyph_artifact(paragraph)
}

/// Remove empty non-bullet paragraphs and glyph artifacts from a cell.
///
/// Placeholder bullets stay, and the cell always keeps at least one
/// paragraph. Returns the number of paragraphs removed.
pub fn clean_cell(doc: &mut Document, table: usize, row: usize, cell: usize) -> Result<usize> {
    let refs = doc.paragraph_refs(&Scope::Cell { table, row, cell });
    if refs.len() > MAX_CLEANUP_PARAGRAPHS {
        return Ok(0);
    }

    let mut debris: Vec<ParagraphRef> = refs
        .iter()
        .filter(|at| doc.paragraph(at).is_some_and(is_debris))
        .cloned()
        .collect();
    if debris.len() == refs.len() {
        debris.remove(0);
    }

    let removed = debris.len();
    for at in debris.iter().rev() {
        doc.remove_paragraph(at)?;
    }
    if removed > 0 {
        log::debug!(
            "Removed {} empty paragraphs from table {} row {} cell {}",
            removed,
            table,
            row,
            cell
        );
    }
    Ok(removed)
}
