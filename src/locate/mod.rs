//! Section location.
//!
//! A section is either one row of a form table, found by counting keyword
//! hits across every row, or a set of body paragraphs that mention its
//! keywords.

mod spec;

pub use spec::{LocateMethod, Located, RowPosition, SectionAnchor, SectionKind, SectionSpec};

use crate::error::{Error, Result};
use crate::model::{Document, ParagraphRef};

/// Locates named sections inside a document.
#[derive(Debug, Clone, Copy, Default)]
pub struct SectionLocator;

impl SectionLocator {
    /// Create a new locator.
    pub fn new() -> Self {
        Self
    }

    /// Locate the section described by `spec`.
    pub fn locate(&self, doc: &Document, spec: &SectionSpec) -> Result<Located> {
        match spec.kind {
            SectionKind::TableRow => self.locate_row(doc, spec),
            SectionKind::Paragraphs => self.locate_paragraphs(doc, spec),
        }
    }

    fn locate_row(&self, doc: &Document, spec: &SectionSpec) -> Result<Located> {
        if let Some((position, matches)) = best_row(doc, spec, spec.min_keyword_matches) {
            log::debug!(
                "Section {} at table {} row {} ({} keywords)",
                spec.name,
                position.table,
                position.row,
                matches
            );
            return Ok(row_located(position, LocateMethod::Keywords, matches));
        }

        if spec.min_keyword_matches > 1 {
            if let Some((position, matches)) = best_row(doc, spec, 1) {
                log::debug!(
                    "Section {} best effort at table {} row {} ({} keywords)",
                    spec.name,
                    position.table,
                    position.row,
                    matches
                );
                return Ok(row_located(position, LocateMethod::BestEffort, matches));
            }
        }

        if let Some(position) = spec.fallback {
            if doc.has_row(position.table, position.row) {
                log::debug!(
                    "Section {} using fallback table {} row {}",
                    spec.name,
                    position.table,
                    position.row
                );
                return Ok(row_located(position, LocateMethod::Fallback, 0));
            }
            log::debug!("Section {} fallback row does not exist", spec.name);
        }

        Err(Error::SectionNotFound {
            section: spec.name.clone(),
        })
    }

    fn locate_paragraphs(&self, doc: &Document, spec: &SectionSpec) -> Result<Located> {
        let mut paragraphs = Vec::new();
        let mut matches = 0;

        for (block, paragraph) in doc.paragraphs() {
            if paragraph.is_empty() {
                continue;
            }
            let hits = spec.keyword_hits(&paragraph.plain_text());
            if hits >= spec.min_keyword_matches.max(1) {
                paragraphs.push(ParagraphRef::Body { block });
                matches = matches.max(hits);
            }
        }

        if paragraphs.is_empty() {
            return Err(Error::SectionNotFound {
                section: spec.name.clone(),
            });
        }

        log::debug!(
            "Section {} anchored to {} body paragraphs",
            spec.name,
            paragraphs.len()
        );
        Ok(Located {
            anchor: Some(SectionAnchor::Paragraphs { paragraphs }),
            method: LocateMethod::Keywords,
            matches,
        })
    }
}

/// Row with the strictly highest keyword count at or above `threshold`.
/// Rows with fewer than two cells are not form rows and are skipped, and a
/// row with no keyword at all never qualifies.
fn best_row(doc: &Document, spec: &SectionSpec, threshold: usize) -> Option<(RowPosition, usize)> {
    let threshold = threshold.max(1);
    let mut best: Option<(RowPosition, usize)> = None;

    for (table_index, table) in doc.tables().enumerate() {
        for (row_index, row) in table.rows.iter().enumerate() {
            if !row.is_form_row() {
                continue;
            }
            let hits = spec.keyword_hits(&row.plain_text());
            if hits >= threshold && best.map_or(true, |(_, count)| hits > count) {
                best = Some((
                    RowPosition {
                        table: table_index,
                        row: row_index,
                    },
                    hits,
                ));
            }
        }
    }

    best
}

fn row_located(position: RowPosition, method: LocateMethod, matches: usize) -> Located {
    Located {
        anchor: Some(SectionAnchor::TableRow {
            table: position.table,
            row: position.row,
        }),
        method,
        matches,
    }
}
