//! Applying one resolved intent to the document.

use super::cleanup::clean_cell;
use super::text_ops::{append_note, mostly_removed, remove_span, splice};
use super::{EditIntent, SectionEdit};
use crate::error::{Error, Result};
use crate::locate::Located;
use crate::matching::similarity::best_sentence;
use crate::matching::{MatchOptions, Profile, Resolution, Strategy, TextResolver};
use crate::model::{Document, ListStyle, Paragraph, ParagraphRef, ParagraphShift, Scope};
use crate::report::{ChangeKind, ChangeRecord};

/// Options for applying edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyOptions {
    /// Remove empty paragraphs and glyph debris from a cell after a dot
    /// point is deleted from it
    pub cleanup_after_dot_point: bool,

    /// Retry an unresolved deletion with earlier replacements applied to
    /// its target text
    pub replacement_retry: bool,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self {
            cleanup_after_dot_point: true,
            replacement_retry: true,
        }
    }
}

impl ApplyOptions {
    /// Create apply options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable cell cleanup after dot point deletion.
    pub fn with_cleanup(mut self, enabled: bool) -> Self {
        self.cleanup_after_dot_point = enabled;
        self
    }

    /// Enable or disable the replacement-aware retry.
    pub fn with_replacement_retry(mut self, enabled: bool) -> Self {
        self.replacement_retry = enabled;
        self
    }
}

/// Resolves an intent inside a located section and mutates the document.
pub struct EditApplier<'a> {
    resolver: TextResolver<'a>,
    options: &'a ApplyOptions,
}

impl<'a> EditApplier<'a> {
    /// Create an applier.
    pub fn new(matching: &'a MatchOptions, options: &'a ApplyOptions) -> Self {
        Self {
            resolver: TextResolver::new(matching),
            options,
        }
    }

    /// Apply one edit and describe the change.
    ///
    /// The intent is expected to be validated. On error the document is
    /// unchanged.
    pub fn apply(
        &self,
        doc: &mut Document,
        section: &str,
        located: &Located,
        edit: &SectionEdit,
    ) -> Result<ChangeRecord> {
        let scope = match edit.cell {
            Some(cell) => located.scope().narrow_to_cell(cell),
            None => located.scope(),
        };

        let record = match &edit.intent {
            EditIntent::DeleteText { text } => {
                let res = self.resolver.resolve(doc, &scope, text, Profile::Standard)?;
                self.delete_text(doc, section, res, text)?
            }
            EditIntent::ReplaceText {
                original,
                replacement,
            } => {
                let res = self
                    .resolver
                    .resolve(doc, &scope, original, Profile::Standard)?;
                self.replace_text(doc, section, res, original, replacement)?
            }
            EditIntent::DeleteRow => self.delete_row(doc, section, located)?,
            EditIntent::AppendText { text, anchor } => {
                self.append_text(doc, section, &scope, text, anchor.as_deref())?
            }
            EditIntent::DeleteDotPoint { text } | EditIntent::CascadeDeleteSubpoints { text } => {
                let res = self.resolver.resolve(doc, &scope, text, Profile::DotPoint)?;
                self.delete_dot_point(doc, section, res)?
            }
            EditIntent::FillPlaceholder { text } => {
                let at = self.resolver.first_placeholder(doc, &scope).ok_or_else(|| {
                    Error::IntentUnresolved {
                        target: text.clone(),
                    }
                })?;
                doc.node(at.clone())?.set_text(text.clone())?;
                ChangeRecord::new(
                    ChangeKind::PlaceholderFilled,
                    section,
                    at.to_string(),
                    Strategy::Structural,
                )
                .with_text("", text.clone())
            }
            EditIntent::AddDotPoint { text, after } => {
                self.add_dot_point(doc, section, &scope, text, after.as_deref())?
            }
        };

        log::info!(
            "[{}] {} at {} ({})",
            section,
            edit.intent.name(),
            record.location,
            record.strategy
        );
        Ok(record)
    }

    fn delete_text(
        &self,
        doc: &mut Document,
        section: &str,
        res: Resolution,
        target: &str,
    ) -> Result<ChangeRecord> {
        let span = res.span.clone().or_else(|| {
            if res.strategy.is_fuzzy() {
                best_sentence(&res.text, target)
            } else {
                None
            }
        });

        let new_text = match span {
            Some(span) => {
                let remainder = remove_span(&res.text, span);
                if mostly_removed(&res.text, &remainder) {
                    String::new()
                } else {
                    remainder
                }
            }
            None => String::new(),
        };

        let mut node = doc.node(res.at.clone())?;
        if new_text.is_empty() {
            node.clear()?;
        } else {
            node.set_text(new_text.clone())?;
        }

        Ok(
            ChangeRecord::new(ChangeKind::TextDeleted, section, res.at.to_string(), res.strategy)
                .with_text(res.text, new_text),
        )
    }

    fn replace_text(
        &self,
        doc: &mut Document,
        section: &str,
        res: Resolution,
        original: &str,
        replacement: &str,
    ) -> Result<ChangeRecord> {
        let mut node = doc.node(res.at.clone())?;
        let new_text = match res.span.clone() {
            Some(span) => splice(&res.text, span, replacement),
            None if node.is_bullet()? => replacement.to_string(),
            None => match best_sentence(&res.text, original) {
                Some(span) => splice(&res.text, span, replacement),
                None => replacement.to_string(),
            },
        };
        node.set_text(new_text.clone())?;

        Ok(
            ChangeRecord::new(ChangeKind::TextReplaced, section, res.at.to_string(), res.strategy)
                .with_text(res.text, new_text),
        )
    }

    fn delete_row(
        &self,
        doc: &mut Document,
        section: &str,
        located: &Located,
    ) -> Result<ChangeRecord> {
        let position = located
            .anchor
            .as_ref()
            .and_then(|a| a.row())
            .ok_or_else(|| {
                Error::StructuralMutation(format!(
                    "section {} is not anchored to a table row",
                    section
                ))
            })?;

        let removed = doc.remove_row(position.table, position.row)?;
        Ok(ChangeRecord::new(
            ChangeKind::RowDeleted,
            section,
            format!("T{}R{}", position.table, position.row),
            Strategy::Structural,
        )
        .with_text(removed.plain_text(), ""))
    }

    fn append_text(
        &self,
        doc: &mut Document,
        section: &str,
        scope: &Scope,
        text: &str,
        anchor: Option<&str>,
    ) -> Result<ChangeRecord> {
        let (at, strategy) = match anchor {
            Some(anchor) => {
                let res = self.resolver.resolve(doc, scope, anchor, Profile::Append)?;
                (res.at, res.strategy)
            }
            None => {
                let at = self.resolver.last_non_empty(doc, scope).ok_or_else(|| {
                    Error::IntentUnresolved {
                        target: text.to_string(),
                    }
                })?;
                (at, Strategy::Structural)
            }
        };

        let mut node = doc.node(at.clone())?;
        let original = node.text()?;
        let new_text = append_note(&original, text);
        node.set_text(new_text.clone())?;

        Ok(
            ChangeRecord::new(ChangeKind::TextAppended, section, at.to_string(), strategy)
                .with_text(original, new_text),
        )
    }

    fn delete_dot_point(
        &self,
        doc: &mut Document,
        section: &str,
        res: Resolution,
    ) -> Result<ChangeRecord> {
        let mut doomed = vec![res.at.clone()];
        if let Some(level) = doc.paragraph(&res.at).and_then(|p| p.list_level()) {
            for at in doc.following_siblings(&res.at) {
                match doc.paragraph(&at).and_then(|p| p.list_level()) {
                    Some(child) if child > level => doomed.push(at),
                    _ => break,
                }
            }
        }

        let removed_text: Vec<String> = doomed
            .iter()
            .filter_map(|at| doc.paragraph(at))
            .map(|p| p.plain_text())
            .collect();
        let mut shifts = Vec::with_capacity(doomed.len());
        for at in doomed.iter().rev() {
            doc.remove_paragraph(at)?;
            shifts.push(ParagraphShift::Removed(at.clone()));
        }

        if self.options.cleanup_after_dot_point {
            if let ParagraphRef::Cell {
                table, row, cell, ..
            } = res.at
            {
                clean_cell(doc, table, row, cell)?;
            }
        }

        Ok(
            ChangeRecord::new(ChangeKind::DotPointDeleted, section, res.at.to_string(), res.strategy)
                .with_text(removed_text.join("\n"), "")
                .with_removed(doomed.len())
                .with_shifts(shifts),
        )
    }

    fn add_dot_point(
        &self,
        doc: &mut Document,
        section: &str,
        scope: &Scope,
        text: &str,
        after: Option<&str>,
    ) -> Result<ChangeRecord> {
        let (previous, strategy) = match after {
            Some(after) => {
                let res = self.resolver.resolve(doc, scope, after, Profile::Append)?;
                (Some(res.at), res.strategy)
            }
            None => {
                if let Some(at) = self.resolver.first_placeholder(doc, scope) {
                    doc.node(at.clone())?.set_text(text)?;
                    return Ok(ChangeRecord::new(
                        ChangeKind::PlaceholderFilled,
                        section,
                        at.to_string(),
                        Strategy::Structural,
                    )
                    .with_text("", text));
                }
                let previous = self
                    .resolver
                    .last_non_empty(doc, scope)
                    .or_else(|| doc.paragraph_refs(scope).pop());
                (previous, Strategy::Structural)
            }
        };

        let mut bullet = Paragraph::bullet(text, 0);
        let at = match previous {
            Some(previous) => {
                let mut last = previous.clone();
                if let Some(p) = doc.paragraph(&previous) {
                    if let Some(info) = &p.style.list_info {
                        if matches!(info.style, ListStyle::Bullet { .. }) {
                            bullet.style = p.style.clone();
                        }
                        // land after the sub-bullets of the bullet we follow
                        for next in doc.following_siblings(&previous) {
                            match doc.paragraph(&next).and_then(|p| p.list_level()) {
                                Some(child) if child > info.level => last = next,
                                _ => break,
                            }
                        }
                    }
                }
                last.next()
            }
            None => match *scope {
                Scope::Cell { table, row, cell } => ParagraphRef::Cell {
                    table,
                    row,
                    cell,
                    paragraph: 0,
                },
                _ => {
                    return Err(Error::IntentUnresolved {
                        target: text.to_string(),
                    })
                }
            },
        };

        doc.insert_paragraph(&at, bullet)?;
        Ok(
            ChangeRecord::new(ChangeKind::DotPointAdded, section, at.to_string(), strategy)
                .with_text("", text)
                .with_shifts(vec![ParagraphShift::Inserted(at)]),
        )
    }
}
