//! Cascading resolution of intent target text to paragraphs.

use super::similarity::{find_ignore_case, keywords, similarity};
use super::{MatchOptions, MatchThresholds, Profile, Strategy};
use crate::error::{Error, Result};
use crate::model::{Document, ParagraphRef, Scope};
use std::ops::Range;

/// Minimum prefix length for matching a target truncated with `...`.
const TRUNCATED_PREFIX_MIN: usize = 10;

/// A paragraph chosen for an intent.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Where the paragraph lives
    pub at: ParagraphRef,

    /// The strategy that produced the match
    pub strategy: Strategy,

    /// Byte range of the verbatim match, when there is one
    pub span: Option<Range<usize>>,

    /// Paragraph text at resolution time
    pub text: String,
}

/// Finds the paragraph an intent refers to by running the strategy cascade.
///
/// Each strategy scans the whole scope before the next one runs, so a
/// verbatim match anywhere in the scope beats a fuzzy match earlier in it.
/// The first paragraph that satisfies a strategy wins.
pub struct TextResolver<'a> {
    options: &'a MatchOptions,
}

impl<'a> TextResolver<'a> {
    /// Create a resolver over the given options.
    pub fn new(options: &'a MatchOptions) -> Self {
        Self { options }
    }

    /// Resolve `target` inside `scope`.
    pub fn resolve(
        &self,
        doc: &Document,
        scope: &Scope,
        target: &str,
        profile: Profile,
    ) -> Result<Resolution> {
        let thresholds = self.options.thresholds(profile);
        let candidates: Vec<(ParagraphRef, String)> = doc
            .paragraph_refs(scope)
            .into_iter()
            .filter_map(|at| {
                let paragraph = doc.paragraph(&at)?;
                if paragraph.is_empty() {
                    return None;
                }
                Some((at, paragraph.plain_text()))
            })
            .collect();

        for &strategy in self.options.cascade.iter().filter(|s| s.is_textual()) {
            log::debug!(
                "Trying {} match for {:?} over {} paragraphs",
                strategy,
                target,
                candidates.len()
            );
            for (at, text) in &candidates {
                if let Some(span) = match_text(strategy, text, target, thresholds) {
                    log::debug!("{} match at {}", strategy, at);
                    return Ok(Resolution {
                        at: at.clone(),
                        strategy,
                        span,
                        text: text.clone(),
                    });
                }
            }
        }

        Err(Error::IntentUnresolved {
            target: target.to_string(),
        })
    }

    /// The first placeholder bullet in scope.
    pub fn first_placeholder(&self, doc: &Document, scope: &Scope) -> Option<ParagraphRef> {
        doc.paragraph_refs(scope)
            .into_iter()
            .find(|at| doc.paragraph(at).is_some_and(|p| p.is_placeholder_bullet()))
    }

    /// The last non-empty paragraph in scope.
    pub fn last_non_empty(&self, doc: &Document, scope: &Scope) -> Option<ParagraphRef> {
        doc.paragraph_refs(scope)
            .into_iter()
            .rev()
            .find(|at| doc.paragraph(at).is_some_and(|p| !p.is_empty()))
    }
}

/// Apply one strategy to one paragraph.
///
/// `None` means no match; `Some(span)` is a match, with the verbatim byte
/// range when the strategy produces one.
pub fn match_text(
    strategy: Strategy,
    text: &str,
    target: &str,
    thresholds: &MatchThresholds,
) -> Option<Option<Range<usize>>> {
    match strategy {
        Strategy::Exact => exact(text, target).map(Some),
        Strategy::Similarity => {
            (similarity(text, target) > thresholds.similarity).then_some(None)
        }
        Strategy::Keyword => keyword(text, target, thresholds).then_some(None),
        Strategy::Structural => None,
    }
}

fn exact(text: &str, target: &str) -> Option<Range<usize>> {
    if let Some(range) = find_ignore_case(text, target) {
        return Some(range);
    }

    // Upstream readers cut long targets short with an ellipsis; match the
    // prefix and run to the end of the paragraph.
    let prefix = target
        .strip_suffix("...")
        .or_else(|| target.strip_suffix('…'))?
        .trim_end();
    if prefix.chars().count() <= TRUNCATED_PREFIX_MIN {
        return None;
    }
    find_ignore_case(text, prefix).map(|range| range.start..text.len())
}

fn keyword(text: &str, target: &str, thresholds: &MatchThresholds) -> bool {
    let words = keywords(target, thresholds.min_keyword_len);
    if words.is_empty() {
        return false;
    }

    let haystack = text.to_lowercase();
    let hits = words.iter().filter(|w| haystack.contains(w.as_str())).count();
    hits >= thresholds.min_keyword_hits
        && hits as f64 >= thresholds.keyword_ratio * words.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Paragraph, Table, TableCell, TableRow};

    fn doc() -> Document {
        let mut doc = Document::new();
        doc.add_paragraph(Paragraph::with_text(
            "We recommend you review your super fees annually",
        ));
        let mut table = Table::new();
        table.add_row(TableRow::from_strings(["ITEMS DISCUSSED", "ACTION TAKEN"]));
        table.add_row(TableRow::new(vec![
            TableCell::with_content(vec![
                Paragraph::bullet("Review your super fees", 0),
                Paragraph::placeholder_bullet(0),
            ]),
            TableCell::text("Send statement."),
        ]));
        doc.add_table(table);
        doc
    }

    #[test]
    fn test_exact_beats_earlier_fuzzy() {
        let doc = doc();
        let options = MatchOptions::default();
        let resolver = TextResolver::new(&options);

        let res = resolver
            .resolve(&doc, &Scope::Document, "review your super fees", Profile::Standard)
            .unwrap();
        assert_eq!(res.strategy, Strategy::Exact);
        // the body paragraph contains the phrase too and comes first
        assert_eq!(res.at, ParagraphRef::Body { block: 0 });

        let res = resolver
            .resolve(&doc, &Scope::Document, "Send statement.", Profile::Standard)
            .unwrap();
        assert_eq!(res.strategy, Strategy::Exact);
        assert_eq!(res.span, Some(0..15));
        assert!(res.at.is_cell());
    }

    #[test]
    fn test_similarity_fallback() {
        let doc = doc();
        let options = MatchOptions::default();
        let resolver = TextResolver::new(&options);

        // {review, your, super, fees} shared with the bullet, 1 extra word
        let res = resolver
            .resolve(
                &doc,
                &Scope::Row { table: 0, row: 1 },
                "review super fees your please",
                Profile::Standard,
            )
            .unwrap();
        assert_eq!(res.strategy, Strategy::Similarity);
        assert_eq!(res.span, None);
        assert_eq!(res.text, "Review your super fees");
    }

    #[test]
    fn test_similarity_threshold_is_strict() {
        // 3 shared of 5 distinct words scores exactly 0.6
        let t = MatchThresholds::standard();
        assert_eq!(match_text(Strategy::Similarity, "a b c d", "a b c e", &t), None);
        let t = t.with_similarity(0.59);
        assert_eq!(
            match_text(Strategy::Similarity, "a b c d", "a b c e", &t),
            Some(None)
        );
    }

    #[test]
    fn test_keyword_match() {
        let t = MatchThresholds::standard();
        let text = "Consolidate the superannuation accounts held with two providers";
        assert!(keyword(text, "consolidate superannuation", &t));
        assert!(!keyword(text, "insurance review needed", &t));

        let strict = MatchThresholds::dot_point();
        assert!(!keyword(text, "consolidate everything", &strict));
    }

    #[test]
    fn test_truncated_target() {
        let text = "Discussed the transition to retirement strategy and its tax benefits";
        let span = exact(text, "Discussed the transition to...").unwrap();
        assert_eq!(span, 0..text.len());
        // prefix too short to trust
        assert_eq!(exact(text, "Discussed...").map(|_| ()), None);
    }

    #[test]
    fn test_unresolved() {
        let doc = doc();
        let options = MatchOptions::exact_only();
        let resolver = TextResolver::new(&options);
        let err = resolver
            .resolve(&doc, &Scope::Document, "nothing like this", Profile::Standard)
            .unwrap_err();
        assert!(matches!(err, Error::IntentUnresolved { .. }));
    }

    #[test]
    fn test_structural_helpers() {
        let doc = doc();
        let options = MatchOptions::default();
        let resolver = TextResolver::new(&options);
        let row = Scope::Row { table: 0, row: 1 };

        let placeholder = resolver.first_placeholder(&doc, &row).unwrap();
        assert_eq!(
            placeholder,
            ParagraphRef::Cell {
                table: 0,
                row: 1,
                cell: 0,
                paragraph: 1
            }
        );
        let last = resolver.last_non_empty(&doc, &row).unwrap();
        assert_eq!(doc.paragraph(&last).unwrap().plain_text(), "Send statement.");
    }
}
