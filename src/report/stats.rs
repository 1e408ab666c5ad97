//! Counters collected while applying an edit plan.

use super::{ChangeKind, ChangeRecord};
use crate::matching::Strategy;
use serde::{Deserialize, Serialize};

/// Statistics for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditStats {
    /// Intents resolved by verbatim match
    pub exact_matches: u32,

    /// Intents resolved by similarity
    pub similarity_matches: u32,

    /// Intents resolved by keyword overlap
    pub keyword_matches: u32,

    /// Intents resolved by position
    pub structural_matches: u32,

    /// Intents that failed
    pub failed: u32,

    /// Intents skipped (row deletion override, already replaced)
    pub skipped: u32,

    /// Text deletions applied
    pub deletions: u32,

    /// Replacements applied
    pub replacements: u32,

    /// Rows deleted
    pub row_deletions: u32,

    /// Notes appended
    pub appends: u32,

    /// Dot points deleted
    pub dot_point_deletions: u32,

    /// Placeholders filled
    pub placeholders_filled: u32,

    /// Dot points inserted
    #[serde(default)]
    pub dot_points_added: u32,

    /// Paragraphs removed from the document
    pub paragraphs_removed: u32,

    /// Sections processed
    pub sections_processed: u32,

    /// Sections that could not be located
    pub sections_not_found: u32,

    /// Intents rejected before resolution
    pub intents_malformed: u32,
}

impl EditStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count an applied change.
    pub fn add_change(&mut self, record: &ChangeRecord) {
        match record.strategy {
            Strategy::Exact => self.exact_matches += 1,
            Strategy::Similarity => self.similarity_matches += 1,
            Strategy::Keyword => self.keyword_matches += 1,
            Strategy::Structural => self.structural_matches += 1,
        }
        match record.kind {
            ChangeKind::TextDeleted => self.deletions += 1,
            ChangeKind::TextReplaced => self.replacements += 1,
            ChangeKind::RowDeleted => self.row_deletions += 1,
            ChangeKind::TextAppended => self.appends += 1,
            ChangeKind::DotPointDeleted => self.dot_point_deletions += 1,
            ChangeKind::PlaceholderFilled => self.placeholders_filled += 1,
            ChangeKind::DotPointAdded => self.dot_points_added += 1,
        }
        self.paragraphs_removed += record.paragraphs_removed as u32;
    }

    /// Increment failed count.
    pub fn add_failure(&mut self) {
        self.failed += 1;
    }

    /// Increment skipped count.
    pub fn add_skipped(&mut self) {
        self.skipped += 1;
    }

    /// Increment malformed count. Malformed intents also count as failed.
    pub fn add_malformed(&mut self) {
        self.intents_malformed += 1;
        self.failed += 1;
    }

    /// Increment processed section count.
    pub fn add_section(&mut self) {
        self.sections_processed += 1;
    }

    /// Increment missing section count.
    pub fn add_section_not_found(&mut self) {
        self.sections_not_found += 1;
    }

    /// Intents that produced a change.
    pub fn applied(&self) -> u32 {
        self.exact_matches + self.similarity_matches + self.keyword_matches + self.structural_matches
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &EditStats) {
        self.exact_matches += other.exact_matches;
        self.similarity_matches += other.similarity_matches;
        self.keyword_matches += other.keyword_matches;
        self.structural_matches += other.structural_matches;
        self.failed += other.failed;
        self.skipped += other.skipped;
        self.deletions += other.deletions;
        self.replacements += other.replacements;
        self.row_deletions += other.row_deletions;
        self.appends += other.appends;
        self.dot_point_deletions += other.dot_point_deletions;
        self.placeholders_filled += other.placeholders_filled;
        self.dot_points_added += other.dot_points_added;
        self.paragraphs_removed += other.paragraphs_removed;
        self.sections_processed += other.sections_processed;
        self.sections_not_found += other.sections_not_found;
        self.intents_malformed += other.intents_malformed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_change() {
        let mut stats = EditStats::new();
        stats.add_change(
            &ChangeRecord::new(ChangeKind::DotPointDeleted, "3_2", "T0R1C0P0", Strategy::Similarity)
                .with_removed(2),
        );
        stats.add_change(&ChangeRecord::new(
            ChangeKind::RowDeleted,
            "2_1",
            "T0R2",
            Strategy::Structural,
        ));

        assert_eq!(stats.similarity_matches, 1);
        assert_eq!(stats.structural_matches, 1);
        assert_eq!(stats.dot_point_deletions, 1);
        assert_eq!(stats.row_deletions, 1);
        assert_eq!(stats.paragraphs_removed, 2);
        assert_eq!(stats.applied(), 2);
    }

    #[test]
    fn test_malformed_counts_as_failed() {
        let mut stats = EditStats::new();
        stats.add_malformed();
        stats.add_failure();
        assert_eq!(stats.failed, 2);
        assert_eq!(stats.intents_malformed, 1);
    }

    #[test]
    fn test_merge() {
        let mut a = EditStats {
            deletions: 2,
            exact_matches: 2,
            ..Default::default()
        };
        let b = EditStats {
            deletions: 1,
            sections_not_found: 1,
            ..Default::default()
        };
        a.merge(&b);
        assert_eq!(a.deletions, 3);
        assert_eq!(a.sections_not_found, 1);
    }
}
