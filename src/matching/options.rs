//! Match thresholds and strategy configuration.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A way of deciding that a paragraph is the one an intent refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Case-insensitive verbatim substring
    Exact,
    /// Word-set similarity above a threshold
    Similarity,
    /// Enough significant words of the target occur in the paragraph
    Keyword,
    /// Position-based: row anchors, placeholder bullets, last paragraph
    Structural,
}

impl Strategy {
    /// Whether the strategy compares text (as opposed to structure).
    pub fn is_textual(self) -> bool {
        !matches!(self, Strategy::Structural)
    }

    /// Whether the match is approximate.
    pub fn is_fuzzy(self) -> bool {
        matches!(self, Strategy::Similarity | Strategy::Keyword)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Exact => "exact",
            Strategy::Similarity => "similarity",
            Strategy::Keyword => "keyword",
            Strategy::Structural => "structural",
        };
        f.write_str(name)
    }
}

/// Which threshold set an intent resolves with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Sentence and phrase edits
    Standard,
    /// Bullet (dot point) deletion
    DotPoint,
    /// Locating the paragraph a note is appended to
    Append,
}

/// Tunable thresholds for the fuzzy strategies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchThresholds {
    /// Similarity must be strictly greater than this
    pub similarity: f64,

    /// Fraction of target keywords that must occur in the paragraph
    pub keyword_ratio: f64,

    /// Minimum absolute number of keyword hits
    pub min_keyword_hits: usize,

    /// Minimum keyword length in characters
    pub min_keyword_len: usize,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self::standard()
    }
}

impl MatchThresholds {
    /// Thresholds for ordinary text deletion and replacement.
    pub fn standard() -> Self {
        Self {
            similarity: 0.6,
            keyword_ratio: 0.5,
            min_keyword_hits: 1,
            min_keyword_len: 4,
        }
    }

    /// Stricter thresholds for bullet deletion.
    pub fn dot_point() -> Self {
        Self {
            similarity: 0.7,
            keyword_ratio: 0.5,
            min_keyword_hits: 2,
            min_keyword_len: 5,
        }
    }

    /// Thresholds for finding an append anchor.
    pub fn append() -> Self {
        Self {
            similarity: 0.6,
            keyword_ratio: 0.7,
            min_keyword_hits: 1,
            min_keyword_len: 4,
        }
    }

    /// Set the similarity threshold.
    pub fn with_similarity(mut self, threshold: f64) -> Self {
        self.similarity = threshold;
        self
    }

    /// Set the keyword ratio.
    pub fn with_keyword_ratio(mut self, ratio: f64) -> Self {
        self.keyword_ratio = ratio;
        self
    }

    /// Set the minimum number of keyword hits.
    pub fn with_min_keyword_hits(mut self, hits: usize) -> Self {
        self.min_keyword_hits = hits;
        self
    }

    /// Set the minimum keyword length.
    pub fn with_min_keyword_len(mut self, len: usize) -> Self {
        self.min_keyword_len = len;
        self
    }

    fn validate(&self, name: &str) -> Result<()> {
        if !(0.0..=1.0).contains(&self.similarity) {
            return Err(Error::Config(format!(
                "{} similarity threshold {} is outside 0..=1",
                name, self.similarity
            )));
        }
        if !(0.0..=1.0).contains(&self.keyword_ratio) {
            return Err(Error::Config(format!(
                "{} keyword ratio {} is outside 0..=1",
                name, self.keyword_ratio
            )));
        }
        Ok(())
    }
}

/// A threshold profile as written in config; missing fields keep the
/// profile's own defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ThresholdOverrides {
    similarity: Option<f64>,
    keyword_ratio: Option<f64>,
    min_keyword_hits: Option<usize>,
    min_keyword_len: Option<usize>,
}

impl ThresholdOverrides {
    fn over(self, base: MatchThresholds) -> MatchThresholds {
        MatchThresholds {
            similarity: self.similarity.unwrap_or(base.similarity),
            keyword_ratio: self.keyword_ratio.unwrap_or(base.keyword_ratio),
            min_keyword_hits: self.min_keyword_hits.unwrap_or(base.min_keyword_hits),
            min_keyword_len: self.min_keyword_len.unwrap_or(base.min_keyword_len),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MatchOptionsConfig {
    standard: ThresholdOverrides,
    dot_point: ThresholdOverrides,
    append: ThresholdOverrides,
    cascade: Option<Vec<Strategy>>,
}

impl From<MatchOptionsConfig> for MatchOptions {
    fn from(config: MatchOptionsConfig) -> Self {
        let defaults = MatchOptions::default();
        Self {
            standard: config.standard.over(defaults.standard),
            dot_point: config.dot_point.over(defaults.dot_point),
            append: config.append.over(defaults.append),
            cascade: config.cascade.unwrap_or(defaults.cascade),
        }
    }
}

/// Options for resolving intent targets.
///
/// When read from config, each threshold profile is merged onto its own
/// defaults, so a partial `dot_point` keeps the stricter dot point guards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "MatchOptionsConfig")]
pub struct MatchOptions {
    /// Thresholds for text deletion and replacement
    pub standard: MatchThresholds,

    /// Thresholds for bullet deletion
    pub dot_point: MatchThresholds,

    /// Thresholds for append anchors
    pub append: MatchThresholds,

    /// Text strategies, tried in order
    pub cascade: Vec<Strategy>,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            standard: MatchThresholds::standard(),
            dot_point: MatchThresholds::dot_point(),
            append: MatchThresholds::append(),
            cascade: vec![Strategy::Exact, Strategy::Similarity, Strategy::Keyword],
        }
    }
}

impl MatchOptions {
    /// Create match options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only accept verbatim matches.
    pub fn exact_only() -> Self {
        Self::default().with_cascade(vec![Strategy::Exact])
    }

    /// Set the standard thresholds.
    pub fn with_standard(mut self, thresholds: MatchThresholds) -> Self {
        self.standard = thresholds;
        self
    }

    /// Set the dot point thresholds.
    pub fn with_dot_point(mut self, thresholds: MatchThresholds) -> Self {
        self.dot_point = thresholds;
        self
    }

    /// Set the append thresholds.
    pub fn with_append(mut self, thresholds: MatchThresholds) -> Self {
        self.append = thresholds;
        self
    }

    /// Set the strategy cascade.
    pub fn with_cascade(mut self, cascade: Vec<Strategy>) -> Self {
        self.cascade = cascade;
        self
    }

    /// Thresholds for a profile.
    pub fn thresholds(&self, profile: Profile) -> &MatchThresholds {
        match profile {
            Profile::Standard => &self.standard,
            Profile::DotPoint => &self.dot_point,
            Profile::Append => &self.append,
        }
    }

    /// Check thresholds are in range and the cascade has a text strategy.
    pub fn validate(&self) -> Result<()> {
        self.standard.validate("standard")?;
        self.dot_point.validate("dot_point")?;
        self.append.validate("append")?;
        if !self.cascade.iter().any(|s| s.is_textual()) {
            return Err(Error::Config(
                "strategy cascade has no text strategy".to_string(),
            ));
        }
        Ok(())
    }
}
