//! Template configuration: how each named section is found.

use crate::error::{Error, Result};
use crate::locate::SectionSpec;
use crate::matching::MatchOptions;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Section specs for one document template, plus match tuning.
///
/// ```
/// use docmend::TemplateConfig;
///
/// let config = TemplateConfig::from_json(r#"{
///     "name": "record of advice",
///     "sections": {
///         "1_4": {"keywords": ["maximising", "superannuation"], "min_keyword_matches": 2},
///         "4_3": {"keywords": ["estate"], "fallback": {"table": 1, "row": 13}}
///     }
/// }"#).unwrap();
/// assert_eq!(config.spec("1_4").unwrap().name, "1_4");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Template name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Section specs by name
    #[serde(default)]
    pub sections: BTreeMap<String, SectionSpec>,

    /// Match thresholds and strategy cascade
    #[serde(default)]
    pub matching: MatchOptions,
}

impl TemplateConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a section spec, keyed by its name.
    pub fn with_section(mut self, spec: SectionSpec) -> Self {
        self.sections.insert(spec.name.clone(), spec);
        self
    }

    /// Set the match options.
    pub fn with_matching(mut self, matching: MatchOptions) -> Self {
        self.matching = matching;
        self
    }

    /// Parse and validate a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut config: TemplateConfig = serde_json::from_str(json)?;
        for (name, spec) in config.sections.iter_mut() {
            if spec.name.is_empty() {
                spec.name = name.clone();
            }
        }
        config.validate()?;
        Ok(config)
    }

    /// Read a configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Spec for a section.
    pub fn spec(&self, section: &str) -> Option<&SectionSpec> {
        self.sections.get(section)
    }

    /// Check every spec can match something and the match options are sane.
    pub fn validate(&self) -> Result<()> {
        for (name, spec) in &self.sections {
            if spec.name != *name {
                return Err(Error::Config(format!(
                    "section {} is stored under key {}",
                    spec.name, name
                )));
            }
            if spec.keywords.iter().all(|k| k.trim().is_empty()) && spec.fallback.is_none() {
                return Err(Error::Config(format!(
                    "section {} has no keywords and no fallback",
                    name
                )));
            }
        }
        self.matching.validate()
    }
}
