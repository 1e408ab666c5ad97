//! # docmend
//!
//! Apply handwritten-annotation edits to templated rich-text documents.
//!
//! A document is edited from an [`EditPlan`]: for each named section, an
//! ordered list of typed [`EditIntent`]s ("delete this sentence", "replace
//! this phrase", "delete this row", "append this note"). Sections are found
//! by keyword scoring over table rows (see [`TemplateConfig`]), intent
//! targets are resolved with a cascade of exact, similarity and keyword
//! matching, and every completed mutation is recorded in a [`RunReport`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use docmend::{load_file, save_file, EditPlan, EditSession, TemplateConfig};
//!
//! fn main() -> docmend::Result<()> {
//!     let mut doc = load_file("letter.json")?;
//!     let plan = EditPlan::load("plan.json")?;
//!     let config = TemplateConfig::load("template.json")?;
//!
//!     let report = EditSession::with_config(config).apply(&mut doc, &plan);
//!     println!("{} changes", report.changes.len());
//!
//!     save_file(&doc, "letter.edited.json")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Section location**: keyword scoring over form-table rows with
//!   best-effort and fallback positions, or keyword-anchored body paragraphs
//! - **Cascading matching**: exact, Jaccard similarity and keyword overlap,
//!   each strategy scanning the whole section before the next runs
//! - **Structure-aware edits**: bullets keep their list membership, parent
//!   bullets take their sub-bullets with them, rows are removed atomically
//! - **Failure isolation**: a missing section or unresolved intent is
//!   reported and the run continues

pub mod config;
pub mod edit;
pub mod error;
pub mod locate;
pub mod matching;
pub mod model;
pub mod plan;
pub mod render;
pub mod report;
pub mod session;

// Re-export commonly used types
pub use config::TemplateConfig;
pub use edit::{ApplyOptions, EditIntent, RowMarks, SectionEdit, SectionEdits};
pub use error::{Error, Result};
pub use locate::{
    LocateMethod, Located, RowPosition, SectionAnchor, SectionKind, SectionLocator, SectionSpec,
};
pub use matching::{similarity, MatchOptions, MatchThresholds, Strategy};
pub use model::{
    Block, Document, ListInfo, ListStyle, Metadata, Paragraph, ParagraphRef, ParagraphShift,
    ParagraphStyle, Scope, Table, TableCell, TableRow, TextRun, TextStyle,
};
pub use plan::{EditPlan, SectionPlan};
pub use render::JsonFormat;
pub use report::{ChangeKind, ChangeLog, ChangeRecord, EditStats, RunReport, SectionReport};
pub use session::EditSession;

use std::io::Read;
use std::path::Path;

/// Load a document from a JSON file.
///
/// # Example
///
/// ```no_run
/// use docmend::load_file;
///
/// let doc = load_file("letter.json").unwrap();
/// println!("Tables: {}", doc.table_count());
/// ```
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    let data = std::fs::read(path)?;
    load_bytes(&data)
}

/// Load a document from JSON bytes.
pub fn load_bytes(data: &[u8]) -> Result<Document> {
    Ok(serde_json::from_slice(data)?)
}

/// Load a document from a reader.
pub fn load_reader<R: Read>(reader: R) -> Result<Document> {
    Ok(serde_json::from_reader(reader)?)
}

/// Write a document to a JSON file.
pub fn save_file<P: AsRef<Path>>(doc: &Document, path: P) -> Result<()> {
    let json = render::to_json(doc, JsonFormat::Pretty)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Builder for applying edit plans.
///
/// # Example
///
/// ```no_run
/// use docmend::Docmend;
///
/// let result = Docmend::new()
///     .with_config_file("template.json")?
///     .with_cleanup(false)
///     .apply_file("letter.json", "plan.json")?;
/// result.save("letter.edited.json")?;
/// # Ok::<(), docmend::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Docmend {
    config: TemplateConfig,
    apply_options: ApplyOptions,
}

impl Docmend {
    /// Create a new builder with no section specs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a template configuration.
    pub fn with_config(mut self, config: TemplateConfig) -> Self {
        self.config = config;
        self
    }

    /// Load the template configuration from a JSON file.
    pub fn with_config_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        self.config = TemplateConfig::load(path)?;
        Ok(self)
    }

    /// Set match options.
    pub fn with_match_options(mut self, matching: MatchOptions) -> Self {
        self.config.matching = matching;
        self
    }

    /// Only accept verbatim matches.
    pub fn exact_only(mut self) -> Self {
        self.config.matching = self.config.matching.with_cascade(vec![Strategy::Exact]);
        self
    }

    /// Enable or disable cell cleanup after dot point deletion.
    pub fn with_cleanup(mut self, enabled: bool) -> Self {
        self.apply_options = self.apply_options.with_cleanup(enabled);
        self
    }

    /// Enable or disable the replacement-aware deletion retry.
    pub fn with_replacement_retry(mut self, enabled: bool) -> Self {
        self.apply_options = self.apply_options.with_replacement_retry(enabled);
        self
    }

    /// Build an edit session from this configuration.
    pub fn session(&self) -> Result<EditSession> {
        self.config.validate()?;
        Ok(EditSession::with_config(self.config.clone())
            .with_apply_options(self.apply_options.clone()))
    }

    /// Apply a plan to a document in place.
    pub fn apply(&self, doc: &mut Document, plan: &EditPlan) -> Result<RunReport> {
        Ok(self.session()?.apply(doc, plan))
    }

    /// Load a document and a plan from JSON files and apply the plan.
    pub fn apply_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        document: P,
        plan: Q,
    ) -> Result<DocmendResult> {
        let mut doc = load_file(document)?;
        let plan = EditPlan::load(plan)?;
        let report = self.apply(&mut doc, &plan)?;
        Ok(DocmendResult {
            document: doc,
            report,
        })
    }
}

/// An edited document and the report of what was done to it.
#[derive(Debug, Clone)]
pub struct DocmendResult {
    /// The edited document
    pub document: Document,
    /// What was applied, skipped and failed
    pub report: RunReport,
}

impl DocmendResult {
    /// Convert the document to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Convert the document to plain text.
    pub fn to_text(&self) -> Result<String> {
        render::to_text(&self.document)
    }

    /// Write the document to a JSON file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        save_file(&self.document, path)
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}
