//! Applying a whole edit plan to a document.

use crate::config::TemplateConfig;
use crate::edit::text_ops::rewrite;
use crate::edit::{normalize_text, ApplyOptions, EditApplier, EditIntent, SectionEdit, SectionEdits};
use crate::error::{Error, Result};
use crate::locate::{Located, SectionLocator};
use crate::matching::MatchOptions;
use crate::model::Document;
use crate::plan::EditPlan;
use crate::report::{
    ChangeRecord, IntentOutcome, OutcomeStatus, RunReport, SectionReport, SectionStatus,
};

/// Drives section location and intent application for a plan.
///
/// Sections run in plan order and intents in list order. A section that
/// cannot be located, or an intent that cannot be applied, is reported and
/// skipped; the run itself never aborts.
#[derive(Debug, Clone, Default)]
pub struct EditSession {
    config: TemplateConfig,
    options: ApplyOptions,
    locator: SectionLocator,
}

impl EditSession {
    /// Create a session with no section specs; every section then covers
    /// the whole document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session for a template.
    pub fn with_config(config: TemplateConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Set the match options.
    pub fn with_match_options(mut self, matching: MatchOptions) -> Self {
        self.config.matching = matching;
        self
    }

    /// Set the apply options.
    pub fn with_apply_options(mut self, options: ApplyOptions) -> Self {
        self.options = options;
        self
    }

    /// The template configuration.
    pub fn config(&self) -> &TemplateConfig {
        &self.config
    }

    /// Locate a section; sections without a spec cover the whole document.
    pub fn locate(&self, doc: &Document, section: &str) -> Result<Located> {
        match self.config.spec(section) {
            Some(spec) => self.locator.locate(doc, spec),
            None => {
                log::debug!("No spec for section {}, using whole document", section);
                Ok(Located::whole_document())
            }
        }
    }

    /// Apply every section of a plan.
    pub fn apply(&self, doc: &mut Document, plan: &EditPlan) -> RunReport {
        self.apply_with_progress(doc, plan, |_| {})
    }

    /// Apply a plan, calling `on_section` after each section.
    pub fn apply_with_progress<F>(
        &self,
        doc: &mut Document,
        plan: &EditPlan,
        mut on_section: F,
    ) -> RunReport
    where
        F: FnMut(&SectionReport),
    {
        let mut report = RunReport::new();
        for section in plan.iter() {
            self.apply_section(doc, &section.section, &section.edits, &mut report);
            if let Some(last) = report.sections.last() {
                on_section(last);
            }
        }

        log::info!(
            "Applied {} changes across {} sections ({} failed, {} skipped)",
            report.changes.len(),
            report.stats.sections_processed,
            report.stats.failed,
            report.stats.skipped
        );
        report
    }

    /// Apply one section's edits, appending to `report`.
    pub fn apply_section(
        &self,
        doc: &mut Document,
        name: &str,
        edits: &SectionEdits,
        report: &mut RunReport,
    ) {
        report.stats.add_section();

        let located = match self.locate(doc, name) {
            Ok(located) => located,
            Err(e) => {
                log::warn!("Section {}: {}", name, e);
                report.stats.add_section_not_found();
                report.sections.push(SectionReport {
                    name: name.to_string(),
                    status: SectionStatus::NotFound {
                        reason: e.to_string(),
                    },
                    anchor: None,
                    method: None,
                    outcomes: Vec::new(),
                });
                return;
            }
        };

        let outcomes = if edits.deletes_row() {
            self.delete_row(doc, name, &located, edits, report)
        } else {
            self.apply_intents(doc, name, &located, edits, report)
        };

        report.sections.push(SectionReport {
            name: name.to_string(),
            status: SectionStatus::Done,
            anchor: located.anchor,
            method: Some(located.method),
            outcomes,
        });
    }

    /// Row deletion overrides every other intent in the section.
    fn delete_row(
        &self,
        doc: &mut Document,
        name: &str,
        located: &Located,
        edits: &SectionEdits,
        report: &mut RunReport,
    ) -> Vec<IntentOutcome> {
        let applier = EditApplier::new(&self.config.matching, &self.options);
        let row_intent = edits
            .intents
            .iter()
            .position(|e| matches!(e.intent, EditIntent::DeleteRow))
            .unwrap_or(edits.intents.len());

        let edit = SectionEdit::new(EditIntent::DeleteRow);
        let status = record_result(
            applier.apply(doc, name, located, &edit),
            name,
            &edit.intent,
            report,
        );

        let mut outcomes = Vec::with_capacity(edits.intents.len() + 1);
        for (index, edit) in edits.intents.iter().enumerate() {
            if index == row_intent {
                outcomes.push(outcome(index, &edit.intent, status.clone()));
            } else {
                report.stats.add_skipped();
                outcomes.push(outcome(
                    index,
                    &edit.intent,
                    OutcomeStatus::Skipped {
                        reason: "row deleted".to_string(),
                    },
                ));
            }
        }
        if row_intent == edits.intents.len() {
            outcomes.push(outcome(row_intent, &edit.intent, status));
        }
        outcomes
    }

    fn apply_intents(
        &self,
        doc: &mut Document,
        name: &str,
        located: &Located,
        edits: &SectionEdits,
        report: &mut RunReport,
    ) -> Vec<IntentOutcome> {
        let applier = EditApplier::new(&self.config.matching, &self.options);
        let mut located = located.clone();
        let mut replaced: Vec<(String, String)> = Vec::new();
        let mut outcomes = Vec::with_capacity(edits.intents.len());

        for (index, raw) in edits.intents.iter().enumerate() {
            let intent = match raw.intent.validate() {
                Ok(intent) => intent,
                Err(e) => {
                    log::warn!("Section {} intent {}: {}", name, index, e);
                    report.stats.add_malformed();
                    outcomes.push(outcome(
                        index,
                        &raw.intent,
                        OutcomeStatus::Failed {
                            reason: e.to_string(),
                        },
                    ));
                    continue;
                }
            };

            if intent.is_deletion() && already_replaced(&intent, &replaced) {
                log::debug!("Section {} intent {}: target was replaced, skipping", name, index);
                report.stats.add_skipped();
                outcomes.push(outcome(
                    index,
                    &intent,
                    OutcomeStatus::Skipped {
                        reason: "target text was already replaced".to_string(),
                    },
                ));
                continue;
            }

            let edit = SectionEdit {
                intent,
                cell: raw.cell,
            };
            let mut result = applier.apply(doc, name, &located, &edit);

            let retry_target = match &result {
                Err(Error::IntentUnresolved { target })
                    if edit.intent.is_deletion()
                        && self.options.replacement_retry
                        && !replaced.is_empty() =>
                {
                    Some(rewrite(target, &replaced)).filter(|rewritten| rewritten != target)
                }
                _ => None,
            };
            if let Some(rewritten) = retry_target {
                log::debug!("Retrying deletion as {:?}", rewritten);
                let retry = SectionEdit {
                    intent: edit.intent.retarget(rewritten),
                    cell: edit.cell,
                };
                result = applier.apply(doc, name, &located, &retry);
            }

            if let (Ok(_), EditIntent::ReplaceText { original, replacement }) = (&result, &edit.intent) {
                replaced.push((original.clone(), replacement.clone()));
            }

            if let Ok(record) = &result {
                located.rebase(&record.shifts);
            }

            let status = record_result(result, name, &edit.intent, report);
            outcomes.push(outcome(index, &edit.intent, status));
        }

        outcomes
    }
}

fn already_replaced(intent: &EditIntent, replaced: &[(String, String)]) -> bool {
    let Some(target) = intent.target() else {
        return false;
    };
    let target = normalize_text(target).to_lowercase();
    replaced
        .iter()
        .any(|(original, _)| normalize_text(original).to_lowercase() == target)
}

fn record_result(
    result: Result<ChangeRecord>,
    section: &str,
    intent: &EditIntent,
    report: &mut RunReport,
) -> OutcomeStatus {
    match result {
        Ok(record) => {
            let strategy = record.strategy;
            report.stats.add_change(&record);
            report.changes.push(record);
            OutcomeStatus::Applied { strategy }
        }
        Err(e) => {
            log::warn!("Section {} {}: {}", section, intent.name(), e);
            report.stats.add_failure();
            OutcomeStatus::Failed {
                reason: e.to_string(),
            }
        }
    }
}

fn outcome(index: usize, intent: &EditIntent, status: OutcomeStatus) -> IntentOutcome {
    IntentOutcome {
        index,
        kind: intent.name().to_string(),
        status,
    }
}
