//! Pipeline state machine
//!
//! ```text
//! Idle      --validate(ok, valid)-->  Validated
//! Validated --retrieve(ok)-->         Retrieved
//! Retrieved --generate(ok, docs>0)--> Reported
//! Retrieved --retrieve(ok)-->         Retrieved   (fresh documents)
//! Reported  --retrieve(ok)-->         Retrieved   (report dropped)
//! Reported  --generate(ok)-->         Reported    (regenerated)
//! *         --validate-->             Idle, then Validated on acceptance
//! ```
//!
//! Each state carries everything the next stage needs, so documents and
//! reports can never outlive the industry they were produced for.

use crate::errors::{PipelineError, Result};
use crate::types::{DocumentSet, Report, ValidatedIndustry};
use serde::Serialize;

/// Current stage and the outputs gathered so far
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", content = "data")]
pub enum PipelineState {
    #[default]
    Idle,
    Validated(ValidatedIndustry),
    Retrieved(ValidatedIndustry, DocumentSet),
    Reported(ValidatedIndustry, DocumentSet, Report),
}

impl PipelineState {
    pub fn new() -> Self {
        PipelineState::Idle
    }

    /// Variant name, for logs and errors
    pub fn name(&self) -> &'static str {
        match self {
            PipelineState::Idle => "Idle",
            PipelineState::Validated(..) => "Validated",
            PipelineState::Retrieved(..) => "Retrieved",
            PipelineState::Reported(..) => "Reported",
        }
    }

    /// Human-readable state name
    pub fn display_name(&self) -> &'static str {
        match self {
            PipelineState::Idle => "Waiting for an industry",
            PipelineState::Validated(..) => "Industry validated",
            PipelineState::Retrieved(..) => "Documents retrieved",
            PipelineState::Reported(..) => "Report ready",
        }
    }

    pub fn industry(&self) -> Option<&ValidatedIndustry> {
        match self {
            PipelineState::Idle => None,
            PipelineState::Validated(industry)
            | PipelineState::Retrieved(industry, _)
            | PipelineState::Reported(industry, _, _) => Some(industry),
        }
    }

    pub fn documents(&self) -> Option<&DocumentSet> {
        match self {
            PipelineState::Retrieved(_, documents) | PipelineState::Reported(_, documents, _) => {
                Some(documents)
            }
            _ => None,
        }
    }

    pub fn report(&self) -> Option<&Report> {
        match self {
            PipelineState::Reported(_, _, report) => Some(report),
            _ => None,
        }
    }

    pub fn can_retrieve(&self) -> bool {
        self.industry().is_some()
    }

    pub fn can_generate(&self) -> bool {
        self.documents().is_some_and(|docs| !docs.is_empty())
    }

    /// Drop everything and return to `Idle`
    pub fn reset(&mut self) {
        self.set(PipelineState::Idle);
    }

    /// Enter `Validated`; only accepted industries may be held
    pub(crate) fn advance_validated(&mut self, industry: ValidatedIndustry) -> Result<()> {
        if !industry.valid {
            return Err(self.invalid("Validated", "industry was not accepted"));
        }
        self.set(PipelineState::Validated(industry));
        Ok(())
    }

    /// Enter `Retrieved`, replacing any earlier documents and report
    pub(crate) fn advance_retrieved(&mut self, documents: DocumentSet) -> Result<()> {
        let industry = self
            .industry()
            .cloned()
            .ok_or_else(|| self.invalid("Retrieved", "Incomplete Step 1: Industry Validation"))?;
        self.set(PipelineState::Retrieved(industry, documents));
        Ok(())
    }

    /// Enter `Reported`, replacing any earlier report
    pub(crate) fn advance_reported(&mut self, report: Report) -> Result<()> {
        let from = self.name();
        let current = std::mem::take(self);
        match current {
            PipelineState::Retrieved(industry, documents)
            | PipelineState::Reported(industry, documents, _) => {
                if documents.is_empty() {
                    *self = PipelineState::Retrieved(industry, documents);
                    return Err(PipelineError::NoDocuments);
                }
                tracing::debug!("[state] {} -> Reported", from);
                *self = PipelineState::Reported(industry, documents, report);
                Ok(())
            }
            other => {
                *self = other;
                Err(self.invalid("Reported", "Incomplete Step 2: Document Retrieval"))
            }
        }
    }

    fn set(&mut self, next: PipelineState) {
        tracing::debug!("[state] {} -> {}", self.name(), next.name());
        *self = next;
    }

    fn invalid(&self, to: &str, reason: &str) -> PipelineError {
        PipelineError::InvalidTransition {
            from: self.name().to_string(),
            to: to.to_string(),
            reason: reason.to_string(),
        }
    }
}
