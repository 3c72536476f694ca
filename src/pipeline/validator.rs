//! Stage 1: accept or reject raw input as an industry name

use crate::classifier::RelevanceClassifier;
use crate::errors::{PipelineError, Result};
use crate::types::ValidatedIndustry;
use std::sync::Arc;

/// Message used whenever no chat collaborator is configured
pub const MISSING_CREDENTIAL: &str = "Missing OpenAI API key";

/// Validates free-text input with a single classification call
pub struct IndustryValidator {
    classifier: Option<Arc<RelevanceClassifier>>,
}

impl IndustryValidator {
    pub fn new(classifier: Option<Arc<RelevanceClassifier>>) -> Self {
        IndustryValidator { classifier }
    }

    /// Validate `text` as an industry name
    ///
    /// Checks, in order: a classifier is configured, the trimmed input is
    /// non-empty, then asks the classifier once. A rejection is a successful
    /// call with `valid == false`.
    pub async fn validate(&self, text: &str) -> Result<ValidatedIndustry> {
        let classifier = self
            .classifier
            .as_ref()
            .ok_or_else(|| PipelineError::Config(MISSING_CREDENTIAL.to_string()))?;

        let text = text.trim();
        if text.is_empty() {
            return Err(PipelineError::EmptyInput);
        }

        let verdict = classifier.is_industry(text).await?;

        let validated = if verdict.valid {
            ValidatedIndustry::accepted(text, verdict.reason).with_suggestion(verdict.industry)
        } else {
            ValidatedIndustry::rejected(verdict.reason)
        };

        Ok(validated)
    }
}
