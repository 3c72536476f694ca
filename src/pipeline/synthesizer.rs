//! Stage 3: generate a word-budgeted report from the document set

use crate::config::Limits;
use crate::errors::{PipelineError, Result, ServiceError};
use crate::llm::ChatModel;
use crate::pipeline::validator::MISSING_CREDENTIAL;
use crate::types::{ChatMessage, DocumentSet, Report};
use std::sync::Arc;
use std::time::Duration;

/// Fixed report sections, in order
pub const SECTIONS: [&str; 4] = ["Overview", "Key Players", "Market Trends", "Challenges"];

/// Produces one report per call from a single generation request
pub struct ReportSynthesizer {
    model: Option<Arc<dyn ChatModel>>,
    limits: Limits,
    timeout: Duration,
}

impl ReportSynthesizer {
    pub fn new(model: Option<Arc<dyn ChatModel>>, limits: Limits, timeout: Duration) -> Self {
        ReportSynthesizer {
            model,
            limits,
            timeout,
        }
    }

    /// Generate the report for `industry` from `documents`
    ///
    /// Overlong output is not corrected: the report is returned in full with
    /// `within_budget == false`.
    pub async fn synthesize(&self, industry: &str, documents: &DocumentSet) -> Result<Report> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| PipelineError::Config(MISSING_CREDENTIAL.to_string()))?;

        if documents.is_empty() {
            return Err(PipelineError::NoDocuments);
        }

        let messages = build_messages(industry, documents, &self.limits);

        let text = tokio::time::timeout(self.timeout, model.complete(&messages))
            .await
            .unwrap_or(Err(ServiceError::Timeout(self.timeout)))
            .map_err(|e| match e {
                ServiceError::MissingCredential => PipelineError::Config(e.to_string()),
                other => PipelineError::Generation(other.to_string()),
            })?;

        let report = Report::new(industry, text, self.limits.word_budget);

        tracing::info!(
            industry,
            words = report.word_count,
            budget = report.budget,
            "report generated"
        );
        if !report.within_budget {
            tracing::warn!(
                industry,
                words = report.word_count,
                budget = report.budget,
                "report over word budget"
            );
        }

        Ok(report)
    }
}

/// Build the single generation request
///
/// Documents are embedded as `Source: {title}\n{content}` blocks in set order.
pub fn build_messages(industry: &str, documents: &DocumentSet, limits: &Limits) -> Vec<ChatMessage> {
    let context = documents
        .iter()
        .map(|doc| format!("Source: {}\n{}", doc.title, doc.content))
        .collect::<Vec<_>>()
        .join("\n\n");

    let system = format!(
        "You are a professional market research analyst.
Generate a concise but COMPLETE industry report based ONLY on the provided Wikipedia sources.
The report must:
- Be a full, complete report; never cut off mid-sentence or leave sections incomplete
- Be STRICTLY under {budget} words; plan your response to fit within this limit
- Be structured with clear sections: {sections}
- Be written for a business analyst audience
- Only use information from the provided sources, no external knowledge
- Budget your words: ~{per_section} words per section to stay under {budget} words total",
        budget = limits.word_budget,
        sections = SECTIONS.join(", "),
        per_section = limits.section_word_target,
    );

    let user = format!(
        "Industry: {industry}\n\nWikipedia Sources:\n{context}\n\nWrite a complete, professional industry report under {budget} words.",
        industry = industry,
        context = context,
        budget = limits.word_budget,
    );

    vec![ChatMessage::system(system), ChatMessage::user(user)]
}
