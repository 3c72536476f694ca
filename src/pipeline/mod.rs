//! Report pipeline
//!
//! Three stages sequenced by [`PipelineState`]:
//! 1. [`IndustryValidator`] - accept raw input as an industry name
//! 2. [`DocumentRetriever`] - fetch and relevance-filter reference documents
//! 3. [`ReportSynthesizer`] - generate a word-budgeted report
//!
//! [`Pipeline`] owns the collaborators; the caller owns the state and passes
//! it to every stage call.

pub mod retriever;
pub mod state;
pub mod synthesizer;
pub mod validator;

pub use retriever::{DocumentRetriever, Retrieval};
pub use state::PipelineState;
pub use synthesizer::ReportSynthesizer;
pub use validator::{IndustryValidator, MISSING_CREDENTIAL};

use crate::classifier::RelevanceClassifier;
use crate::config::{Config, Limits};
use crate::errors::{PipelineError, Result};
use crate::llm::{ChatModel, OpenAiClient};
use crate::search::{DocumentSearch, WikipediaSearch};
use crate::types::{Report, ValidatedIndustry};
use std::sync::Arc;
use std::time::Duration;

/// Stage result for the caller: payload, status line, optional soft warning
#[derive(Debug, Clone, PartialEq)]
pub struct StageReport<T> {
    pub payload: T,
    pub status: String,
    /// Soft violation (under quota, over budget, rejection); not an error
    pub warning: Option<String>,
}

/// Pipeline configuration
#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
    pub limits: Limits,

    /// Upper bound on any single collaborator call
    pub request_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            request_timeout: Duration::from_secs(60),
        }
    }
}

impl From<&Config> for PipelineConfig {
    fn from(config: &Config) -> Self {
        Self {
            limits: config.limits,
            request_timeout: config.timeouts.request_timeout(),
        }
    }
}

/// Stage coordinator
pub struct Pipeline {
    validator: IndustryValidator,
    retriever: DocumentRetriever,
    synthesizer: ReportSynthesizer,
    classifier: Option<Arc<RelevanceClassifier>>,
}

impl Pipeline {
    /// Create pipeline from collaborators
    ///
    /// `model` is `None` when no credential is available; every stage then
    /// fails with [`PipelineError::Config`]. Limits the filter cannot honour
    /// are rejected here.
    pub fn new(
        model: Option<Arc<dyn ChatModel>>,
        search: Arc<dyn DocumentSearch>,
        config: PipelineConfig,
    ) -> Result<Self> {
        config
            .limits
            .validate()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let classifier = model
            .clone()
            .map(|m| Arc::new(RelevanceClassifier::new(m, config.request_timeout)));

        Ok(Self {
            validator: IndustryValidator::new(classifier.clone()),
            retriever: DocumentRetriever::new(
                search,
                classifier.clone(),
                config.limits,
                config.request_timeout,
            ),
            synthesizer: ReportSynthesizer::new(model, config.limits, config.request_timeout),
            classifier,
        })
    }

    /// Build the HTTP-backed pipeline from the config file and an API key
    pub fn from_config(config: &Config, api_key: Option<&str>) -> Result<Self> {
        let timeout = config.timeouts.request_timeout();

        let model: Option<Arc<dyn ChatModel>> = match api_key {
            Some(key) => {
                let client = OpenAiClient::with_config(
                    &config.llm.base_url,
                    key,
                    &config.llm.model,
                    config.llm.temperature,
                    timeout,
                )
                .map_err(|e| PipelineError::Config(e.to_string()))?;
                Some(Arc::new(client) as Arc<dyn ChatModel>)
            }
            None => None,
        };

        let search = WikipediaSearch::new(&config.search_endpoint(), timeout)
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        Self::new(model, Arc::new(search), PipelineConfig::from(config))
    }

    /// Whether a chat collaborator is configured
    pub fn is_configured(&self) -> bool {
        self.classifier.is_some()
    }

    /// Credential check that precedes every other rule in every stage
    fn ensure_configured(&self) -> Result<()> {
        if self.is_configured() {
            Ok(())
        } else {
            Err(PipelineError::Config(MISSING_CREDENTIAL.to_string()))
        }
    }

    /// Classification calls issued over the pipeline's lifetime
    pub fn classifier_calls(&self) -> usize {
        self.classifier.as_ref().map_or(0, |c| c.calls())
    }

    /// Stage 1: validate `text` as the industry to research
    ///
    /// Any attempt that gets past the credential check discards previously
    /// retrieved documents and reports. On acceptance the state becomes
    /// `Validated`; on rejection or failure it stays `Idle`.
    pub async fn validate(
        &self,
        state: &mut PipelineState,
        text: &str,
    ) -> Result<StageReport<ValidatedIndustry>> {
        self.ensure_configured()?;

        state.reset();
        let industry = self.validator.validate(text).await?;

        if industry.valid {
            let status = format!("Industry accepted: {}", industry.reason);
            tracing::info!(industry = %industry.name, "industry accepted");
            state.advance_validated(industry.clone())?;
            Ok(StageReport {
                payload: industry,
                status,
                warning: None,
            })
        } else {
            let status = format!("Not recognised as an industry: {}", industry.reason);
            tracing::info!(input = text.trim(), "industry rejected");
            Ok(StageReport {
                payload: industry,
                status,
                warning: Some("Please update your industry input and try again".to_string()),
            })
        }
    }

    /// Stage 2: retrieve relevant documents for the validated industry
    ///
    /// An empty set still advances to `Retrieved`; `generate` will refuse it.
    pub async fn retrieve(&self, state: &mut PipelineState) -> Result<StageReport<Retrieval>> {
        self.ensure_configured()?;

        let industry = state
            .industry()
            .map(|i| i.name.clone())
            .ok_or_else(|| PipelineError::InvalidTransition {
                from: state.name().to_string(),
                to: "Retrieved".to_string(),
                reason: "Incomplete Step 1: Industry Validation".to_string(),
            })?;

        let retrieval = self.retriever.retrieve(&industry).await?;
        state.advance_retrieved(retrieval.documents.clone())?;

        let found = retrieval.documents.len();
        let quota = retrieval.documents.quota();
        let (status, warning) = if found == 0 {
            (
                "No relevant Wikipedia pages were found.".to_string(),
                Some("Please try a different industry.".to_string()),
            )
        } else if retrieval.is_under_quota() {
            (
                format!("Here are the {} most relevant Wikipedia pages:", found),
                Some(format!(
                    "Only {}/{} relevant pages found. The following report may be less comprehensive.",
                    found, quota
                )),
            )
        } else {
            (
                format!("Here are the {} most relevant Wikipedia pages:", found),
                None,
            )
        };

        Ok(StageReport {
            payload: retrieval,
            status,
            warning,
        })
    }

    /// Stage 3: generate the report from the retrieved documents
    ///
    /// May be called again from `Reported` to regenerate from the same set.
    pub async fn generate(&self, state: &mut PipelineState) -> Result<StageReport<Report>> {
        self.ensure_configured()?;

        let (industry, documents) = match &*state {
            PipelineState::Retrieved(industry, documents)
            | PipelineState::Reported(industry, documents, _) => (industry.name.clone(), documents),
            other => {
                return Err(PipelineError::InvalidTransition {
                    from: other.name().to_string(),
                    to: "Reported".to_string(),
                    reason: "Incomplete Step 2: Document Retrieval".to_string(),
                })
            }
        };

        let report = self.synthesizer.synthesize(&industry, documents).await?;
        let status = format!("Word count: {}/{}", report.word_count, report.budget);
        let warning = report.budget_warning();
        state.advance_reported(report.clone())?;

        Ok(StageReport {
            payload: report,
            status,
            warning,
        })
    }
}
