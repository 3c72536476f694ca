//! Stage 2: fetch candidate documents and keep the relevant ones
//!
//! # Early-stopping relevance filter
//!
//! ```text
//! candidates ← search(industry, top_k = max_candidates, max_chars)
//! accepted ← []
//! for c in candidates (retrieval order):
//!     if classify(c.title, industry) starts with YES: accepted.push(c)
//!     if |accepted| = quota: stop
//! ```
//!
//! Classifier calls: at least `min(quota, |candidates|)`, at most
//! `|candidates|`. The loop is sequential because the stop condition
//! depends on the count accepted so far.

use crate::classifier::RelevanceClassifier;
use crate::config::Limits;
use crate::errors::{PipelineError, Result, ServiceError};
use crate::pipeline::validator::MISSING_CREDENTIAL;
use crate::search::{truncate_chars, DocumentSearch};
use crate::types::{Document, DocumentSet};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Outcome of one retrieval run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Retrieval {
    pub documents: DocumentSet,
    /// Size of the candidate pool returned by search
    pub candidates_fetched: usize,
    /// Candidates that went through the classifier before stopping
    pub candidates_evaluated: usize,
}

impl Retrieval {
    pub fn is_under_quota(&self) -> bool {
        self.documents.is_under_quota()
    }
}

/// Quota-bounded, relevance-filtered document retrieval
pub struct DocumentRetriever {
    search: Arc<dyn DocumentSearch>,
    classifier: Option<Arc<RelevanceClassifier>>,
    limits: Limits,
    timeout: Duration,
}

impl DocumentRetriever {
    pub fn new(
        search: Arc<dyn DocumentSearch>,
        classifier: Option<Arc<RelevanceClassifier>>,
        limits: Limits,
        timeout: Duration,
    ) -> Self {
        DocumentRetriever {
            search,
            classifier,
            limits,
            timeout,
        }
    }

    /// Retrieve up to `quota` relevant documents for `industry`
    ///
    /// An empty or under-quota set is a success. A search failure is
    /// surfaced immediately with no partial set.
    pub async fn retrieve(&self, industry: &str) -> Result<Retrieval> {
        let classifier = self
            .classifier
            .as_ref()
            .ok_or_else(|| PipelineError::Config(MISSING_CREDENTIAL.to_string()))?;

        let candidates = self.fetch_candidates(industry).await?;
        let candidates_fetched = candidates.len();

        let mut documents = DocumentSet::with_quota(self.limits.quota);
        let mut candidates_evaluated = 0;

        for candidate in candidates {
            if documents.is_full() {
                break;
            }

            candidates_evaluated += 1;
            if classifier.is_relevant(&candidate.title, industry).await? {
                documents.push(candidate);
            }
        }

        tracing::info!(
            industry,
            accepted = documents.len(),
            quota = self.limits.quota,
            fetched = candidates_fetched,
            evaluated = candidates_evaluated,
            "retrieval finished"
        );
        if documents.is_under_quota() {
            tracing::warn!(
                industry,
                accepted = documents.len(),
                quota = self.limits.quota,
                "document set under quota"
            );
        }

        Ok(Retrieval {
            documents,
            candidates_fetched,
            candidates_evaluated,
        })
    }

    async fn fetch_candidates(&self, industry: &str) -> Result<Vec<Document>> {
        let limits = &self.limits;
        let search = self
            .search
            .search(industry, limits.max_candidates, limits.max_content_chars);

        let candidates = tokio::time::timeout(self.timeout, search)
            .await
            .unwrap_or(Err(ServiceError::Timeout(self.timeout)))
            .map_err(|e| PipelineError::Retrieval(e.to_string()))?;

        // Enforce the bounds even if the collaborator overshoots them
        Ok(candidates
            .into_iter()
            .take(limits.max_candidates)
            .map(|mut doc| {
                if doc.content.chars().count() > limits.max_content_chars {
                    doc.content = truncate_chars(&doc.content, limits.max_content_chars).to_string();
                }
                doc
            })
            .collect())
    }
}
