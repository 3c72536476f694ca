//! Relevance classifier
//!
//! Wraps a [`ChatModel`] to answer yes/no membership questions: whether
//! raw input names an industry, and whether a document belongs to one.
//! Every question is exactly one chat call, bounded by a per-call timeout.

pub mod parser;

use crate::errors::{PipelineError, Result, ServiceError};
use crate::llm::ChatModel;
use crate::types::ChatMessage;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub use parser::{is_affirmative, parse_verdict, ProtocolError, Verdict};

const INDUSTRY_SYSTEM_PROMPT: &str = "You are a validation assistant.
Determine whether the user input is a real industry/business sector.
Reply with ONLY 'YES' or 'NO' followed by a colon with a brief reason.
Example: 'YES: Healthcare is a recognised industry.'
Example: 'NO: \"blue\" is a color, not an industry.'";

const RELEVANCE_SYSTEM_PROMPT: &str = "You are a relevance checker.
Determine if a Wikipedia page is relevant to the given industry.
Reply with ONLY 'YES' or 'NO'.";

/// Yes/no classifier backed by a chat collaborator
pub struct RelevanceClassifier {
    model: Arc<dyn ChatModel>,
    timeout: Duration,
    calls: AtomicUsize,
}

impl RelevanceClassifier {
    pub fn new(model: Arc<dyn ChatModel>, timeout: Duration) -> Self {
        RelevanceClassifier {
            model,
            timeout,
            calls: AtomicUsize::new(0),
        }
    }

    /// Ask whether `text` names a real industry or business sector
    ///
    /// A reply that fits neither verdict shape is a
    /// [`PipelineError::ClassifierProtocol`] failure.
    pub async fn is_industry(&self, text: &str) -> Result<Verdict> {
        let messages = [
            ChatMessage::system(INDUSTRY_SYSTEM_PROMPT),
            ChatMessage::user(format!("Is this a real industry? '{}'", text)),
        ];

        let reply = self.ask(&messages).await?;
        let verdict = parse_verdict(&reply).map_err(|e| {
            tracing::warn!(error = %e, "unparseable industry verdict");
            PipelineError::ClassifierProtocol(e.to_string())
        })?;

        tracing::debug!(input = text, valid = verdict.valid, "industry verdict");
        Ok(verdict)
    }

    /// Ask whether the document titled `title` is relevant to `industry`
    ///
    /// Only a reply starting with `YES` counts as relevant.
    pub async fn is_relevant(&self, title: &str, industry: &str) -> Result<bool> {
        let messages = [
            ChatMessage::system(RELEVANCE_SYSTEM_PROMPT),
            ChatMessage::user(format!(
                "Is the Wikipedia page titled '{}' relevant to the '{}' industry?",
                title, industry
            )),
        ];

        let reply = self.ask(&messages).await?;
        let relevant = is_affirmative(&reply);

        tracing::debug!(title, industry, relevant, "relevance verdict");
        Ok(relevant)
    }

    /// Number of classification calls issued so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    pub fn model(&self) -> &str {
        self.model.model()
    }

    async fn ask(&self, messages: &[ChatMessage]) -> Result<String> {
        self.calls.fetch_add(1, Ordering::Relaxed);

        let outcome = tokio::time::timeout(self.timeout, self.model.complete(messages))
            .await
            .unwrap_or(Err(ServiceError::Timeout(self.timeout)));

        outcome.map_err(|e| match e {
            ServiceError::Timeout(_) => PipelineError::ClassifierProtocol(e.to_string()),
            ServiceError::MissingCredential => PipelineError::Config(e.to_string()),
            other => PipelineError::Classifier(other.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ScriptedModel {
        replies: Mutex<Vec<std::result::Result<String, ServiceError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedModel {
        fn new(replies: Vec<std::result::Result<String, ServiceError>>) -> Arc<Self> {
            let mut replies = replies;
            replies.reverse();
            Arc::new(ScriptedModel {
                replies: Mutex::new(replies),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        async fn complete(
            &self,
            messages: &[ChatMessage],
        ) -> std::result::Result<String, ServiceError> {
            self.prompts
                .lock()
                .unwrap()
                .push(messages.last().map(|m| m.content.clone()).unwrap_or_default());
            self.replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or(Err(ServiceError::EmptyResponse))
        }

        fn model(&self) -> &str {
            "scripted"
        }
    }

    struct SlowModel;

    #[async_trait]
    impl ChatModel for SlowModel {
        async fn complete(&self, _: &[ChatMessage]) -> std::result::Result<String, ServiceError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("YES".to_string())
        }

        fn model(&self) -> &str {
            "slow"
        }
    }

    #[tokio::test]
    async fn test_is_industry_plain_reply() {
        let model = ScriptedModel::new(vec![Ok("YES: Healthcare is a recognised industry.".into())]);
        let classifier = RelevanceClassifier::new(model.clone(), Duration::from_secs(5));

        let verdict = classifier.is_industry("Healthcare").await.unwrap();
        assert!(verdict.valid);
        assert_eq!(classifier.calls(), 1);
        assert!(model.prompts.lock().unwrap()[0].contains("'Healthcare'"));
    }

    #[tokio::test]
    async fn test_is_industry_garbled_reply() {
        let model = ScriptedModel::new(vec![Ok("hmm, hard to say".into())]);
        let classifier = RelevanceClassifier::new(model, Duration::from_secs(5));

        let err = classifier.is_industry("Healthcare").await.unwrap_err();
        assert!(matches!(err, PipelineError::ClassifierProtocol(_)));
    }

    #[tokio::test]
    async fn test_is_relevant_treats_ambiguity_as_no() {
        let model = ScriptedModel::new(vec![
            Ok("yes".into()),
            Ok("It might be relevant".into()),
            Ok("NO".into()),
        ]);
        let classifier = RelevanceClassifier::new(model, Duration::from_secs(5));

        assert!(classifier.is_relevant("Hospital", "Healthcare").await.unwrap());
        assert!(!classifier.is_relevant("Pharmacy", "Healthcare").await.unwrap());
        assert!(!classifier.is_relevant("Football", "Healthcare").await.unwrap());
        assert_eq!(classifier.calls(), 3);
    }

    #[tokio::test]
    async fn test_service_failure_maps_to_classifier_error() {
        let model = ScriptedModel::new(vec![Err(ServiceError::Status {
            code: 500,
            body: "boom".into(),
        })]);
        let classifier = RelevanceClassifier::new(model, Duration::from_secs(5));

        let err = classifier.is_relevant("Hospital", "Healthcare").await.unwrap_err();
        assert!(matches!(err, PipelineError::Classifier(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_surfaces_as_protocol_error() {
        let classifier = RelevanceClassifier::new(Arc::new(SlowModel), Duration::from_secs(1));

        let err = classifier.is_industry("Healthcare").await.unwrap_err();
        assert!(matches!(err, PipelineError::ClassifierProtocol(_)));
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_blocking_use_from_sync_context() {
        let model = ScriptedModel::new(vec![Ok("NO: a color".into())]);
        let classifier = RelevanceClassifier::new(model, Duration::from_secs(5));

        let verdict = tokio_test::block_on(classifier.is_industry("blue")).unwrap();
        assert!(!verdict.valid);
        assert_eq!(verdict.reason, "a color");
    }
}
