//! Stub collaborators shared by the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use marketscout::llm::ChatModel;
use marketscout::search::DocumentSearch;
use marketscout::types::{ChatMessage, Document};
use marketscout::{Pipeline, PipelineConfig, ServiceError};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Chat stub answering by the kind of request it receives
pub struct StubChat {
    pub industry_reply: Mutex<String>,
    pub relevant_titles: HashSet<String>,
    pub report_text: Option<String>,
    pub classification_calls: AtomicUsize,
    pub generation_calls: AtomicUsize,
    pub generation_requests: Mutex<Vec<Vec<ChatMessage>>>,
    pub relevance_calls: AtomicUsize,
    /// 1-based relevance call that fails with HTTP 502; 0 never fails
    pub relevance_fail_at: AtomicUsize,
}

impl StubChat {
    pub fn new(industry_reply: &str, relevant_titles: &[&str], report_text: Option<&str>) -> Arc<Self> {
        Arc::new(StubChat {
            industry_reply: Mutex::new(industry_reply.to_string()),
            relevant_titles: relevant_titles.iter().map(|t| t.to_string()).collect(),
            report_text: report_text.map(str::to_string),
            classification_calls: AtomicUsize::new(0),
            generation_calls: AtomicUsize::new(0),
            generation_requests: Mutex::new(Vec::new()),
            relevance_calls: AtomicUsize::new(0),
            relevance_fail_at: AtomicUsize::new(0),
        })
    }

    pub fn fail_relevance_call(&self, n: usize) {
        self.relevance_fail_at.store(n, Ordering::SeqCst);
    }

    pub fn set_industry_reply(&self, reply: &str) {
        *self.industry_reply.lock().unwrap() = reply.to_string();
    }

    pub fn classification_calls(&self) -> usize {
        self.classification_calls.load(Ordering::SeqCst)
    }

    pub fn generation_calls(&self) -> usize {
        self.generation_calls.load(Ordering::SeqCst)
    }
}

/// Title quoted in a relevance prompt
fn quoted_title(prompt: &str) -> Option<&str> {
    let start = prompt.find("titled '")? + "titled '".len();
    let end = prompt[start..].find("' relevant")? + start;
    Some(&prompt[start..end])
}

#[async_trait]
impl ChatModel for StubChat {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ServiceError> {
        let system = &messages[0].content;
        let user = &messages[messages.len() - 1].content;

        if system.contains("validation assistant") {
            self.classification_calls.fetch_add(1, Ordering::SeqCst);
            return Ok(self.industry_reply.lock().unwrap().clone());
        }

        if system.contains("relevance checker") {
            self.classification_calls.fetch_add(1, Ordering::SeqCst);
            let n = self.relevance_calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n == self.relevance_fail_at.load(Ordering::SeqCst) {
                return Err(ServiceError::Status {
                    code: 502,
                    body: "bad gateway".to_string(),
                });
            }
            let relevant = quoted_title(user).is_some_and(|t| self.relevant_titles.contains(t));
            return Ok(if relevant { "YES" } else { "NO" }.to_string());
        }

        self.generation_calls.fetch_add(1, Ordering::SeqCst);
        self.generation_requests.lock().unwrap().push(messages.to_vec());
        self.report_text.clone().ok_or(ServiceError::Status {
            code: 503,
            body: "generation unavailable".to_string(),
        })
    }

    fn model(&self) -> &str {
        "stub-chat"
    }
}

/// Search stub returning a fixed candidate pool
pub struct StubSearch {
    pub documents: Vec<Document>,
    pub fail: bool,
    pub calls: AtomicUsize,
    pub requests: Mutex<Vec<(String, usize, usize)>>,
}

impl StubSearch {
    pub fn new(documents: Vec<Document>) -> Arc<Self> {
        Arc::new(StubSearch {
            documents,
            fail: false,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(StubSearch {
            documents: Vec::new(),
            fail: true,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentSearch for StubSearch {
    async fn search(
        &self,
        query: &str,
        top_k: usize,
        max_chars: usize,
    ) -> Result<Vec<Document>, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push((query.to_string(), top_k, max_chars));
        if self.fail {
            return Err(ServiceError::Status {
                code: 500,
                body: "search backend down".to_string(),
            });
        }
        Ok(self.documents.iter().take(top_k).cloned().collect())
    }
}

/// Ten candidate pages titled `Page 0` .. `Page 9`
pub fn candidate_pool() -> Vec<Document> {
    (0..10)
        .map(|i| {
            Document::new(
                format!("Page {}", i),
                format!("Content of page {}.", i),
                format!("https://en.wikipedia.org/wiki/Page_{}", i),
            )
        })
        .collect()
}

pub fn pipeline(chat: &Arc<StubChat>, search: &Arc<StubSearch>) -> Pipeline {
    Pipeline::new(
        Some(chat.clone() as Arc<dyn ChatModel>),
        search.clone() as Arc<dyn DocumentSearch>,
        PipelineConfig::default(),
    )
    .unwrap()
}

pub fn words(n: usize) -> String {
    vec!["word"; n].join(" ")
}
