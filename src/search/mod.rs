//! Document search collaborator
//!
//! The retriever only depends on [`DocumentSearch`]; [`WikipediaSearch`]
//! is the HTTP implementation backed by the MediaWiki Action API.

pub mod wikipedia;

use crate::errors::ServiceError;
use crate::types::Document;
use async_trait::async_trait;

pub use wikipedia::WikipediaSearch;

/// A service returning ranked documents for a topic query
#[async_trait]
pub trait DocumentSearch: Send + Sync {
    /// Return at most `top_k` documents in rank order, each with content of
    /// at most `max_chars` characters
    async fn search(
        &self,
        query: &str,
        top_k: usize,
        max_chars: usize,
    ) -> Result<Vec<Document>, ServiceError>;
}

/// Truncate to at most `max_chars` characters without splitting a code point
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
