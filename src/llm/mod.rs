//! Chat collaborator used for classification and report generation
//!
//! The pipeline only depends on [`ChatModel`]; [`OpenAiClient`] is the
//! HTTP implementation for OpenAI-compatible chat completion endpoints.

pub mod client;

use crate::errors::ServiceError;
use crate::types::ChatMessage;
use async_trait::async_trait;

pub use client::OpenAiClient;

/// A service that answers an ordered list of role-tagged messages with text
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send one request and return the reply text
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ServiceError>;

    /// Model identifier, for display and logs
    fn model(&self) -> &str;
}
