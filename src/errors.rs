//! Error types for MarketScout
//!
//! Each pipeline stage surfaces its own failure kind. Collaborator adapters
//! (chat service, document search) report the narrower [`ServiceError`],
//! which the stage that called them maps into a [`PipelineError`].

use std::time::Duration;
use thiserror::Error;

/// Main error type for the report pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Missing credential or collaborator; fatal for the whole pipeline
    #[error("Configuration error: {0}")]
    Config(String),

    /// Stage 1 input was empty or whitespace-only
    #[error("Please provide a valid industry to proceed")]
    EmptyInput,

    /// Collaborator answered, but not in a shape we can interpret
    #[error("Classifier protocol error: {0}")]
    ClassifierProtocol(String),

    /// Classification service could not be reached
    #[error("Classification service failed: {0}")]
    Classifier(String),

    /// Document search failed; no partial set is returned
    #[error("Document retrieval failed: {0}")]
    Retrieval(String),

    /// Report generation needs at least one document
    #[error("No relevant documents available; retrieve documents for a different industry first")]
    NoDocuments,

    /// Generation service failed
    #[error("Report generation failed: {0}")]
    Generation(String),

    /// Stage called out of order
    #[error("Invalid state transition from {from} to {to}: {reason}")]
    InvalidTransition {
        from: String,
        to: String,
        reason: String,
    },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Whether the caller can recover by changing input and retrying a stage
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PipelineError::EmptyInput
                | PipelineError::NoDocuments
                | PipelineError::ClassifierProtocol(_)
                | PipelineError::InvalidTransition { .. }
        )
    }
}

/// Failure reported by an external collaborator (chat or search service)
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Transport-level failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Service answered with a non-success status
    #[error("HTTP {code}: {body}")]
    Status { code: u16, body: String },

    /// Service answered with no usable content
    #[error("Empty response from service")]
    EmptyResponse,

    /// Response body did not match the expected schema
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Call exceeded the configured per-call timeout
    #[error("Operation timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// No credential configured for the service
    #[error("Missing API credential")]
    MissingCredential,
}

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
