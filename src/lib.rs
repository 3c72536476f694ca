//! MarketScout - Market Research Assistant
//!
//! Turns a free-text industry description into a short, source-grounded
//! market report in three stages:
//!
//! 1. **Validate**: a classification call confirms the input names an industry
//! 2. **Retrieve**: Wikipedia candidates are filtered for relevance, stopping
//!    early once the quota is met
//! 3. **Generate**: one bounded generation call writes a four-section report,
//!    checked afterwards against the word budget
//!
//! [`pipeline::PipelineState`] sequences the stages; the caller owns it.

pub mod classifier;
pub mod config;
pub mod errors;
pub mod export;
pub mod llm;
pub mod pipeline;
pub mod search;
pub mod types;

// Re-export commonly used types
pub use errors::{PipelineError, Result, ServiceError};
pub use pipeline::{Pipeline, PipelineConfig, PipelineState, StageReport};

// Terminal front end
pub mod cli;
pub mod repl;
