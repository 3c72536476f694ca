//! Type definitions module
//!
//! Data carried between pipeline stages and exchanged with collaborators.

pub mod document;
pub mod industry;
pub mod messages;
pub mod report;

// Re-export commonly used types
pub use document::{Document, DocumentSet};
pub use industry::ValidatedIndustry;
pub use messages::{ChatMessage, Role};
pub use report::{count_words, Report};
