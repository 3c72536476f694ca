//! Outcome of industry validation

use serde::{Deserialize, Serialize};

/// Result of checking raw input against the classifier
///
/// `name` is empty whenever `valid` is false, and non-empty whenever it is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedIndustry {
    pub name: String,
    pub valid: bool,
    pub reason: String,
    /// Canonical name proposed by the classifier, kept for display only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_name: Option<String>,
}

impl ValidatedIndustry {
    /// Accepted industry; `name` must already be trimmed and non-empty
    pub fn accepted(name: impl Into<String>, reason: impl Into<String>) -> Self {
        let name = name.into();
        debug_assert!(!name.is_empty());
        ValidatedIndustry {
            name,
            valid: true,
            reason: reason.into(),
            suggested_name: None,
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        ValidatedIndustry {
            name: String::new(),
            valid: false,
            reason: reason.into(),
            suggested_name: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: Option<String>) -> Self {
        self.suggested_name = suggestion
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty() && *s != self.name);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_has_empty_name() {
        let rejected = ValidatedIndustry::rejected("\"blue\" is a color");
        assert!(!rejected.valid);
        assert!(rejected.name.is_empty());
    }

    #[test]
    fn test_suggestion_dropped_when_same_as_name() {
        let accepted = ValidatedIndustry::accepted("Healthcare", "recognised")
            .with_suggestion(Some(" Healthcare ".to_string()));
        assert!(accepted.suggested_name.is_none());

        let accepted = ValidatedIndustry::accepted("pharma", "recognised")
            .with_suggestion(Some("Pharmaceuticals".to_string()));
        assert_eq!(accepted.suggested_name.as_deref(), Some("Pharmaceuticals"));
    }
}
