//! Synthesized market report and its word-budget check

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Count words by whitespace splitting
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Generated report, returned in full even when over budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub industry: String,
    pub text: String,
    pub word_count: usize,
    pub within_budget: bool,
    /// Ceiling the report was checked against
    pub budget: usize,
    pub generated_at: DateTime<Utc>,
}

impl Report {
    /// Build a report, deriving word count and budget compliance from `text`
    pub fn new(industry: impl Into<String>, text: impl Into<String>, budget: usize) -> Self {
        let text = text.into();
        let word_count = count_words(&text);
        Report {
            industry: industry.into(),
            within_budget: word_count <= budget,
            word_count,
            text,
            budget,
            generated_at: Utc::now(),
        }
    }

    /// Soft-violation message when the report exceeds its budget
    pub fn budget_warning(&self) -> Option<String> {
        if self.within_budget {
            None
        } else {
            Some(format!(
                "Report exceeds {} words ({} words).",
                self.budget, self.word_count
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_within_budget_boundary() {
        let exact = Report::new("Healthcare", vec!["word"; 500].join(" "), 500);
        assert_eq!(exact.word_count, 500);
        assert!(exact.within_budget);
        assert!(exact.budget_warning().is_none());

        let over = Report::new("Healthcare", vec!["word"; 501].join(" "), 500);
        assert!(!over.within_budget);
        assert_eq!(
            over.budget_warning().as_deref(),
            Some("Report exceeds 500 words (501 words).")
        );
    }

    #[test]
    fn test_count_words_mixed_whitespace() {
        assert_eq!(count_words("  Overview\n\nKey\tPlayers  "), 3);
        assert_eq!(count_words(""), 0);
    }

    #[quickcheck]
    fn prop_word_count_matches_text(text: String, budget: usize) -> bool {
        let report = Report::new("Any", text, budget);
        report.word_count == count_words(&report.text)
            && report.within_budget == (report.word_count <= budget)
    }
}
