//! Reference documents and the quota-bounded set built from them

use serde::{Deserialize, Serialize};

/// A fetched reference document; immutable once fetched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub content: String,
    pub source_url: String,
}

impl Document {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        source_url: impl Into<String>,
    ) -> Self {
        Document {
            title: title.into(),
            content: content.into(),
            source_url: source_url.into(),
        }
    }
}

/// Relevance-accepted documents in retrieval order
///
/// Never holds more than `quota` documents. Only the retriever pushes into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSet {
    documents: Vec<Document>,
    quota: usize,
}

impl DocumentSet {
    pub fn with_quota(quota: usize) -> Self {
        DocumentSet {
            documents: Vec::with_capacity(quota),
            quota,
        }
    }

    /// Append an accepted document; returns false once the quota is full
    pub(crate) fn push(&mut self, document: Document) -> bool {
        if self.is_full() {
            return false;
        }
        self.documents.push(document);
        true
    }

    pub fn is_full(&self) -> bool {
        self.documents.len() >= self.quota
    }

    /// Fewer documents than the quota were found
    pub fn is_under_quota(&self) -> bool {
        self.documents.len() < self.quota
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn quota(&self) -> usize {
        self.quota
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }
}

impl<'a> IntoIterator for &'a DocumentSet {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(n: usize) -> Document {
        Document::new(format!("Page {}", n), "content", format!("https://example.org/{}", n))
    }

    #[test]
    fn test_push_stops_at_quota() {
        let mut set = DocumentSet::with_quota(2);
        assert!(set.push(doc(1)));
        assert!(set.push(doc(2)));
        assert!(!set.push(doc(3)));
        assert_eq!(set.len(), 2);
        assert!(set.is_full());
        assert!(!set.is_under_quota());
    }

    #[test]
    fn test_under_quota_and_order() {
        let mut set = DocumentSet::with_quota(5);
        assert!(set.is_empty());
        set.push(doc(7));
        set.push(doc(3));
        assert!(set.is_under_quota());
        let titles: Vec<&str> = set.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["Page 7", "Page 3"]);
    }
}
