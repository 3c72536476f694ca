//! Wikipedia search via the MediaWiki Action API
//!
//! One `list=search` request ranks titles, then one `prop=extracts` request
//! per title fetches plain-text content and the canonical URL.

use crate::errors::ServiceError;
use crate::search::{truncate_chars, DocumentSearch};
use crate::types::Document;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// Default API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://en.wikipedia.org/w/api.php";

const USER_AGENT: &str = concat!("marketscout/", env!("CARGO_PKG_VERSION"));

/// Wikipedia-backed document search
#[derive(Debug, Clone)]
pub struct WikipediaSearch {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl WikipediaSearch {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn get<T: DeserializeOwned>(&self, params: &[(&str, &str)]) -> Result<T, ServiceError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("format", "json"), ("formatversion", "2")])
            .query(params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ServiceError::Timeout(self.timeout)
                } else {
                    ServiceError::Http(e)
                }
            })?;

        if !response.status().is_success() {
            let code = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ServiceError::Status { code, body });
        }

        response
            .json()
            .await
            .map_err(|e| ServiceError::Decode(e.to_string()))
    }

    async fn search_titles(&self, query: &str, top_k: usize) -> Result<Vec<String>, ServiceError> {
        let limit = top_k.to_string();
        let body: SearchResponse = self
            .get(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", query),
                ("srlimit", limit.as_str()),
                ("srprop", ""),
            ])
            .await?;

        body.ranked_titles(top_k)
    }

    async fn fetch_page(&self, title: &str, max_chars: usize) -> Result<Option<Document>, ServiceError> {
        let body: PageResponse = self
            .get(&[
                ("action", "query"),
                ("prop", "extracts|info"),
                ("explaintext", "1"),
                ("inprop", "url"),
                ("redirects", "1"),
                ("titles", title),
            ])
            .await?;

        Ok(body
            .query
            .and_then(|q| q.pages.into_iter().find(|page| !page.missing))
            .map(|page| page.into_document(&self.endpoint, max_chars)))
    }
}

#[async_trait]
impl DocumentSearch for WikipediaSearch {
    async fn search(
        &self,
        query: &str,
        top_k: usize,
        max_chars: usize,
    ) -> Result<Vec<Document>, ServiceError> {
        let titles = self.search_titles(query, top_k).await?;
        tracing::debug!(query, hits = titles.len(), "wikipedia search");

        let mut documents = Vec::with_capacity(titles.len());
        for title in &titles {
            if let Some(document) = self.fetch_page(title, max_chars).await? {
                documents.push(document);
            }
        }

        Ok(documents)
    }
}

/// Article URL derived from the API endpoint when `fullurl` is absent
fn fallback_url(endpoint: &str, title: &str) -> String {
    let base = endpoint.trim_end_matches("/w/api.php");
    format!("{}/wiki/{}", base, title.replace(' ', "_"))
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    query: Option<SearchQuery>,
    error: Option<ApiError>,
}

impl SearchResponse {
    /// Titles in search-rank order, at most `top_k`
    fn ranked_titles(self, top_k: usize) -> Result<Vec<String>, ServiceError> {
        if let Some(error) = self.error {
            return Err(ServiceError::Decode(format!("{}: {}", error.code, error.info)));
        }

        Ok(self
            .query
            .map(|q| q.search.into_iter().map(|hit| hit.title).take(top_k).collect())
            .unwrap_or_default())
    }
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    info: String,
}

#[derive(Debug, Deserialize)]
struct PageResponse {
    query: Option<PageQuery>,
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    #[serde(default)]
    pages: Vec<Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    title: String,
    #[serde(default)]
    extract: String,
    fullurl: Option<String>,
    #[serde(default)]
    missing: bool,
}

impl Page {
    fn into_document(self, endpoint: &str, max_chars: usize) -> Document {
        let source_url = self
            .fullurl
            .unwrap_or_else(|| fallback_url(endpoint, &self.title));
        let content = truncate_chars(&self.extract, max_chars).to_string();
        Document::new(self.title, content, source_url)
    }
}
