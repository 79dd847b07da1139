//! Web search via the Serper API.
//!
//! Each call returns at most [`MAX_RESULTS_PER_QUERY`] resources. Callers in
//! the pipeline treat a failed search as zero results for that query.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::json;

use crate::config::{Credentials, Settings};
use crate::error::{CurateError, Result};
use crate::model::Resource;

/// Serper search endpoint.
const API_URL: &str = "https://google.serper.dev/search";

/// Hits kept from each search response.
pub const MAX_RESULTS_PER_QUERY: usize = 5;

/// Anything that can turn a keyword query into ranked resources.
pub trait SearchProvider: Send + Sync {
    /// Run `query` and return up to five resources tagged with the query.
    fn search(&self, query: &str) -> Result<Vec<Resource>>;

    /// Get the name of this provider (for logging/debugging).
    fn name(&self) -> &str;
}

/// Serper (Google results) search client.
pub struct SerperClient {
    client: Client,
    api_key: String,
    language: String,
    num: usize,
}

impl SerperClient {
    /// Create a client with default language (`es`), `num` (10) and timeout (10s).
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_options(api_key, "es", 10, Duration::from_secs(10))
    }

    /// Create a client from validated credentials and run settings.
    pub fn from_settings(credentials: &Credentials, settings: &Settings) -> Result<Self> {
        Self::with_options(
            credentials.serper_api_key.clone(),
            settings.search_language.clone(),
            settings.max_search_results,
            settings.search_timeout,
        )
    }

    pub fn with_options(
        api_key: impl Into<String>,
        language: impl Into<String>,
        num: usize,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CurateError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            language: language.into(),
            num,
        })
    }

    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "X-API-KEY",
            HeaderValue::from_str(&self.api_key)
                .map_err(|e| CurateError::Config(format!("Invalid API key: {}", e)))?,
        );
        Ok(headers)
    }
}

impl SearchProvider for SerperClient {
    fn search(&self, query: &str) -> Result<Vec<Resource>> {
        let body = json!({
            "q": query,
            "gl": self.language,
            "hl": self.language,
            "num": self.num
        });

        let response = self
            .client
            .post(API_URL)
            .headers(self.build_headers()?)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    CurateError::Search(format!("'{}' timed out", query))
                } else {
                    CurateError::Search(format!("'{}' request failed: {}", query, e))
                }
            })?;

        if !response.status().is_success() {
            return Err(CurateError::Search(format!(
                "'{}' returned HTTP {}",
                query,
                response.status().as_u16()
            )));
        }

        let parsed: SerperResponse = response
            .json()
            .map_err(|e| CurateError::Search(format!("'{}' returned invalid JSON: {}", query, e)))?;

        Ok(parsed.into_resources(query))
    }

    fn name(&self) -> &str {
        "serper"
    }
}

/// Serper response; only organic results are used.
#[derive(Debug, Default, Deserialize)]
pub struct SerperResponse {
    #[serde(default)]
    organic: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
    #[serde(default)]
    link: Option<String>,
}

impl SerperResponse {
    /// Keep the first five organic hits that carry a title and a link.
    pub fn into_resources(self, query: &str) -> Vec<Resource> {
        self.organic
            .into_iter()
            .take(MAX_RESULTS_PER_QUERY)
            .filter_map(|item| {
                let title = item.title.filter(|t| !t.trim().is_empty())?;
                let link = item.link.filter(|l| !l.trim().is_empty())?;
                Some(Resource::new(
                    title.trim(),
                    link.trim(),
                    item.snippet.unwrap_or_default().trim(),
                    query,
                ))
            })
            .collect()
    }
}

/// In-memory search provider for tests and offline runs.
///
/// Queries without a registered outcome return no results.
#[derive(Default)]
pub struct MockSearch {
    results: HashMap<String, Vec<(String, String, String)>>,
    failures: HashMap<String, u16>,
    queries: Mutex<Vec<String>>,
}

impl MockSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `(title, url, snippet)` hits for `query`.
    pub fn with_results<I, T, U, S>(mut self, query: impl Into<String>, hits: I) -> Self
    where
        I: IntoIterator<Item = (T, U, S)>,
        T: Into<String>,
        U: Into<String>,
        S: Into<String>,
    {
        self.results.insert(
            query.into(),
            hits.into_iter()
                .map(|(t, u, s)| (t.into(), u.into(), s.into()))
                .collect(),
        );
        self
    }

    /// Make `query` fail as if the provider answered with `status`.
    pub fn with_failure(mut self, query: impl Into<String>, status: u16) -> Self {
        self.failures.insert(query.into(), status);
        self
    }

    /// Queries received so far, in order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }
}

impl SearchProvider for MockSearch {
    fn search(&self, query: &str) -> Result<Vec<Resource>> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.to_string());
        }

        if let Some(status) = self.failures.get(query) {
            return Err(CurateError::Search(format!("'{}' returned HTTP {}", query, status)));
        }

        Ok(self
            .results
            .get(query)
            .map(|hits| {
                hits.iter()
                    .take(MAX_RESULTS_PER_QUERY)
                    .map(|(t, u, s)| Resource::new(t.as_str(), u.as_str(), s.as_str(), query))
                    .collect()
            })
            .unwrap_or_default())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_first_five() {
        let organic: Vec<_> = (0..8)
            .map(|i| {
                json!({
                    "title": format!("Result {}", i),
                    "link": format!("https://site{}.com/", i),
                    "snippet": "text"
                })
            })
            .collect();
        let raw = json!({ "organic": organic, "searchParameters": {"q": "x"} });
        let parsed: SerperResponse = serde_json::from_value(raw).unwrap();
        let resources = parsed.into_resources("rust tutorial");

        assert_eq!(resources.len(), 5);
        assert_eq!(resources[0].title, "Result 0");
        assert_eq!(resources[4].url, "https://site4.com/");
        assert!(resources.iter().all(|r| r.source_query == "rust tutorial"));
    }

    #[test]
    fn test_parse_skips_items_without_title_or_link() {
        let raw = json!({
            "organic": [
                {"title": "ok", "link": "https://a.com"},
                {"title": "", "link": "https://b.com"},
                {"title": "no link"},
                {"link": "https://c.com", "snippet": "no title"}
            ]
        });
        let parsed: SerperResponse = serde_json::from_value(raw).unwrap();
        let resources = parsed.into_resources("q");
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].snippet, "");
    }

    #[test]
    fn test_parse_missing_organic() {
        let parsed: SerperResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.into_resources("q").is_empty());
    }

    #[test]
    fn test_mock_search_outcomes() {
        let search = MockSearch::new()
            .with_results("a", vec![("T", "https://t.com", "s")])
            .with_failure("b", 500);

        assert_eq!(search.search("a").unwrap().len(), 1);
        let err = search.search("b").unwrap_err();
        assert!(err.to_string().contains("HTTP 500"));
        assert!(search.search("c").unwrap().is_empty());
        assert_eq!(search.queries(), vec!["a", "b", "c"]);
    }
}
