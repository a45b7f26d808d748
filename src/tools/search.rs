//! Web Search Tool
//!
//! Two interchangeable backends:
//! - **Serper** (default): POST `https://google.serper.dev/search`, results under `organic`
//! - **SerpAPI**: Google engine via the SerpAPI client, results under `organic_results`
//!
//! Only title and snippet of the first few organic results are kept.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serpapi_search_rust::serp_api_search::SerpApiSearch;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::SearchConfig;
use crate::tools::Tool;

const SERPER_ENDPOINT: &str = "https://google.serper.dev/search";
const NO_RESULTS: &str = "No useful search results found.";

/// Errors that can occur during search operations
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search API key not configured")]
    NoApiKey,

    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("failed to parse search results: {0}")]
    ParseError(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub snippet: String,
}

enum Backend {
    Serper { client: Client, endpoint: String },
    SerpApi,
}

pub struct SearchTool {
    backend: Backend,
    api_key: String,
    max_results: usize,
}

impl SearchTool {
    pub fn serper(api_key: impl Into<String>) -> Self {
        Self {
            backend: Backend::Serper {
                client: Client::new(),
                endpoint: SERPER_ENDPOINT.to_string(),
            },
            api_key: api_key.into(),
            max_results: 4,
        }
    }

    pub fn serpapi(api_key: impl Into<String>) -> Self {
        Self {
            backend: Backend::SerpApi,
            api_key: api_key.into(),
            max_results: 4,
        }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        let tool = match config.provider.as_str() {
            "serpapi" => Self::serpapi(config.serpapi_key.clone()),
            "serper" => Self::serper(config.serper_api_key.clone()),
            other => {
                warn!(provider = %other, "Unknown search provider, falling back to Serper");
                Self::serper(config.serper_api_key.clone())
            }
        };
        tool.with_max_results(config.max_results)
    }

    /// Set maximum results kept per search
    pub fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    /// Point the Serper backend at another URL
    pub fn with_endpoint(mut self, url: impl Into<String>) -> Self {
        if let Backend::Serper { endpoint, .. } = &mut self.backend {
            *endpoint = url.into();
        }
        self
    }

    pub async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        if self.api_key.is_empty() {
            return Err(SearchError::NoApiKey);
        }

        info!(query = %query, "Running web search");

        let (body, key) = match &self.backend {
            Backend::Serper { client, endpoint } => {
                let response = client
                    .post(endpoint)
                    .header("X-API-KEY", &self.api_key)
                    .json(&serde_json::json!({ "q": query }))
                    .send()
                    .await
                    .map_err(|e| SearchError::RequestFailed(e.to_string()))?;

                let body: serde_json::Value = response
                    .json()
                    .await
                    .map_err(|e| SearchError::ParseError(e.to_string()))?;
                (body, "organic")
            }
            Backend::SerpApi => {
                let mut params = HashMap::<String, String>::new();
                params.insert("q".to_string(), query.to_string());
                params.insert("hl".to_string(), "en".to_string());
                params.insert("num".to_string(), self.max_results.to_string());

                let search = SerpApiSearch::google(params, self.api_key.clone());
                let body = search
                    .json()
                    .await
                    .map_err(|e| SearchError::RequestFailed(e.to_string()))?;
                (body, "organic_results")
            }
        };

        debug!("Raw search response received");
        Ok(parse_organic(&body, key, self.max_results))
    }
}

fn parse_organic(body: &serde_json::Value, key: &str, max_results: usize) -> Vec<SearchHit> {
    let Some(results) = body.get(key).and_then(|v| v.as_array()) else {
        return Vec::new();
    };

    results
        .iter()
        .take(max_results)
        .map(|result| SearchHit {
            title: result
                .get("title")
                .and_then(|v| v.as_str())
                .unwrap_or("Untitled")
                .to_string(),
            snippet: result
                .get("snippet")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
        })
        .collect()
}

fn format_hits(hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return NO_RESULTS.to_string();
    }

    hits.iter()
        .map(|hit| format!("Title: {}\nSnippet: {}\n", hit.title, hit.snippet))
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl Tool for SearchTool {
    fn name(&self) -> &str {
        "Search the Internet"
    }

    fn description(&self) -> &str {
        "Useful to search the internet about a given topic and return relevant results. Input: a search query."
    }

    async fn call(&self, input: &str) -> String {
        match self.search(input.trim()).await {
            Ok(hits) => {
                info!(count = hits.len(), "Web search completed");
                format_hits(&hits)
            }
            Err(e) => {
                warn!(error = %e, "Web search failed");
                format!("Search failed: {}", e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[test]
    fn test_format_hits() {
        let hits = vec![
            SearchHit { title: "A".to_string(), snippet: "first".to_string() },
            SearchHit { title: "B".to_string(), snippet: "second".to_string() },
        ];
        assert_eq!(
            format_hits(&hits),
            "Title: A\nSnippet: first\n\nTitle: B\nSnippet: second\n"
        );
        assert_eq!(format_hits(&[]), NO_RESULTS);
    }

    #[test]
    fn test_parse_organic_caps_results() {
        let body = serde_json::json!({
            "organic": (0..10).map(|i| serde_json::json!({"title": format!("t{i}"), "snippet": "s"})).collect::<Vec<_>>()
        });
        let hits = parse_organic(&body, "organic", 4);
        assert_eq!(hits.len(), 4);
        assert_eq!(hits[3].title, "t3");
        assert!(parse_organic(&serde_json::json!({}), "organic", 4).is_empty());
    }

    #[tokio::test]
    async fn test_serper_search() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/search")
            .match_header("x-api-key", "serper-key")
            .match_body(Matcher::Json(serde_json::json!({"q": "ACME revenue 2024"})))
            .with_header("content-type", "application/json")
            .with_body(r#"{"organic":[{"title":"ACME results","snippet":"Revenue grew 12%","link":"https://x"}]}"#)
            .create_async()
            .await;

        let tool = SearchTool::serper("serper-key").with_endpoint(format!("{}/search", server.url()));
        let output = tool.call("ACME revenue 2024").await;

        mock.assert_async().await;
        assert_eq!(output, "Title: ACME results\nSnippet: Revenue grew 12%\n");
    }

    #[tokio::test]
    async fn test_search_without_key_reports_failure() {
        let output = SearchTool::serper("").call("anything").await;
        assert_eq!(output, "Search failed: search API key not configured");
    }

    #[tokio::test]
    async fn test_malformed_response_reports_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/search")
            .with_status(500)
            .with_body("upstream exploded")
            .create_async()
            .await;

        let tool = SearchTool::serper("k").with_endpoint(format!("{}/search", server.url()));
        assert!(tool.call("q").await.starts_with("Search failed:"));
    }
}
