//! Web-search collaborator used for live context.

use crate::util::{from_reqwest, join_url, resolve_api_key};
use nx_domain::config::SearchConfig;
use nx_domain::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One ranked search hit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub url: String,
}

#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    /// Run `query` and return at most `max_results` hits, best first.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>>;

    fn provider_id(&self) -> &str;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tavily
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct TavilySearch {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

impl TavilySearch {
    /// Fails with [`Error::Auth`] when no credential is available; live
    /// search is then simply disabled.
    pub fn from_config(cfg: &SearchConfig) -> Result<Self> {
        let api_key = resolve_api_key(&cfg.auth)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(from_reqwest)?;
        Ok(Self {
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }
}

#[async_trait::async_trait]
impl SearchProvider for TavilySearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        let url = join_url(&self.base_url, "search");
        let body = serde_json::json!({
            "api_key": self.api_key,
            "query": query,
            "max_results": max_results,
        });

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(from_reqwest)?;

        let status = resp.status();
        let text = resp.text().await.map_err(from_reqwest)?;
        if !status.is_success() {
            return Err(Error::Search(format!("HTTP {} - {}", status.as_u16(), text)));
        }

        let parsed: TavilyResponse = serde_json::from_str(&text)?;
        let mut results = parsed.results;
        results.truncate(max_results);
        Ok(results)
    }

    fn provider_id(&self) -> &str {
        "tavily"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_fields_default_when_missing() {
        let r: SearchResult = serde_json::from_str(r#"{"title":"Only title"}"#).unwrap();
        assert_eq!(r.title, "Only title");
        assert!(r.content.is_empty());
        assert!(r.url.is_empty());
    }

    #[test]
    fn response_without_results_is_empty() {
        let r: TavilyResponse = serde_json::from_str(r#"{"query":"x"}"#).unwrap();
        assert!(r.results.is_empty());
    }
}
