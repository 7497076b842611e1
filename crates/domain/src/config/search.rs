use serde::{Deserialize, Serialize};

use super::AuthConfig;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Live web search
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Web-search collaborator used to inject live context in default mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "d_search_url")]
    pub base_url: String,
    #[serde(default = "d_search_auth")]
    pub auth: AuthConfig,
    /// Results requested per search. Clamped to `1..=5`.
    #[serde(default = "d_3")]
    pub max_results: usize,
    /// Characters of each result's content kept in the prompt.
    #[serde(default = "d_200")]
    pub content_chars: usize,
    #[serde(default = "d_15000")]
    pub timeout_ms: u64,
}

impl SearchConfig {
    pub const MAX_RESULTS_CAP: usize = 5;

    /// `max_results` clamped to the supported range.
    pub fn effective_max_results(&self) -> usize {
        self.max_results.clamp(1, Self::MAX_RESULTS_CAP)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: d_search_url(),
            auth: d_search_auth(),
            max_results: 3,
            content_chars: 200,
            timeout_ms: 15_000,
        }
    }
}

fn d_search_url() -> String {
    "https://api.tavily.com".into()
}
fn d_search_auth() -> AuthConfig {
    AuthConfig::from_env("TAVILY_API_KEY")
}
fn d_3() -> usize {
    3
}
fn d_200() -> usize {
    200
}
fn d_15000() -> u64 {
    15_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_results_is_clamped() {
        let mut cfg = SearchConfig::default();
        assert_eq!(cfg.effective_max_results(), 3);
        cfg.max_results = 12;
        assert_eq!(cfg.effective_max_results(), 5);
        cfg.max_results = 0;
        assert_eq!(cfg.effective_max_results(), 1);
    }
}
