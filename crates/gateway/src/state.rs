use std::sync::Arc;

use nx_domain::config::Config;
use nx_prompting::LiveSearchTrigger;
use nx_providers::{LlmProvider, SearchProvider};

/// Shared application state passed to all API handlers.
///
/// Everything is immutable after startup; handlers only clone `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// `None` when no LLM credential is configured. Chat endpoints then
    /// answer in-band with a configuration error.
    pub llm: Option<Arc<dyn LlmProvider>>,
    /// `None` when no search credential is configured; live search is
    /// skipped entirely.
    pub search: Option<Arc<dyn SearchProvider>>,
    /// Compiled once at startup.
    pub live_trigger: Arc<LiveSearchTrigger>,
}
