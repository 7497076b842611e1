//! Scripted in-process provider and search backends shared by the gateway
//! integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use nx_domain::capability::{LlmCapabilities, RoleConventions};
use nx_domain::config::Config;
use nx_domain::error::{Error, Result};
use nx_domain::stream::{BoxStream, StreamEvent};
use nx_gateway::state::AppState;
use nx_prompting::LiveSearchTrigger;
use nx_providers::sse::delta_stream;
use nx_providers::{ChatRequest, ChatResponse, LlmProvider, SearchProvider, SearchResult};

// ── LLM ────────────────────────────────────────────────────────────

/// Answers `chat` with a fixed reply and `chat_stream` by pushing raw SSE
/// lines through the real frame decoder. Every request is recorded.
pub struct ScriptedLlm {
    reply: String,
    frames: Vec<String>,
    failure: Option<String>,
    caps: LlmCapabilities,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedLlm {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: reply.into(),
            frames: Vec::new(),
            failure: None,
            caps: LlmCapabilities::default(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn streaming(frames: &[&str]) -> Self {
        Self {
            frames: frames.iter().map(|f| f.to_string()).collect(),
            ..Self::replying("")
        }
    }

    /// Every call fails the way a non-2xx upstream does.
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::replying("")
        }
    }

    pub fn with_roles(mut self, roles: RoleConventions) -> Self {
        self.caps.roles = roles;
        self
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> ChatRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request recorded")
    }

    fn record(&self, req: &ChatRequest) -> Result<()> {
        self.requests.lock().unwrap().push(req.clone());
        match &self.failure {
            Some(message) => Err(Error::Provider {
                provider: "scripted".into(),
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl LlmProvider for ScriptedLlm {
    async fn chat(&self, req: &ChatRequest) -> Result<ChatResponse> {
        self.record(req)?;
        Ok(ChatResponse {
            content: self.reply.clone(),
            model: "scripted".into(),
            finish_reason: Some("stop".into()),
        })
    }

    async fn chat_stream(
        &self,
        req: &ChatRequest,
    ) -> Result<BoxStream<'static, Result<StreamEvent>>> {
        self.record(req)?;
        let chunks: Vec<Result<Vec<u8>>> = self
            .frames
            .iter()
            .map(|f| Ok(format!("{f}\n\n").into_bytes()))
            .collect();
        Ok(delta_stream(futures_util::stream::iter(chunks)))
    }

    fn capabilities(&self) -> &LlmCapabilities {
        &self.caps
    }

    fn provider_id(&self) -> &str {
        "scripted"
    }
}

// ── Search ─────────────────────────────────────────────────────────

pub struct CannedSearch {
    results: Vec<SearchResult>,
    calls: AtomicUsize,
}

impl CannedSearch {
    pub fn new(titles: &[&str]) -> Self {
        Self {
            results: titles
                .iter()
                .map(|t| SearchResult {
                    title: t.to_string(),
                    content: format!("{t} details"),
                    url: format!("https://news.example/{}", t.to_lowercase().replace(' ', "-")),
                })
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl SearchProvider for CannedSearch {
    async fn search(&self, _query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.results.iter().take(max_results).cloned().collect())
    }

    fn provider_id(&self) -> &str {
        "canned"
    }
}

// ── State ──────────────────────────────────────────────────────────

/// Default config with pacing off so streams finish immediately.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.stream.pace_ms = 0;
    config
}

pub fn state(llm: Option<Arc<ScriptedLlm>>, search: Option<Arc<CannedSearch>>) -> AppState {
    AppState {
        config: Arc::new(test_config()),
        llm: llm.map(|l| l as Arc<dyn LlmProvider>),
        search: search.map(|s| s as Arc<dyn SearchProvider>),
        live_trigger: Arc::new(LiveSearchTrigger::new().unwrap()),
    }
}
