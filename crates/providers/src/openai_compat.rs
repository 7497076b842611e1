//! OpenAI-compatible adapter.
//!
//! Works with Groq (the default upstream), OpenAI, Ollama, vLLM, LM Studio,
//! Together, and any other endpoint that follows the chat completions
//! contract.

use crate::traits::{ChatRequest, ChatResponse, LlmProvider};
use crate::util::{from_reqwest, join_url, resolve_api_key};
use nx_domain::capability::LlmCapabilities;
use nx_domain::chat::ChatTurn;
use nx_domain::config::LlmConfig;
use nx_domain::error::{Error, Result};
use nx_domain::stream::{BoxStream, StreamEvent};
use nx_domain::trace::TraceEvent;
use serde_json::Value;
use std::time::{Duration, Instant};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Adapter struct
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// An LLM provider adapter for any OpenAI-compatible API endpoint.
pub struct OpenAiCompatProvider {
    id: String,
    base_url: String,
    api_key: String,
    model: String,
    top_p: f32,
    presence_penalty: Option<f32>,
    capabilities: LlmCapabilities,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    /// Create a new provider from the `[llm]` config section.
    ///
    /// Fails with [`Error::Auth`] when no credential can be resolved; the
    /// gateway treats that as "provider not configured".
    pub fn from_config(cfg: &LlmConfig) -> Result<Self> {
        let api_key = resolve_api_key(&cfg.auth)?;

        let capabilities = LlmCapabilities {
            supports_json_mode: true,
            roles: cfg.roles,
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(from_reqwest)?;

        Ok(Self {
            id: cfg.id.clone(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: cfg.model.clone(),
            top_p: cfg.top_p,
            presence_penalty: cfg.presence_penalty,
            capabilities,
            client,
        })
    }

    // ── Internal: build authenticated request builder ──────────────

    fn authed_post(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .post(url)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
    }

    fn chat_url(&self) -> String {
        join_url(&self.base_url, "chat/completions")
    }

    // ── Internal: build the JSON body ─────────────────────────────

    fn build_chat_body(&self, req: &ChatRequest, stream: bool) -> Value {
        let messages: Vec<Value> = req.messages.iter().map(turn_to_openai).collect();

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "stream": stream,
            "top_p": req.top_p.unwrap_or(self.top_p),
        });

        if let Some(temp) = req.temperature {
            body["temperature"] = serde_json::json!(temp);
        }
        if let Some(max) = req.max_tokens {
            body["max_tokens"] = serde_json::json!(max);
        }
        if let Some(penalty) = req.presence_penalty.or(self.presence_penalty) {
            body["presence_penalty"] = serde_json::json!(penalty);
        }
        if req.json_mode && self.capabilities.supports_json_mode {
            body["response_format"] = serde_json::json!({"type": "json_object"});
        }
        body
    }

    fn trace(&self, streaming: bool, status: u16, started: Instant) {
        TraceEvent::LlmRequest {
            provider: self.id.clone(),
            model: self.model.clone(),
            streaming,
            status,
            duration_ms: started.elapsed().as_millis() as u64,
        }
        .emit();
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Wire helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn turn_to_openai(turn: &ChatTurn) -> Value {
    serde_json::json!({
        "role": turn.role.as_str(),
        "content": turn.content,
    })
}

fn parse_chat_response(provider: &str, body: &Value) -> Result<ChatResponse> {
    let choice = body
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|a| a.first())
        .ok_or_else(|| Error::Provider {
            provider: provider.into(),
            message: "no choices in response".into(),
        })?;

    let message = choice.get("message").ok_or_else(|| Error::Provider {
        provider: provider.into(),
        message: "no message in choice".into(),
    })?;

    let content = message
        .get("content")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    let finish_reason = choice
        .get("finish_reason")
        .and_then(|v| v.as_str())
        .map(String::from);

    let model = body
        .get("model")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown")
        .to_string();

    Ok(ChatResponse {
        content,
        model,
        finish_reason,
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trait implementation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[async_trait::async_trait]
impl LlmProvider for OpenAiCompatProvider {
    async fn chat(&self, req: &ChatRequest) -> Result<ChatResponse> {
        let url = self.chat_url();
        let body = self.build_chat_body(req, false);
        let started = Instant::now();

        tracing::debug!(provider = %self.id, url = %url, turns = req.messages.len(), "chat request");

        let resp = match self.authed_post(&url).json(&body).send().await {
            Ok(resp) => resp,
            Err(e) => {
                self.trace(false, 0, started);
                return Err(from_reqwest(e));
            }
        };

        let status = resp.status();
        let resp_text = resp.text().await.map_err(from_reqwest)?;
        self.trace(false, status.as_u16(), started);

        if !status.is_success() {
            return Err(Error::Provider {
                provider: self.id.clone(),
                message: format!("HTTP {} - {}", status.as_u16(), resp_text),
            });
        }

        let resp_json: Value = serde_json::from_str(&resp_text)?;
        parse_chat_response(&self.id, &resp_json)
    }

    async fn chat_stream(
        &self,
        req: &ChatRequest,
    ) -> Result<BoxStream<'static, Result<StreamEvent>>> {
        let url = self.chat_url();
        let body = self.build_chat_body(req, true);
        let started = Instant::now();

        tracing::debug!(provider = %self.id, url = %url, turns = req.messages.len(), "stream request");

        let resp = match self.authed_post(&url).json(&body).send().await {
            Ok(resp) => resp,
            Err(e) => {
                self.trace(true, 0, started);
                return Err(from_reqwest(e));
            }
        };

        let status = resp.status();
        self.trace(true, status.as_u16(), started);

        if !status.is_success() {
            let err_text = resp.text().await.map_err(from_reqwest)?;
            return Err(Error::Provider {
                provider: self.id.clone(),
                message: format!("HTTP {} - {}", status.as_u16(), err_text),
            });
        }

        Ok(crate::sse::response_stream(resp))
    }

    fn capabilities(&self) -> &LlmCapabilities {
        &self.capabilities
    }

    fn provider_id(&self) -> &str {
        &self.id
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
