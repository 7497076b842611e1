use serde::{Deserialize, Serialize};

use crate::capability::RoleConventions;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Credentials
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Where to find an API credential.
///
/// Resolution order: `key` (plaintext, warned about), then `env`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Environment variable holding the key.
    #[serde(default)]
    pub env: Option<String>,
    /// Inline key. Prefer `env`.
    #[serde(default)]
    pub key: Option<String>,
}

impl AuthConfig {
    pub fn from_env(var: impl Into<String>) -> Self {
        Self {
            env: Some(var.into()),
            key: None,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// LLM provider
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The single OpenAI-compatible chat-completions upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Identifier used in logs and error messages.
    #[serde(default = "d_provider_id")]
    pub id: String,
    #[serde(default = "d_llm_url")]
    pub base_url: String,
    #[serde(default = "d_model")]
    pub model: String,
    #[serde(default = "d_llm_auth")]
    pub auth: AuthConfig,
    /// Request timeout. Covers the whole streamed body.
    #[serde(default = "d_60000")]
    pub timeout_ms: u64,
    #[serde(default = "d_top_p")]
    pub top_p: f32,
    #[serde(default = "d_presence")]
    pub presence_penalty: Option<f32>,
    #[serde(default)]
    pub roles: RoleConventions,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            id: d_provider_id(),
            base_url: d_llm_url(),
            model: d_model(),
            auth: d_llm_auth(),
            timeout_ms: 60_000,
            top_p: d_top_p(),
            presence_penalty: d_presence(),
            roles: RoleConventions::default(),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Memory extraction
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Number of most recent turns shown to the extractor.
    #[serde(default = "d_window")]
    pub window: usize,
    #[serde(default = "d_500")]
    pub max_tokens: u32,
    #[serde(default = "d_extract_temp")]
    pub temperature: f32,
    /// Ask the provider for a JSON-object response format. The parser
    /// copes with free text either way.
    #[serde(default)]
    pub json_mode: bool,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            window: d_window(),
            max_tokens: 500,
            temperature: d_extract_temp(),
            json_mode: false,
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_provider_id() -> String {
    "groq".into()
}
fn d_llm_url() -> String {
    "https://api.groq.com/openai/v1".into()
}
fn d_model() -> String {
    "llama-3.1-8b-instant".into()
}
fn d_llm_auth() -> AuthConfig {
    AuthConfig::from_env("GROQ_API_KEY")
}
fn d_60000() -> u64 {
    60_000
}
fn d_top_p() -> f32 {
    0.9
}
fn d_presence() -> Option<f32> {
    Some(0.1)
}
fn d_window() -> usize {
    10
}
fn d_500() -> u32 {
    500
}
fn d_extract_temp() -> f32 {
    0.2
}
