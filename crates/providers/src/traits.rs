use nx_domain::capability::LlmCapabilities;
use nx_domain::chat::ChatTurn;
use nx_domain::error::Result;
use nx_domain::stream::{BoxStream, StreamEvent};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Request / Response types
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A provider-agnostic chat completion request.
///
/// `messages` is expected to be already shaped for the target provider
/// (see [`LlmProvider::shape_turns`]).
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    /// The conversation turns to send.
    pub messages: Vec<ChatTurn>,
    /// Sampling temperature (0.0 – 2.0). `None` lets the provider choose.
    pub temperature: Option<f32>,
    /// Maximum tokens in the response. `None` lets the provider choose.
    pub max_tokens: Option<u32>,
    /// Nucleus sampling. `None` falls back to the provider's configured value.
    pub top_p: Option<f32>,
    pub presence_penalty: Option<f32>,
    /// When `true`, request the model to respond with valid JSON only.
    pub json_mode: bool,
}

/// A provider-agnostic chat completion response.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    /// Textual content of the response.
    pub content: String,
    /// The model that actually produced the response.
    pub model: String,
    /// The reason the model stopped generating (e.g. "stop", "length").
    pub finish_reason: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Core provider trait
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Trait that every LLM adapter must implement.
///
/// The relay talks to exactly one upstream, but everything above this seam
/// (prompting, memory, the gateway handlers) only sees the trait, so tests
/// can drive the whole pipeline with a scripted implementation.
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a chat completion request and wait for the full response.
    async fn chat(&self, req: &ChatRequest) -> Result<ChatResponse>;

    /// Send a chat completion request and return a stream of events.
    ///
    /// The returned stream owns the upstream connection; dropping it early
    /// releases the connection.
    async fn chat_stream(
        &self,
        req: &ChatRequest,
    ) -> Result<BoxStream<'static, Result<StreamEvent>>>;

    /// The advertised capabilities of this provider/model combination.
    fn capabilities(&self) -> &LlmCapabilities;

    /// A unique identifier for this provider instance.
    fn provider_id(&self) -> &str;

    /// Adapt an assembled turn list to this provider's role conventions.
    fn shape_turns(&self, turns: Vec<ChatTurn>) -> Vec<ChatTurn> {
        crate::shaping::shape_turns(turns, &self.capabilities().roles)
    }
}
