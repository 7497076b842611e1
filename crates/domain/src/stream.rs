use serde::Serialize;
use std::pin::Pin;

/// A boxed async stream, used for LLM streaming responses.
pub type BoxStream<'a, T> = Pin<Box<dyn futures_core::Stream<Item = T> + Send + 'a>>;

/// Events emitted while decoding a provider's streaming response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum StreamEvent {
    /// An incremental content delta.
    #[serde(rename = "token")]
    Token { text: String },

    /// The provider signalled end-of-stream.
    #[serde(rename = "done")]
    Done { finish_reason: Option<String> },
}
