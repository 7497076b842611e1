pub mod markdown;
pub mod openai_compat;
pub mod search;
pub mod shaping;
pub mod sse;
pub mod traits;
pub(crate) mod util;

// Re-exports for convenience.
pub use openai_compat::OpenAiCompatProvider;
pub use search::{SearchProvider, SearchResult, TavilySearch};
pub use traits::{ChatRequest, ChatResponse, LlmProvider};
pub use util::resolve_api_key;
