//! `POST /api/memory/extract`: never an HTTP error, worst case the
//! current memory comes back unchanged.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use nx_domain::chat::ChatTurn;
use nx_domain::memory::UserMemory;
use nx_memory::{ExtractionOutcome, MemoryExtractor};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    #[serde(default)]
    pub messages: Vec<ChatTurn>,
    #[serde(default)]
    pub current_memory: Option<UserMemory>,
}

pub async fn extract(
    State(state): State<AppState>,
    Json(body): Json<ExtractRequest>,
) -> Json<ExtractionOutcome> {
    let current = body.current_memory.unwrap_or_default();

    let Some(provider) = state.llm.as_deref() else {
        tracing::warn!("memory extraction skipped: LLM provider not configured");
        return Json(ExtractionOutcome::unchanged(current));
    };

    let outcome = MemoryExtractor::new(provider, &state.config.memory)
        .extract(&body.messages, current)
        .await;
    Json(outcome)
}
