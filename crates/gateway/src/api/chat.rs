//! Chat API endpoints.
//!
//! - `POST /api/chat/stream` — SSE: `mode_action?`, `word`*, `done` | `error`
//! - `POST /api/chat/simple` — one JSON body with the full reply
//!
//! Both always answer HTTP 200; failures travel in-band.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::State;
use axum::http::header::{self, HeaderName};
use axum::http::HeaderValue;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Json, Response};
use futures_util::stream;
use futures_util::StreamExt;
use serde::Deserialize;
use serde_json::{json, Value};

use nx_domain::chat::ChatTurn;
use nx_domain::memory::UserMemory;
use nx_domain::stream::BoxStream;
use nx_prompting::modes::DEFAULT_DISPLAY_NAME;

use crate::runtime::{prepare_turn, relay_frames, RelayFrame, TurnInput};
use crate::state::AppState;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Request shape
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Full conversation so far, oldest first.
    #[serde(default)]
    pub messages: Vec<ChatTurn>,
    #[serde(default = "d_user_name")]
    pub user_name: String,
    /// Opaque; echoed back by the simple endpoint.
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub user_memory: Option<UserMemory>,
    /// `learn`, `english`, `startup`; anything else means default.
    #[serde(default)]
    pub active_mode: Option<String>,
}

fn d_user_name() -> String {
    DEFAULT_DISPLAY_NAME.into()
}

impl ChatRequest {
    fn turn_input(&self) -> TurnInput<'_> {
        TurnInput {
            history: &self.messages,
            user_name: &self.user_name,
            memory: self.user_memory.as_ref(),
            active_mode: self.active_mode.as_deref(),
        }
    }
}

fn provider_missing(state: &AppState) -> String {
    match &state.config.llm.auth.env {
        Some(var) => format!("LLM provider not configured. Set {var} and restart."),
        None => "LLM provider not configured. Set an API key in [llm.auth] and restart.".into(),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POST /api/chat/stream (SSE)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn chat_stream(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Response {
    let frames = open_relay(&state, &body).await;
    let events = frames.map(|frame| Ok::<_, Infallible>(Event::default().data(frame.to_json())));

    (
        [
            (header::CACHE_CONTROL, HeaderValue::from_static("no-cache")),
            (
                HeaderName::from_static("x-accel-buffering"),
                HeaderValue::from_static("no"),
            ),
        ],
        Sse::new(events).keep_alive(KeepAlive::default()),
    )
        .into_response()
}

/// Everything up to the first upstream byte happens here, so setup
/// failures become a lone error frame.
async fn open_relay(state: &AppState, body: &ChatRequest) -> BoxStream<'static, RelayFrame> {
    let Some(provider) = state.llm.clone() else {
        return lone_frame(RelayFrame::error(provider_missing(state)));
    };

    let turn = prepare_turn(state, provider.as_ref(), body.turn_input()).await;

    match provider.chat_stream(&turn.request).await {
        Ok(upstream) => {
            let pace = Duration::from_millis(state.config.stream.pace_ms);
            let prefix = turn.deactivated.then(RelayFrame::deactivate);
            Box::pin(stream::iter(prefix).chain(relay_frames(upstream, pace)))
        }
        Err(e) => {
            tracing::warn!(provider = provider.provider_id(), error = %e, "chat stream failed to open");
            lone_frame(RelayFrame::error(e.to_string()))
        }
    }
}

fn lone_frame(frame: RelayFrame) -> BoxStream<'static, RelayFrame> {
    Box::pin(stream::once(async move { frame }))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POST /api/chat/simple
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn chat_simple(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Json<Value> {
    let Some(provider) = state.llm.clone() else {
        return Json(json!({ "error": provider_missing(&state), "success": false }));
    };

    let turn = prepare_turn(&state, provider.as_ref(), body.turn_input()).await;

    match provider.chat(&turn.request).await {
        Ok(resp) => {
            tracing::debug!(
                model = %resp.model,
                finish_reason = ?resp.finish_reason,
                mode = %turn.mode,
                "simple chat completed"
            );
            let mut out = json!({
                "response": resp.content,
                "success": true,
                "conversation_id": body.conversation_id,
            });
            if turn.deactivated {
                out["mode_action"] = json!("deactivate");
            }
            Json(out)
        }
        Err(e) => {
            tracing::warn!(provider = provider.provider_id(), error = %e, "simple chat failed");
            Json(json!({ "error": e.to_string(), "success": false }))
        }
    }
}
