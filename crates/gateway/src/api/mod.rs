pub mod chat;
pub mod health;
pub mod memory;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the API router.
///
/// Everything lives under `/api` except the bare liveness message at `/`.
/// A nested `/` only answers `/api`, so the trailing-slash form is routed
/// separately.
pub fn router() -> Router<AppState> {
    let api = Router::new()
        .route("/", get(health::api_root))
        .route("/health", get(health::health))
        .route("/chat/stream", post(chat::chat_stream))
        .route("/chat/simple", post(chat::chat_simple))
        .route("/memory/extract", post(memory::extract));

    Router::new()
        .route("/", get(health::root))
        .route("/api/", get(health::api_root))
        .nest("/api", api)
}
