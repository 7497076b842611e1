use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::state::AppState;

/// `GET /`
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Backend is running" }))
}

/// `GET /api` and `GET /api/`
pub async fn api_root() -> Json<Value> {
    Json(json!({ "message": "Nex.AI API is running" }))
}

/// `GET /api/health`
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "provider_configured": state.llm.is_some(),
        "search_configured": state.search.is_some(),
    }))
}
