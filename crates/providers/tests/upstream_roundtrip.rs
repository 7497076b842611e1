//! Drives the HTTP adapters against an in-process upstream.
//!
//! A small axum app stands in for the chat-completions and search APIs so
//! the full request/response path (auth header, body shape, streaming
//! decode, error mapping) runs without network access.

use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use futures_util::StreamExt;
use nx_domain::chat::ChatTurn;
use nx_domain::config::{AuthConfig, LlmConfig, SearchConfig};
use nx_domain::error::Error;
use nx_domain::stream::StreamEvent;
use nx_providers::{
    ChatRequest, LlmProvider, OpenAiCompatProvider, SearchProvider, TavilySearch,
};
use serde_json::{json, Value};

async fn completions(headers: HeaderMap, Json(body): Json<Value>) -> axum::response::Response {
    if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some("Bearer gsk-test") {
        return (StatusCode::UNAUTHORIZED, "bad key").into_response();
    }
    if body["stream"] == true {
        let frames = [
            json!({"choices":[{"delta":{"role":"assistant"}}]}),
            json!({"choices":[{"delta":{"content":"**Hel"}}]}),
            json!({"choices":[{"delta":{"content":"lo**"}}]}),
            json!({"choices":[{"delta":{},"finish_reason":"stop"}]}),
        ];
        let mut sse = String::new();
        for f in frames {
            sse.push_str(&format!("data: {f}\n\n"));
        }
        sse.push_str("data: [DONE]\n\n");
        return ([("content-type", "text/event-stream")], sse).into_response();
    }
    let echoed = body["messages"].as_array().map(|m| m.len()).unwrap_or(0);
    Json(json!({
        "model": body["model"],
        "choices": [{
            "message": {"role": "assistant", "content": format!("saw {echoed} turns")},
            "finish_reason": "stop"
        }]
    }))
    .into_response()
}

async fn rate_limited() -> impl IntoResponse {
    (StatusCode::TOO_MANY_REQUESTS, "slow down")
}

async fn search(Json(body): Json<Value>) -> Json<Value> {
    let results: Vec<Value> = (0..5)
        .map(|i| {
            json!({
                "title": format!("Result {i}"),
                "content": format!("about {}", body["query"].as_str().unwrap_or("")),
                "url": format!("https://news.example/{i}"),
            })
        })
        .collect();
    Json(json!({ "results": results }))
}

async fn spawn_upstream() -> String {
    let app = Router::new()
        .route("/v1/chat/completions", post(completions))
        .route("/limited/chat/completions", post(rate_limited))
        .route("/search", post(search));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn llm_config(base_url: String) -> LlmConfig {
    LlmConfig {
        base_url,
        auth: AuthConfig {
            key: Some("gsk-test".into()),
            env: None,
        },
        ..Default::default()
    }
}

fn request() -> ChatRequest {
    ChatRequest {
        messages: vec![ChatTurn::system("S"), ChatTurn::user("hi")],
        max_tokens: Some(64),
        temperature: Some(0.7),
        ..Default::default()
    }
}

#[tokio::test]
async fn blocking_chat_round_trip() {
    let base = spawn_upstream().await;
    let provider = OpenAiCompatProvider::from_config(&llm_config(format!("{base}/v1"))).unwrap();
    let resp = provider.chat(&request()).await.unwrap();
    assert_eq!(resp.content, "saw 2 turns");
    assert_eq!(resp.model, "llama-3.1-8b-instant");
}

#[tokio::test]
async fn streaming_chat_yields_raw_deltas_then_done() {
    let base = spawn_upstream().await;
    let provider = OpenAiCompatProvider::from_config(&llm_config(format!("{base}/v1"))).unwrap();
    let events: Vec<_> = provider
        .chat_stream(&request())
        .await
        .unwrap()
        .collect()
        .await;
    let events: Vec<StreamEvent> = events.into_iter().map(Result::unwrap).collect();
    assert_eq!(
        events,
        vec![
            StreamEvent::Token { text: "**Hel".into() },
            StreamEvent::Token { text: "lo**".into() },
            StreamEvent::Done {
                finish_reason: Some("stop".into())
            },
        ]
    );
}

#[tokio::test]
async fn non_success_status_is_reported_with_body() {
    let base = spawn_upstream().await;
    let provider =
        OpenAiCompatProvider::from_config(&llm_config(format!("{base}/limited"))).unwrap();
    let err = provider.chat_stream(&request()).await.err().unwrap();
    match err {
        Error::Provider { provider, message } => {
            assert_eq!(provider, "groq");
            assert_eq!(message, "HTTP 429 - slow down");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn wrong_key_is_a_provider_error() {
    let base = spawn_upstream().await;
    let mut cfg = llm_config(format!("{base}/v1"));
    cfg.auth.key = Some("wrong".into());
    let provider = OpenAiCompatProvider::from_config(&cfg).unwrap();
    let err = provider.chat(&request()).await.unwrap_err();
    assert!(err.to_string().contains("HTTP 401"));
}

#[tokio::test]
async fn unreachable_upstream_is_a_transport_error() {
    // Port 9 (discard) on localhost is virtually never listening.
    let provider =
        OpenAiCompatProvider::from_config(&llm_config("http://127.0.0.1:9/v1".into())).unwrap();
    let err = provider.chat(&request()).await.unwrap_err();
    assert!(matches!(err, Error::Http(_) | Error::Timeout(_)));
}

#[tokio::test]
async fn tavily_search_truncates_to_requested_count() {
    let base = spawn_upstream().await;
    let cfg = SearchConfig {
        base_url: base,
        auth: AuthConfig {
            key: Some("tvly-test".into()),
            env: None,
        },
        ..Default::default()
    };
    let search = TavilySearch::from_config(&cfg).unwrap();
    let results = search.search("cricket score", 3).await.unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].title, "Result 0");
    assert_eq!(results[0].content, "about cricket score");
    assert_eq!(results[2].url, "https://news.example/2");
}
