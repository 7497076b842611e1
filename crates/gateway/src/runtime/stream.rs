//! Turns provider deltas into the client's SSE frame protocol.

use std::time::Duration;

use futures_util::stream::Stream;
use futures_util::StreamExt;
use serde::Serialize;

use nx_domain::error::Result;
use nx_domain::stream::{BoxStream, StreamEvent};
use nx_providers::markdown::MarkdownStripper;

/// One `data:` frame sent to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RelayFrame {
    ModeAction { mode_action: &'static str },
    Word { word: String },
    Done { done: bool },
    Error { error: String },
}

impl RelayFrame {
    pub fn deactivate() -> Self {
        RelayFrame::ModeAction {
            mode_action: "deactivate",
        }
    }

    pub fn word(word: impl Into<String>) -> Self {
        RelayFrame::Word { word: word.into() }
    }

    pub fn done() -> Self {
        RelayFrame::Done { done: true }
    }

    pub fn error(message: impl Into<String>) -> Self {
        RelayFrame::Error {
            error: message.into(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Word frames for each non-empty cleaned delta, then `done`.
///
/// Markdown is stripped with one [`MarkdownStripper`] per stream so heading
/// markers are only removed at real line starts. Sleeps `pace` after every word. An upstream error becomes a single
/// error frame and ends the stream without `done`. Dropping the returned
/// stream drops `upstream` and with it the provider connection.
pub fn relay_frames(
    mut upstream: BoxStream<'static, Result<StreamEvent>>,
    pace: Duration,
) -> impl Stream<Item = RelayFrame> + Send + 'static {
    async_stream::stream! {
        let mut stripper = MarkdownStripper::new();
        while let Some(event) = upstream.next().await {
            match event {
                Ok(StreamEvent::Token { text }) => {
                    let clean = stripper.strip(&text);
                    if clean.is_empty() {
                        continue;
                    }
                    yield RelayFrame::word(clean);
                    if !pace.is_zero() {
                        tokio::time::sleep(pace).await;
                    }
                }
                Ok(StreamEvent::Done { finish_reason }) => {
                    tracing::debug!(finish_reason = ?finish_reason, "upstream stream finished");
                    break;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "upstream stream failed");
                    yield RelayFrame::error(e.to_string());
                    return;
                }
            }
        }
        yield RelayFrame::done();
    }
}
