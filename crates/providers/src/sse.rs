//! Streaming response decoding for chat-completions endpoints.
//!
//! The upstream body is a sequence of newline-delimited frames. Each frame
//! is either an SSE `data: <json>` line or a bare JSON object, and the
//! stream ends with a `[DONE]` sentinel (or simply when the body closes).
//!
//! - [`FrameDecoder`] -- incremental, transport-free frame decoding
//! - [`delta_stream`] -- a [`BoxStream`] of events over any chunked body

use futures_core::Stream;
use futures_util::StreamExt;
use nx_domain::error::Result;
use nx_domain::stream::{BoxStream, StreamEvent};
use serde_json::Value;

/// The terminal sentinel sent by OpenAI-compatible providers.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Extract the payload of one frame line.
///
/// Returns `None` for blank lines, SSE comments, and SSE fields other than
/// `data:`.
fn frame_payload(line: &str) -> Option<&str> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(':') {
        return None;
    }
    let payload = match line.strip_prefix("data:") {
        Some(data) => data.trim(),
        None if ["event:", "id:", "retry:"].iter().any(|f| line.starts_with(f)) => return None,
        None => line,
    };
    (!payload.is_empty()).then_some(payload)
}

/// Incremental decoder from raw body bytes to [`StreamEvent`]s.
///
/// Bytes are buffered until a full line is available, so frames split
/// across chunks (including inside a multi-byte character) decode
/// correctly. Malformed JSON, frames without `choices`, and empty deltas
/// are skipped.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: Vec<u8>,
    finish_reason: Option<String>,
    done: bool,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the sentinel has been seen or [`finish`](Self::finish) ran.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Feed one body chunk and return the events it completes.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        self.buffer.extend_from_slice(chunk);
        let mut events = Vec::new();
        while !self.done {
            let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') else {
                break;
            };
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            self.decode_line(&String::from_utf8_lossy(&line), &mut events);
        }
        events
    }

    /// Flush any trailing partial frame and close the stream.
    ///
    /// Always ends with exactly one [`StreamEvent::Done`] unless the
    /// sentinel already produced it.
    pub fn finish(&mut self) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        if !self.done {
            let rest = std::mem::take(&mut self.buffer);
            self.decode_line(&String::from_utf8_lossy(&rest), &mut events);
        }
        if !self.done {
            self.done = true;
            events.push(StreamEvent::Done {
                finish_reason: self.finish_reason.take(),
            });
        }
        events
    }

    fn decode_line(&mut self, line: &str, events: &mut Vec<StreamEvent>) {
        let Some(payload) = frame_payload(line) else {
            return;
        };

        if payload == DONE_SENTINEL {
            self.done = true;
            events.push(StreamEvent::Done {
                finish_reason: self.finish_reason.take().or_else(|| Some("stop".into())),
            });
            return;
        }

        let v: Value = match serde_json::from_str(payload) {
            Ok(v) => v,
            Err(e) => {
                tracing::debug!(error = %e, "skipping malformed stream frame");
                return;
            }
        };

        let Some(choice) = v
            .get("choices")
            .and_then(|c| c.as_array())
            .and_then(|a| a.first())
        else {
            return;
        };

        if let Some(text) = choice.pointer("/delta/content").and_then(|t| t.as_str()) {
            if !text.is_empty() {
                events.push(StreamEvent::Token {
                    text: text.to_string(),
                });
            }
        }

        if let Some(fr) = choice.get("finish_reason").and_then(|f| f.as_str()) {
            self.finish_reason = Some(fr.to_string());
        }
    }
}

/// Build a [`BoxStream`] of events from a chunked response body.
///
/// The body is moved into the stream, so dropping the stream drops the
/// body (and with it the upstream connection). Reading stops right after
/// the first [`StreamEvent::Done`]; a transport error is yielded once and
/// ends the stream.
pub fn delta_stream<S, B>(body: S) -> BoxStream<'static, Result<StreamEvent>>
where
    S: Stream<Item = Result<B>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
{
    let stream = async_stream::stream! {
        let mut body = Box::pin(body);
        let mut decoder = FrameDecoder::new();

        while let Some(chunk) = body.next().await {
            match chunk {
                Ok(bytes) => {
                    for event in decoder.push(bytes.as_ref()) {
                        yield Ok(event);
                    }
                    if decoder.is_done() {
                        return;
                    }
                }
                Err(e) => {
                    yield Err(e);
                    return;
                }
            }
        }

        for event in decoder.finish() {
            yield Ok(event);
        }
    };

    Box::pin(stream)
}

/// Stream events out of a `reqwest::Response` body.
pub(crate) fn response_stream(
    response: reqwest::Response,
) -> BoxStream<'static, Result<StreamEvent>> {
    delta_stream(
        response
            .bytes_stream()
            .map(|chunk| chunk.map_err(crate::util::from_reqwest)),
    )
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
