use serde::Serialize;

/// Structured trace events emitted across all nexrelay crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    TurnAssembled {
        mode: String,
        history_turns: usize,
        forwarded_turns: usize,
        system_prompt_chars: usize,
        live_context_chars: usize,
        cards_spun: bool,
    },
    ModeDeactivated {
        previous_mode: String,
    },
    LiveSearch {
        query_chars: usize,
        results: usize,
        duration_ms: u64,
        ok: bool,
    },
    LlmRequest {
        provider: String,
        model: String,
        streaming: bool,
        status: u16,
        duration_ms: u64,
    },
    MemoryExtracted {
        transcript_turns: usize,
        new_facts: usize,
        parsed: bool,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "nx_event");
    }
}
