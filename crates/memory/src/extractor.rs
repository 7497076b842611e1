//! `MemoryExtractor` — one provider call per extraction, never fails.

use crate::merge::merge;
use crate::parse::parse_extraction;
use crate::prompt::{build_extraction_prompt, EXTRACTION_SYSTEM_PROMPT};
use nx_domain::chat::ChatTurn;
use nx_domain::config::MemoryConfig;
use nx_domain::memory::UserMemory;
use nx_domain::trace::TraceEvent;
use nx_providers::{ChatRequest, LlmProvider};
use serde::Serialize;
use tracing::warn;

/// What the `/memory/extract` endpoint returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionOutcome {
    pub updated_memory: UserMemory,
    pub extracted_facts: Vec<String>,
}

impl ExtractionOutcome {
    /// The current memory echoed back with nothing new.
    pub fn unchanged(memory: UserMemory) -> Self {
        Self {
            updated_memory: memory,
            extracted_facts: Vec::new(),
        }
    }
}

pub struct MemoryExtractor<'a> {
    provider: &'a dyn LlmProvider,
    config: &'a MemoryConfig,
}

impl<'a> MemoryExtractor<'a> {
    pub fn new(provider: &'a dyn LlmProvider, config: &'a MemoryConfig) -> Self {
        Self { provider, config }
    }

    /// Ask the provider for new facts in the last `window` turns and merge
    /// them into `current`.
    ///
    /// Provider errors and unparseable replies return `current` unchanged.
    pub async fn extract(&self, messages: &[ChatTurn], current: UserMemory) -> ExtractionOutcome {
        let start = messages.len().saturating_sub(self.config.window);
        let recent = &messages[start..];

        let turns = self.provider.shape_turns(vec![
            ChatTurn::system(EXTRACTION_SYSTEM_PROMPT),
            ChatTurn::user(build_extraction_prompt(recent, &current)),
        ]);
        let req = ChatRequest {
            messages: turns,
            temperature: Some(self.config.temperature),
            max_tokens: Some(self.config.max_tokens),
            json_mode: self.config.json_mode,
            ..Default::default()
        };

        let reply = match self.provider.chat(&req).await {
            Ok(resp) => {
                if resp.finish_reason.as_deref() == Some("length") {
                    warn!(model = %resp.model, max_tokens = self.config.max_tokens, "memory extraction reply was truncated");
                }
                resp.content
            }
            Err(e) => {
                warn!(provider = self.provider.provider_id(), error = %e, "memory extraction call failed");
                self.trace(recent.len(), 0, false);
                return ExtractionOutcome::unchanged(current);
            }
        };

        let Some(extracted) = parse_extraction(&reply) else {
            warn!(reply_chars = reply.len(), "memory extraction reply had no usable JSON");
            self.trace(recent.len(), 0, false);
            return ExtractionOutcome::unchanged(current);
        };

        let merged = merge(&current, &extracted);
        self.trace(recent.len(), merged.new_facts.len(), true);

        ExtractionOutcome {
            updated_memory: merged.memory,
            extracted_facts: merged.new_facts,
        }
    }

    fn trace(&self, transcript_turns: usize, new_facts: usize, parsed: bool) {
        TraceEvent::MemoryExtracted {
            transcript_turns,
            new_facts,
            parsed,
        }
        .emit();
    }
}
