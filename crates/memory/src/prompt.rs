use nx_domain::chat::ChatTurn;
use nx_domain::memory::UserMemory;

/// System instruction for the extraction call.
pub const EXTRACTION_SYSTEM_PROMPT: &str =
    "You are a JSON extraction assistant. Return only valid JSON, no other text.";

/// Render turns as `ROLE: content` lines.
pub fn transcript(turns: &[ChatTurn]) -> String {
    turns
        .iter()
        .map(|t| format!("{}: {}", t.role.as_str().to_uppercase(), t.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The user message for the extraction call.
pub fn build_extraction_prompt(turns: &[ChatTurn], current: &UserMemory) -> String {
    let memory_json =
        serde_json::to_string_pretty(current).unwrap_or_else(|_| "{}".to_string());

    format!(
        r#"Analyze this conversation and extract NEW personal information about the user.

CONVERSATION:
{conversation}

CURRENT MEMORY:
{memory_json}

Extract ONLY new, explicit information that is not already in the current memory. Return VALID JSON in exactly this shape:
{{
  "preferred_name": null,
  "language_style": null,
  "new_interests": [],
  "skill_level": null,
  "new_goals": [],
  "new_facts": [],
  "new_favorites": [],
  "current_topic": null,
  "emotional_state": null,
  "communication_preferences": null
}}

Rules:
- Only include information the user stated explicitly. Do not infer.
- "current_topic" is a two to five word summary of what is being discussed.
- "emotional_state" is a single word, only if the user clearly expressed a feeling.
- Use null or empty arrays when nothing new was found.
- Return JSON only."#,
        conversation = transcript(turns),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_uses_uppercase_roles() {
        let turns = vec![ChatTurn::user("I love chess"), ChatTurn::assistant("Nice!")];
        assert_eq!(transcript(&turns), "USER: I love chess\nASSISTANT: Nice!");
    }

    #[test]
    fn prompt_embeds_transcript_memory_and_schema() {
        let memory = UserMemory {
            interests: vec!["chess".into()],
            ..Default::default()
        };
        let prompt = build_extraction_prompt(&[ChatTurn::user("call me Sam")], &memory);
        assert!(prompt.contains("USER: call me Sam"));
        assert!(prompt.contains("\"interests\": [\n    \"chess\"\n  ]"));
        for key in [
            "preferred_name",
            "new_interests",
            "new_favorites",
            "current_topic",
            "emotional_state",
            "communication_preferences",
        ] {
            assert!(prompt.contains(&format!("\"{key}\"")), "missing {key}");
        }
    }
}
