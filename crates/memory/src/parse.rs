//! Defensive parsing of the extractor's reply.

use serde_json::Value;

/// Fields the extractor may report. Everything is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedMemory {
    pub preferred_name: Option<String>,
    pub language_style: Option<String>,
    pub skill_level: Option<String>,
    pub communication_preferences: Option<String>,
    pub emotional_state: Option<String>,
    pub current_topic: Option<String>,
    pub new_interests: Vec<String>,
    pub new_goals: Vec<String>,
    pub new_facts: Vec<String>,
    pub new_favorites: Vec<String>,
}

impl ExtractedMemory {
    /// Read known keys from a JSON object, ignoring anything malformed.
    pub fn from_value(v: &Value) -> Self {
        Self {
            preferred_name: scalar(v, "preferred_name"),
            language_style: scalar(v, "language_style"),
            skill_level: scalar(v, "skill_level"),
            communication_preferences: scalar(v, "communication_preferences"),
            emotional_state: scalar(v, "emotional_state"),
            current_topic: scalar(v, "current_topic"),
            new_interests: list(v, "new_interests"),
            new_goals: list(v, "new_goals"),
            new_facts: list(v, "new_facts"),
            new_favorites: list(v, "new_favorites"),
        }
    }
}

/// Models sometimes write the literal word instead of JSON `null`.
fn is_placeholder(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "" | "null" | "none" | "n/a" | "unknown"
    )
}

fn clean(s: &str) -> Option<String> {
    let s = s.trim();
    (!is_placeholder(s)).then(|| s.to_string())
}

fn scalar(v: &Value, key: &str) -> Option<String> {
    v.get(key).and_then(Value::as_str).and_then(clean)
}

/// Accepts an array of strings (non-strings skipped) or a single string.
fn list(v: &Value, key: &str) -> Vec<String> {
    match v.get(key) {
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).filter_map(clean).collect(),
        Some(Value::String(s)) => clean(s).into_iter().collect(),
        _ => Vec::new(),
    }
}

// ── Text cleanup ───────────────────────────────────────────────────

/// Remove a surrounding Markdown code fence (```` ``` ```` or ```` ```json ````).
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. "json") on the opening line.
    let body = match rest.find('\n') {
        Some(nl) => &rest[nl + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Slice of the first balanced top-level `{...}` object in `text`.
///
/// Tracks brace depth, skipping braces that appear inside JSON strings, so
/// trailing commentary after the object is ignored.
pub fn find_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse an extractor reply. `None` means nothing usable was found.
pub fn parse_extraction(response: &str) -> Option<ExtractedMemory> {
    let body = strip_code_fences(response);
    let object = find_json_object(body)?;
    match serde_json::from_str::<Value>(object) {
        Ok(v) if v.is_object() => Some(ExtractedMemory::from_value(&v)),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!(error = %e, "extraction reply is not valid JSON");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_commentary_is_ignored() {
        let parsed = parse_extraction(r#"{"preferred_name":"Sam"} -- end of output"#).unwrap();
        assert_eq!(parsed.preferred_name.as_deref(), Some("Sam"));
    }

    #[test]
    fn leading_chatter_and_fences() {
        let reply = "```json\n{\"new_interests\": [\"chess\"], \"current_topic\": \"openings\"}\n```";
        let parsed = parse_extraction(reply).unwrap();
        assert_eq!(parsed.new_interests, vec!["chess"]);
        assert_eq!(parsed.current_topic.as_deref(), Some("openings"));

        let reply = "Sure! Here you go: {\"skill_level\": \"beginner\"} Hope that helps {:)}";
        assert_eq!(
            parse_extraction(reply).unwrap().skill_level.as_deref(),
            Some("beginner")
        );
    }

    #[test]
    fn braces_inside_strings_do_not_end_the_object() {
        let reply = r#"{"new_facts": ["uses {curly} braces", "says \"}\" a lot"]} trailing }"#;
        let parsed = parse_extraction(reply).unwrap();
        assert_eq!(
            parsed.new_facts,
            vec!["uses {curly} braces", "says \"}\" a lot"]
        );
    }

    #[test]
    fn nested_objects_are_balanced() {
        let text = r#"x {"a": {"b": 1}, "c": 2} y"#;
        assert_eq!(find_json_object(text), Some(r#"{"a": {"b": 1}, "c": 2}"#));
    }

    #[test]
    fn unbalanced_or_missing_object_is_none() {
        assert_eq!(find_json_object(r#"{"a": 1"#), None);
        assert!(parse_extraction("I couldn't find anything new.").is_none());
        assert!(parse_extraction(r#"{"a": 1"#).is_none());
    }

    #[test]
    fn invalid_json_inside_braces_is_none() {
        assert!(parse_extraction("{preferred_name: Sam}").is_none());
    }

    #[test]
    fn nulls_placeholders_and_wrong_types_are_dropped() {
        let reply = r#"{
            "preferred_name": null,
            "language_style": "null",
            "skill_level": 3,
            "new_goals": "learn piano",
            "new_facts": ["", "N/A", 7, "has two cats"],
            "new_favorites": null
        }"#;
        let parsed = parse_extraction(reply).unwrap();
        assert_eq!(parsed.preferred_name, None);
        assert_eq!(parsed.language_style, None);
        assert_eq!(parsed.skill_level, None);
        assert_eq!(parsed.new_goals, vec!["learn piano"]);
        assert_eq!(parsed.new_facts, vec!["has two cats"]);
        assert!(parsed.new_favorites.is_empty());
    }

    #[test]
    fn empty_object_is_empty_extraction() {
        assert_eq!(parse_extraction("{}"), Some(ExtractedMemory::default()));
    }

    #[test]
    fn fence_without_newline() {
        assert_eq!(strip_code_fences("```json{\"a\":1}```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("  plain  "), "plain");
    }
}
