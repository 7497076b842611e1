use serde::{Deserialize, Serialize};

/// Maximum number of entries kept in [`UserMemory::recent_topics`].
pub const RECENT_TOPICS_CAP: usize = 5;

/// Caller-owned profile of facts about the user.
///
/// The relay never stores this: it arrives with each request and an updated
/// copy is handed back by the memory extractor. List fields are logically
/// sets, except `recent_topics` which is a bounded FIFO.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMemory {
    #[serde(default)]
    pub preferred_name: Option<String>,
    #[serde(default)]
    pub language_style: Option<String>,
    #[serde(default)]
    pub skill_level: Option<String>,
    #[serde(default)]
    pub communication_preferences: Option<String>,
    #[serde(default)]
    pub emotional_state: Option<String>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub interests: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub goals: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub personal_facts: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub favorite_things: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub recent_topics: Vec<String>,
}

impl UserMemory {
    /// The preferred name, if set and non-blank.
    pub fn display_name(&self) -> Option<&str> {
        self.preferred_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }
}

/// Clients send `null` for list fields they have never filled.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
