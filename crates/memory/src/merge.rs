//! Folding an extraction result into the caller's memory record.

use crate::parse::ExtractedMemory;
use nx_domain::memory::{UserMemory, RECENT_TOPICS_CAP};

/// Result of [`merge`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub memory: UserMemory,
    /// Items that were not in the memory before, in category order, then
    /// `Topic: ...` when a topic was extracted.
    pub new_facts: Vec<String>,
}

/// Merge `extracted` into a copy of `current`.
///
/// Scalars take the new value when one was extracted. List fields only
/// grow: new items are appended unless already present. `recent_topics`
/// gains the extracted topic and keeps the last [`RECENT_TOPICS_CAP`].
pub fn merge(current: &UserMemory, extracted: &ExtractedMemory) -> MergeOutcome {
    let mut memory = current.clone();
    let mut new_facts = Vec::new();

    overwrite(&mut memory.preferred_name, &extracted.preferred_name);
    overwrite(&mut memory.language_style, &extracted.language_style);
    overwrite(&mut memory.skill_level, &extracted.skill_level);
    overwrite(
        &mut memory.communication_preferences,
        &extracted.communication_preferences,
    );
    overwrite(&mut memory.emotional_state, &extracted.emotional_state);

    union_into(&mut memory.interests, &extracted.new_interests, &mut new_facts);
    union_into(&mut memory.goals, &extracted.new_goals, &mut new_facts);
    union_into(&mut memory.personal_facts, &extracted.new_facts, &mut new_facts);
    union_into(&mut memory.favorite_things, &extracted.new_favorites, &mut new_facts);

    if let Some(topic) = &extracted.current_topic {
        push_topic(&mut memory.recent_topics, topic);
        new_facts.push(format!("Topic: {topic}"));
    }

    MergeOutcome { memory, new_facts }
}

fn overwrite(slot: &mut Option<String>, new: &Option<String>) {
    if let Some(value) = new {
        *slot = Some(value.clone());
    }
}

/// Append items from `new` that `existing` lacks, recording each addition.
fn union_into(existing: &mut Vec<String>, new: &[String], added: &mut Vec<String>) {
    for item in new {
        if !existing.iter().any(|e| e.trim() == item.trim()) {
            existing.push(item.clone());
            added.push(item.clone());
        }
    }
}

fn push_topic(topics: &mut Vec<String>, topic: &str) {
    topics.retain(|t| t != topic);
    topics.push(topic.to_string());
    if topics.len() > RECENT_TOPICS_CAP {
        let excess = topics.len() - RECENT_TOPICS_CAP;
        topics.drain(..excess);
    }
}
