//! Builds the ordered turn list for one provider call.
//!
//! This module only windows the history and applies the card annotation.
//! Provider-specific role repair happens afterwards in
//! `LlmProvider::shape_turns`.

use crate::game::GameCardTriple;
use nx_domain::chat::{ChatTurn, Role};

/// `[system, last window turns of history...]`.
///
/// When `cards` is given, the most recent user turn inside the window is
/// rewritten with the spin annotation.
pub fn assemble_turns(
    system_prompt: &str,
    history: &[ChatTurn],
    window: usize,
    cards: Option<&GameCardTriple>,
) -> Vec<ChatTurn> {
    let start = history.len().saturating_sub(window);
    let mut recent: Vec<ChatTurn> = history[start..].to_vec();

    if let Some(cards) = cards {
        if let Some(last_user) = recent.iter_mut().rev().find(|t| t.role == Role::User) {
            last_user.content = cards.annotate(&last_user.content);
        }
    }

    let mut turns = Vec::with_capacity(recent.len() + 1);
    turns.push(ChatTurn::system(system_prompt));
    turns.extend(recent);
    turns
}

/// Content of the latest user turn, or `""` when there is none.
pub fn last_user_message(history: &[ChatTurn]) -> &str {
    history
        .iter()
        .rev()
        .find(|t| t.role == Role::User)
        .map(|t| t.content.as_str())
        .unwrap_or("")
}
