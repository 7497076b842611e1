//! Role-alternation repair and system-prompt folding.
//!
//! Providers differ in how strict they are about conversation layout. This
//! module turns an assembled turn list (`[system, history...]`) into one
//! that satisfies a provider's [`RoleConventions`] without reordering or
//! dropping any original content.

use nx_domain::capability::RoleConventions;
use nx_domain::chat::{ChatTurn, Role};

/// Inserted between two consecutive user turns.
pub const ASSISTANT_FILLER: &str = "I understand, please continue.";
/// Inserted between two consecutive assistant turns.
pub const USER_FILLER: &str = "Continue.";
/// Separates the folded system prompt from the first user message.
pub const SYSTEM_FOLD_SEPARATOR: &str = "\n\n---\n\n";

/// Shape `turns` for a provider with the given role conventions.
///
/// Leading system turns are treated as the system prompt. A system turn
/// found later in the history is forwarded as a user turn, since no
/// provider accepts one mid-conversation.
pub fn shape_turns(turns: Vec<ChatTurn>, roles: &RoleConventions) -> Vec<ChatTurn> {
    let mut system_parts: Vec<String> = Vec::new();
    let mut body: Vec<ChatTurn> = Vec::with_capacity(turns.len());

    for turn in turns {
        match turn.role {
            Role::System if body.is_empty() => system_parts.push(turn.content),
            Role::System => body.push(ChatTurn::user(turn.content)),
            _ => body.push(turn),
        }
    }

    let system = (!system_parts.is_empty()).then(|| system_parts.join("\n\n"));

    if roles.strict_alternation {
        body = repair_alternation(body);
    }

    let shaped = match system {
        Some(prompt) if !roles.system_role => fold_system(prompt, body),
        Some(prompt) => {
            let mut out = Vec::with_capacity(body.len() + 1);
            out.push(ChatTurn::system(prompt));
            out.extend(body);
            out
        }
        None => body,
    };

    if roles.strict_alternation {
        if let Some(i) = first_adjacent_same_role(&shaped) {
            tracing::warn!(
                index = i,
                role = %shaped[i].role,
                "turn list still has adjacent same-role turns after repair"
            );
        }
    }

    shaped
}

/// Insert a filler turn of the opposite role between same-role neighbours.
pub fn repair_alternation(turns: Vec<ChatTurn>) -> Vec<ChatTurn> {
    let mut out: Vec<ChatTurn> = Vec::with_capacity(turns.len() * 2);
    for turn in turns {
        if let Some(prev) = out.last() {
            if prev.role == turn.role {
                out.push(filler_for(turn.role));
            }
        }
        out.push(turn);
    }
    out
}

fn filler_for(repeated: Role) -> ChatTurn {
    match repeated {
        Role::User => ChatTurn::assistant(ASSISTANT_FILLER),
        // System never reaches here; shape_turns rewrites it to user.
        Role::Assistant | Role::System => ChatTurn::user(USER_FILLER),
    }
}

/// Merge the system prompt into the first user turn, or lead with it as a
/// standalone user turn when the body does not start with one.
fn fold_system(prompt: String, mut body: Vec<ChatTurn>) -> Vec<ChatTurn> {
    match body.first_mut() {
        Some(first) if first.role == Role::User => {
            first.content = format!("{prompt}{SYSTEM_FOLD_SEPARATOR}{}", first.content);
            body
        }
        _ => {
            let mut out = Vec::with_capacity(body.len() + 1);
            out.push(ChatTurn::user(prompt));
            out.extend(body);
            out
        }
    }
}

/// Index of the first turn whose successor has the same role.
pub fn first_adjacent_same_role(turns: &[ChatTurn]) -> Option<usize> {
    turns.windows(2).position(|w| w[0].role == w[1].role)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
