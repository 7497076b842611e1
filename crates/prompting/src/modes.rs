//! System-prompt templates, one per [`Mode`].
//!
//! Rendering is pure: everything a template needs arrives in a
//! [`PromptContext`], and missing optional data just drops the matching
//! section.

use crate::game::GameCardTriple;
use nx_domain::memory::UserMemory;
use nx_domain::mode::Mode;

/// Name used when neither the request nor the memory carries one.
pub const DEFAULT_DISPLAY_NAME: &str = "friend";

/// Inputs shared by every template.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptContext<'a> {
    pub user_name: &'a str,
    pub memory: Option<&'a UserMemory>,
    /// Formatted web-search results. Only the default template uses it.
    pub live_context: Option<&'a str>,
    /// Cards spun this turn. Only the startup template uses them.
    pub cards: Option<&'a GameCardTriple>,
}

impl<'a> PromptContext<'a> {
    /// The name to address the user by: memory first, then the request.
    pub fn display_name(&self) -> &'a str {
        self.memory
            .and_then(UserMemory::display_name)
            .or_else(|| Some(self.user_name.trim()).filter(|n| !n.is_empty()))
            .unwrap_or(DEFAULT_DISPLAY_NAME)
    }
}

/// Build the system prompt for `mode`.
pub fn build_system_prompt(mode: Mode, ctx: &PromptContext<'_>) -> String {
    let mut prompt = match mode {
        Mode::Learn => render_learn(ctx),
        Mode::English => render_english(ctx),
        Mode::Startup => render_startup(ctx),
        Mode::Default => render_default(ctx),
    };
    if let Some(section) = memory_section(ctx) {
        prompt.push_str("\n\n");
        prompt.push_str(&section);
    }
    if mode == Mode::Default {
        if let Some(live) = ctx.live_context.filter(|l| !l.trim().is_empty()) {
            prompt.push_str("\n\nCURRENT INFORMATION (from web search):\n");
            prompt.push_str(live);
            prompt.push_str(
                "\n\nUse this to give up-to-date answers, and mention where the information comes from.",
            );
        }
    }
    prompt
}

// ── Templates ──────────────────────────────────────────────────────

fn render_learn(ctx: &PromptContext<'_>) -> String {
    let name = ctx.display_name();
    format!(
        "You are Nex, an expert teacher and close friend having a conversation with {name}.

HOW YOU TEACH:
- Start with what the topic is and why it matters.
- Break the core idea into small steps, each with an example or analogy.
- Explain the why and the how, not just the what.
- Finish with the key takeaways.
- If {name} writes in Hinglish or Hindi, answer in the same language.

QUIZ AFTER EVERY TOPIC:
End each explanation with a short three-question quiz for {name}. When they answer, check each answer, praise what is right, and gently explain what is not.

Keep the tone warm and encouraging. The goal is real understanding, not memorisation."
    )
}

fn render_english(ctx: &PromptContext<'_>) -> String {
    let name = ctx.display_name();
    format!(
        "You are Nex, an English coach and supportive friend helping {name} speak and write better English.

HOW YOU COACH:
- When {name} makes a mistake, quote it, show the corrected sentence, and explain the rule in one or two lines.
- When the sentence is already correct, say so and offer a more natural alternative if there is one.
- Give a short practice exercise after each explanation.
- Match the level to {name}: simple words for beginners, nuance for advanced learners.
- If {name} writes in Hinglish, explain in Hinglish but keep the examples in English.

Every correction should feel like progress. Never make {name} feel judged."
    )
}

fn render_startup(ctx: &PromptContext<'_>) -> String {
    let name = ctx.display_name();
    let mut prompt = format!(
        "You are Nex, a Shark Tank style startup mentor and enthusiastic friend guiding {name} through the Startup Idea Game.

HOW THE GAME WORKS:
- Each spin deals three cards: a target audience, a pain point, and a technology.
- {name} pitches a startup that connects all three.
- You respond like an investor: what excites you, what worries you, and a score out of 10.
- Then suggest one concrete way to make the idea stronger and invite {name} to spin again.

If {name} has not spun yet, explain the rules briefly and ask them to type \"spin\"."
    );
    if let Some(cards) = ctx.cards {
        prompt.push_str(&format!(
            "\n\nYOUR CARDS:\nTarget Audience: {}\nPain Point: {}\nTechnology: {}\n\nPresent these cards with energy, then ask {name} to pitch a startup that connects all three.",
            cards.audience, cards.pain_point, cards.technology
        ));
    }
    prompt
}

fn render_default(ctx: &PromptContext<'_>) -> String {
    let name = ctx.display_name();
    format!(
        "You are Nex, a helpful, knowledgeable, and caring AI friend talking with {name}.

HOW YOU TALK:
- Use clear, natural English by default. If {name} writes in Hinglish or Hindi, reply in the same style.
- Be warm and personal. Use {name}'s name now and then.
- Give complete answers: explain the reasoning, add an example when it helps, and suggest a next step.
- Admit when you are unsure instead of guessing.
- Sound like a friend, not a corporate bot."
    )
}

// ── Shared sections ────────────────────────────────────────────────

/// "What you know" block listing only the memory fields that are set.
fn memory_section(ctx: &PromptContext<'_>) -> Option<String> {
    let memory = ctx.memory?;
    let mut lines: Vec<String> = Vec::new();

    let mut scalar = |label: &str, value: &Option<String>| {
        if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            lines.push(format!("- {label}: {v}"));
        }
    };
    scalar("Prefers to be called", &memory.preferred_name);
    scalar("Language style", &memory.language_style);
    scalar("Skill level", &memory.skill_level);
    scalar("Communication preference", &memory.communication_preferences);
    scalar("Current mood", &memory.emotional_state);

    let mut list = |label: &str, items: &[String], sep: &str| {
        if !items.is_empty() {
            lines.push(format!("- {label}: {}", items.join(sep)));
        }
    };
    list("Interests", &memory.interests, ", ");
    list("Goals", &memory.goals, ", ");
    list("Personal context", &memory.personal_facts, "; ");
    list("Favorite things", &memory.favorite_things, ", ");
    list("Recently talked about", &memory.recent_topics, ", ");

    if lines.is_empty() {
        return None;
    }

    Some(format!(
        "WHAT YOU KNOW ABOUT {}:\n{}\n\nUse this naturally. Bring up their interests and goals when they are relevant.",
        ctx.display_name().to_uppercase(),
        lines.join("\n")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory() -> UserMemory {
        UserMemory {
            preferred_name: Some("Sam".into()),
            interests: vec!["chess".into(), "rust".into()],
            personal_facts: vec!["lives in Pune".into(), "has a dog".into()],
            emotional_state: Some("excited".into()),
            ..Default::default()
        }
    }

    #[test]
    fn display_name_prefers_memory() {
        let mem = memory();
        let ctx = PromptContext {
            user_name: "samuel99",
            memory: Some(&mem),
            ..Default::default()
        };
        assert_eq!(ctx.display_name(), "Sam");
    }

    #[test]
    fn display_name_falls_back_to_placeholder() {
        let ctx = PromptContext {
            user_name: "  ",
            ..Default::default()
        };
        assert_eq!(ctx.display_name(), DEFAULT_DISPLAY_NAME);
    }

    #[test]
    fn every_mode_renders_a_distinct_prompt() {
        let ctx = PromptContext {
            user_name: "Asha",
            ..Default::default()
        };
        let prompts: Vec<String> = [Mode::Default, Mode::Learn, Mode::English, Mode::Startup]
            .into_iter()
            .map(|m| build_system_prompt(m, &ctx))
            .collect();
        for p in &prompts {
            assert!(p.starts_with("You are Nex"));
            assert!(p.contains("Asha"));
        }
        for i in 0..prompts.len() {
            for j in i + 1..prompts.len() {
                assert_ne!(prompts[i], prompts[j]);
            }
        }
    }

    #[test]
    fn memory_section_lists_only_present_fields() {
        let mem = memory();
        let ctx = PromptContext {
            user_name: "x",
            memory: Some(&mem),
            ..Default::default()
        };
        let prompt = build_system_prompt(Mode::Default, &ctx);
        assert!(prompt.contains("WHAT YOU KNOW ABOUT SAM:"));
        assert!(prompt.contains("- Interests: chess, rust"));
        assert!(prompt.contains("- Personal context: lives in Pune; has a dog"));
        assert!(prompt.contains("- Current mood: excited"));
        assert!(!prompt.contains("Goals"));
        assert!(!prompt.contains("Skill level"));
    }

    #[test]
    fn empty_memory_omits_section() {
        let mem = UserMemory::default();
        let ctx = PromptContext {
            user_name: "Asha",
            memory: Some(&mem),
            ..Default::default()
        };
        assert!(!build_system_prompt(Mode::Learn, &ctx).contains("WHAT YOU KNOW"));
    }

    #[test]
    fn live_context_only_in_default_mode() {
        let ctx = PromptContext {
            user_name: "Asha",
            live_context: Some("• Headline: body..."),
            ..Default::default()
        };
        assert!(build_system_prompt(Mode::Default, &ctx).contains("CURRENT INFORMATION"));
        assert!(!build_system_prompt(Mode::Learn, &ctx).contains("CURRENT INFORMATION"));
    }

    #[test]
    fn blank_live_context_is_ignored() {
        let ctx = PromptContext {
            user_name: "Asha",
            live_context: Some("   "),
            ..Default::default()
        };
        assert!(!build_system_prompt(Mode::Default, &ctx).contains("CURRENT INFORMATION"));
    }

    #[test]
    fn startup_prompt_lists_cards() {
        let cards = GameCardTriple {
            audience: "Pet Owners".into(),
            pain_point: "Trust".into(),
            technology: "Blockchain".into(),
        };
        let ctx = PromptContext {
            user_name: "Asha",
            cards: Some(&cards),
            ..Default::default()
        };
        let prompt = build_system_prompt(Mode::Startup, &ctx);
        assert!(prompt.contains("YOUR CARDS:"));
        assert!(prompt.contains("Target Audience: Pet Owners"));
        assert!(prompt.contains("Technology: Blockchain"));

        let without = build_system_prompt(
            Mode::Startup,
            &PromptContext {
                user_name: "Asha",
                ..Default::default()
            },
        );
        assert!(!without.contains("YOUR CARDS:"));
    }
}
