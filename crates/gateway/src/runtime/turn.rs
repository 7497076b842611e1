//! Per-turn pipeline: mode resolution, cards, live search, prompt, turns.
//!
//! Shared by the streaming and simple chat endpoints so both forward the
//! same request to the provider.

use nx_domain::chat::ChatTurn;
use nx_domain::memory::UserMemory;
use nx_domain::mode::{Mode, ModeSettings};
use nx_domain::trace::TraceEvent;
use nx_prompting::live::fetch_live_context;
use nx_prompting::{
    assemble_turns, build_system_prompt, is_spin_request, last_user_message, resolve_mode,
    GameCardTriple, PromptContext,
};
use nx_providers::{ChatRequest, LlmProvider};

use crate::state::AppState;

/// What the caller sent for one turn.
#[derive(Debug, Clone, Copy)]
pub struct TurnInput<'a> {
    pub history: &'a [ChatTurn],
    pub user_name: &'a str,
    pub memory: Option<&'a UserMemory>,
    /// Raw mode tag from the client; unknown tags mean default.
    pub active_mode: Option<&'a str>,
}

/// A turn ready to send upstream.
#[derive(Debug, Clone)]
pub struct PreparedTurn {
    pub request: ChatRequest,
    /// Mode actually used for this turn.
    pub mode: Mode,
    pub settings: ModeSettings,
    /// The client should clear its active mode.
    pub deactivated: bool,
    pub cards: Option<GameCardTriple>,
}

/// Build the provider request for one turn.
///
/// Never fails: a failed live search just leaves the context out.
pub async fn prepare_turn(
    state: &AppState,
    provider: &dyn LlmProvider,
    input: TurnInput<'_>,
) -> PreparedTurn {
    let last_user = last_user_message(input.history);

    let requested = Mode::from_tag(input.active_mode);
    let resolution = resolve_mode(requested, last_user);
    if resolution.deactivated {
        TraceEvent::ModeDeactivated {
            previous_mode: requested.as_str().into(),
        }
        .emit();
    }
    let mode = resolution.effective;
    let settings = state.config.modes.settings_for(mode);

    let cards = (mode == Mode::Startup && is_spin_request(last_user)).then(spin_cards);

    let live_context = match &state.search {
        Some(search) if mode == Mode::Default && state.live_trigger.needs_live_search(last_user) => {
            fetch_live_context(
                search.as_ref(),
                last_user,
                state.config.search.effective_max_results(),
                state.config.search.content_chars,
            )
            .await
        }
        _ => String::new(),
    };

    let ctx = PromptContext {
        user_name: input.user_name,
        memory: input.memory,
        live_context: Some(live_context.as_str()).filter(|c| !c.is_empty()),
        cards: cards.as_ref(),
    };
    let system_prompt = build_system_prompt(mode, &ctx);

    let assembled = assemble_turns(
        &system_prompt,
        input.history,
        settings.context_window,
        cards.as_ref(),
    );
    let forwarded_turns = assembled.len() - 1;
    let messages = provider.shape_turns(assembled);

    TraceEvent::TurnAssembled {
        mode: mode.as_str().into(),
        history_turns: input.history.len(),
        forwarded_turns,
        system_prompt_chars: system_prompt.chars().count(),
        live_context_chars: live_context.chars().count(),
        cards_spun: cards.is_some(),
    }
    .emit();

    PreparedTurn {
        request: ChatRequest {
            messages,
            temperature: Some(settings.temperature),
            max_tokens: Some(settings.max_tokens),
            ..Default::default()
        },
        mode,
        settings,
        deactivated: resolution.deactivated,
        cards,
    }
}

// Kept out of the async body so the thread-local RNG never lives across
// an await point.
fn spin_cards() -> GameCardTriple {
    GameCardTriple::spin(&mut rand::thread_rng())
}
