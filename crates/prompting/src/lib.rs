//! Per-turn prompt construction: mode templates, the startup card game,
//! live-search augmentation, mode deactivation, and history windowing.

pub mod assembler;
pub mod deactivation;
pub mod game;
pub mod live;
pub mod modes;
pub mod truncation;

pub use assembler::{assemble_turns, last_user_message};
pub use deactivation::{detect_mode_deactivation, resolve_mode, ModeResolution};
pub use game::{is_spin_request, GameCardTriple};
pub use live::LiveSearchTrigger;
pub use modes::{build_system_prompt, PromptContext};
