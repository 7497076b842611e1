//! Detects when the user asks to leave the active mode.

use nx_domain::mode::Mode;

/// English and transliterated-Hindi exit phrases.
pub const DEACTIVATION_PHRASES: &[&str] = &[
    "turn off",
    "stop mode",
    "remove mode",
    "disable mode",
    "exit mode",
    "normal mode",
    "regular chat",
    "band karo",
    "mode hatao",
    "mode band",
    "turn this mode off",
    "disable the billionaire",
    "go back to normal",
    "stop the game",
    "stop game mode",
];

/// True when `text` contains one of the exit phrases.
pub fn detect_mode_deactivation(text: &str) -> bool {
    let lowered = text.trim().to_lowercase();
    DEACTIVATION_PHRASES.iter().any(|p| lowered.contains(p))
}

/// Outcome of applying the deactivation check to a requested mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeResolution {
    /// Mode to use for this turn.
    pub effective: Mode,
    /// The client should clear its stored mode.
    pub deactivated: bool,
}

/// Resolve the mode for this turn.
///
/// The check only runs when a non-default mode is active. A match switches
/// this turn to [`Mode::Default`]; the mode itself is caller-owned.
pub fn resolve_mode(requested: Mode, last_user_message: &str) -> ModeResolution {
    if !requested.is_default() && detect_mode_deactivation(last_user_message) {
        ModeResolution {
            effective: Mode::Default,
            deactivated: true,
        }
    } else {
        ModeResolution {
            effective: requested,
            deactivated: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_off_phrase_detected() {
        assert!(detect_mode_deactivation("please turn off this mode"));
    }

    #[test]
    fn praise_is_not_an_exit() {
        assert!(!detect_mode_deactivation("I love this mode"));
    }

    #[test]
    fn hinglish_and_case_variants() {
        assert!(detect_mode_deactivation("  Yeh MODE BAND karo yaar "));
        assert!(detect_mode_deactivation("Stop The Game please"));
    }

    #[test]
    fn default_mode_is_never_deactivated() {
        let r = resolve_mode(Mode::Default, "turn off");
        assert_eq!(r.effective, Mode::Default);
        assert!(!r.deactivated);
    }

    #[test]
    fn active_mode_falls_back_to_default() {
        let r = resolve_mode(Mode::Startup, "ok stop game mode now");
        assert_eq!(
            r,
            ModeResolution {
                effective: Mode::Default,
                deactivated: true
            }
        );
    }

    #[test]
    fn active_mode_kept_without_phrase() {
        let r = resolve_mode(Mode::Learn, "teach me about black holes");
        assert_eq!(r.effective, Mode::Learn);
        assert!(!r.deactivated);
    }
}
