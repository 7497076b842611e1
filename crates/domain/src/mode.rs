use serde::{Deserialize, Serialize};

/// Conversational persona selected by the client's `active_mode` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Learn,
    English,
    Startup,
    #[default]
    Default,
}

impl Mode {
    /// Parse a client-supplied mode tag. Absent or unknown tags fall back to
    /// [`Mode::Default`] instead of failing.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag.map(|t| t.trim().to_ascii_lowercase()).as_deref() {
            Some("learn") => Mode::Learn,
            Some("english") => Mode::English,
            Some("startup") => Mode::Startup,
            _ => Mode::Default,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Learn => "learn",
            Mode::English => "english",
            Mode::Startup => "startup",
            Mode::Default => "default",
        }
    }

    pub fn is_default(self) -> bool {
        self == Mode::Default
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generation parameters and history window for one mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeSettings {
    pub max_tokens: u32,
    pub temperature: f32,
    /// Number of prior turns forwarded to the provider.
    pub context_window: usize,
}

impl ModeSettings {
    /// Built-in settings for a mode.
    pub fn builtin(mode: Mode) -> Self {
        match mode {
            Mode::Learn => Self {
                max_tokens: 3072,
                temperature: 0.6,
                context_window: 12,
            },
            Mode::English => Self {
                max_tokens: 2048,
                temperature: 0.7,
                context_window: 10,
            },
            Mode::Startup => Self {
                max_tokens: 3072,
                temperature: 0.8,
                context_window: 8,
            },
            Mode::Default => Self {
                max_tokens: 2048,
                temperature: 0.7,
                context_window: 10,
            },
        }
    }
}

impl Default for ModeSettings {
    fn default() -> Self {
        Self::builtin(Mode::Default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tags_parse() {
        assert_eq!(Mode::from_tag(Some("learn")), Mode::Learn);
        assert_eq!(Mode::from_tag(Some("English")), Mode::English);
        assert_eq!(Mode::from_tag(Some(" startup ")), Mode::Startup);
    }

    #[test]
    fn unknown_or_missing_tag_is_default() {
        assert_eq!(Mode::from_tag(None), Mode::Default);
        assert_eq!(Mode::from_tag(Some("poetry")), Mode::Default);
        assert_eq!(Mode::from_tag(Some("")), Mode::Default);
    }

    #[test]
    fn default_settings_match_default_mode() {
        assert_eq!(ModeSettings::default(), ModeSettings::builtin(Mode::Default));
    }
}
