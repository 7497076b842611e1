use serde::{Deserialize, Serialize};

use crate::mode::{Mode, ModeSettings};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Per-mode generation settings
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Lookup table of [`ModeSettings`] keyed by mode.
///
/// Each entry may be overridden from `[modes.<name>]`. Keys left out of a
/// table, and tables left out entirely, keep that mode's built-in values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RawModes")]
pub struct ModesConfig {
    pub default: ModeSettings,
    pub learn: ModeSettings,
    pub english: ModeSettings,
    pub startup: ModeSettings,
}

impl ModesConfig {
    pub fn settings_for(&self, mode: Mode) -> ModeSettings {
        match mode {
            Mode::Learn => self.learn,
            Mode::English => self.english,
            Mode::Startup => self.startup,
            Mode::Default => self.default,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Mode, ModeSettings)> + '_ {
        [Mode::Default, Mode::Learn, Mode::English, Mode::Startup]
            .into_iter()
            .map(|m| (m, self.settings_for(m)))
    }
}

impl Default for ModesConfig {
    fn default() -> Self {
        RawModes::default().into()
    }
}

// ── On-disk shape ──────────────────────────────────────────────────

/// One `[modes.<name>]` table as written; every key is optional.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
struct SettingsOverride {
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    context_window: Option<usize>,
}

impl SettingsOverride {
    fn over(self, mode: Mode) -> ModeSettings {
        let base = ModeSettings::builtin(mode);
        ModeSettings {
            max_tokens: self.max_tokens.unwrap_or(base.max_tokens),
            temperature: self.temperature.unwrap_or(base.temperature),
            context_window: self.context_window.unwrap_or(base.context_window),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawModes {
    default: SettingsOverride,
    learn: SettingsOverride,
    english: SettingsOverride,
    startup: SettingsOverride,
}

impl From<RawModes> for ModesConfig {
    fn from(raw: RawModes) -> Self {
        Self {
            default: raw.default.over(Mode::Default),
            learn: raw.learn.over(Mode::Learn),
            english: raw.english.over(Mode::English),
            startup: raw.startup.over(Mode::Startup),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_builtin_table() {
        let cfg: ModesConfig = toml::from_str("").unwrap();
        for (mode, settings) in cfg.iter() {
            assert_eq!(settings, ModeSettings::builtin(mode));
        }
    }

    #[test]
    fn single_mode_override() {
        let toml_str = r#"
            [startup]
            max_tokens = 1024
            temperature = 0.9
            context_window = 4
        "#;
        let cfg: ModesConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.settings_for(Mode::Startup).max_tokens, 1024);
        assert_eq!(cfg.settings_for(Mode::Startup).context_window, 4);
        assert_eq!(cfg.settings_for(Mode::Learn), ModeSettings::builtin(Mode::Learn));
    }

    #[test]
    fn partial_table_keeps_builtin_for_missing_keys() {
        let cfg: ModesConfig = toml::from_str("[startup]\nmax_tokens = 1024\n").unwrap();
        let startup = cfg.settings_for(Mode::Startup);
        assert_eq!(startup.max_tokens, 1024);
        assert_eq!(startup.temperature, ModeSettings::builtin(Mode::Startup).temperature);
        assert_eq!(startup.context_window, 8);

        let cfg: ModesConfig = toml::from_str("[learn]\ntemperature = 0.2\n").unwrap();
        assert_eq!(cfg.settings_for(Mode::Learn).max_tokens, 3072);
        assert_eq!(cfg.settings_for(Mode::Learn).context_window, 12);
    }

    #[test]
    fn shown_config_parses_back() {
        let cfg = ModesConfig::default();
        let text = toml::to_string(&cfg).unwrap();
        let back: ModesConfig = toml::from_str(&text).unwrap();
        for (mode, settings) in back.iter() {
            assert_eq!(settings, cfg.settings_for(mode));
        }
    }
}
