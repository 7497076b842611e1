mod llm;
mod modes;
mod observability;
mod search;
mod server;

pub use llm::*;
pub use modes::*;
pub use observability::*;
pub use search::*;
pub use server::*;

use serde::{Deserialize, Serialize};
use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub modes: ModesConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub stream: StreamConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Apply environment overrides that take precedence over the file.
    ///
    /// Currently only `CORS_ORIGINS` (comma-separated origin list).
    pub fn apply_env_overrides(&mut self) {
        if let Ok(raw) = std::env::var("CORS_ORIGINS") {
            let origins = parse_origin_list(&raw);
            if !origins.is_empty() {
                self.server.cors.allowed_origins = origins;
            }
        }
    }
}

/// Split a comma-separated origin list, dropping blanks.
pub fn parse_origin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl ConfigError {
    fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: ConfigSeverity::Error,
            field: field.into(),
            message: message.into(),
        }
    }

    fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: ConfigSeverity::Warning,
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl Config {
    /// Validate the configuration and return a list of issues.
    ///
    /// Returns an empty vec when everything looks good.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.server.port == 0 {
            errors.push(ConfigError::error("server.port", "port must be greater than 0"));
        }
        if self.server.host.is_empty() {
            errors.push(ConfigError::error("server.host", "host must not be empty"));
        }

        if self.llm.base_url.is_empty() {
            errors.push(ConfigError::error("llm.base_url", "base_url must not be empty"));
        }
        if self.llm.model.is_empty() {
            errors.push(ConfigError::error("llm.model", "model must not be empty"));
        }
        if self.llm.timeout_ms == 0 {
            errors.push(ConfigError::error("llm.timeout_ms", "timeout must be greater than 0"));
        }
        if !(0.0..=1.0).contains(&self.llm.top_p) {
            errors.push(ConfigError::error("llm.top_p", "top_p must be within 0.0..=1.0"));
        }
        if self.llm.auth.env.is_none() && self.llm.auth.key.is_none() {
            errors.push(ConfigError::warning(
                "llm.auth",
                "no credential source configured; /chat endpoints will report a configuration error",
            ));
        }

        for (mode, settings) in self.modes.iter() {
            let field = format!("modes.{mode}");
            if settings.max_tokens == 0 {
                errors.push(ConfigError::error(
                    format!("{field}.max_tokens"),
                    "max_tokens must be greater than 0",
                ));
            }
            if !(0.0..=2.0).contains(&settings.temperature) {
                errors.push(ConfigError::error(
                    format!("{field}.temperature"),
                    "temperature must be within 0.0..=2.0",
                ));
            }
            if settings.context_window == 0 {
                errors.push(ConfigError::warning(
                    format!("{field}.context_window"),
                    "context_window is 0; only the system prompt will be sent",
                ));
            }
        }

        if self.search.max_results == 0 || self.search.max_results > SearchConfig::MAX_RESULTS_CAP {
            errors.push(ConfigError::warning(
                "search.max_results",
                format!(
                    "max_results {} is outside 1..={}; it will be clamped",
                    self.search.max_results,
                    SearchConfig::MAX_RESULTS_CAP
                ),
            ));
        }

        if self.memory.window == 0 {
            errors.push(ConfigError::error("memory.window", "window must be greater than 0"));
        }

        if self.stream.pace_ms > 1_000 {
            errors.push(ConfigError::warning(
                "stream.pace_ms",
                "pace above one second will make streaming feel stalled",
            ));
        }

        errors
    }
}
