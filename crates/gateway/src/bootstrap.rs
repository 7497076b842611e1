//! AppState construction extracted from `main.rs`.

use std::sync::Arc;

use anyhow::Context;

use nx_domain::config::{Config, ConfigSeverity};
use nx_domain::error::Error;
use nx_prompting::LiveSearchTrigger;
use nx_providers::{LlmProvider, OpenAiCompatProvider, SearchProvider, TavilySearch};

use crate::state::AppState;

/// Validate config and build every shared component.
///
/// Missing credentials are not fatal: the provider or search slot is left
/// empty and the affected endpoints degrade in-band.
pub fn build_app_state(config: Arc<Config>) -> anyhow::Result<AppState> {
    // ── Config validation ────────────────────────────────────────────
    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            ConfigSeverity::Warning => tracing::warn!("config: {issue}"),
            ConfigSeverity::Error => tracing::error!("config: {issue}"),
        }
    }
    if issues.iter().any(|i| i.severity == ConfigSeverity::Error) {
        anyhow::bail!(
            "config validation failed with {} error(s)",
            issues
                .iter()
                .filter(|i| i.severity == ConfigSeverity::Error)
                .count()
        );
    }

    // ── LLM provider ─────────────────────────────────────────────────
    let llm: Option<Arc<dyn LlmProvider>> = match OpenAiCompatProvider::from_config(&config.llm) {
        Ok(p) => {
            tracing::info!(
                provider = %config.llm.id,
                model = %config.llm.model,
                base_url = %config.llm.base_url,
                "LLM provider ready"
            );
            Some(Arc::new(p))
        }
        Err(Error::Auth(msg)) => {
            tracing::warn!(provider = %config.llm.id, reason = %msg, "LLM provider not configured, chat endpoints will report it in-band");
            None
        }
        Err(e) => return Err(e).context("initializing LLM provider"),
    };

    // ── Web search ───────────────────────────────────────────────────
    let search: Option<Arc<dyn SearchProvider>> = match TavilySearch::from_config(&config.search) {
        Ok(s) => {
            tracing::info!(
                max_results = config.search.effective_max_results(),
                "live search ready"
            );
            Some(Arc::new(s))
        }
        Err(Error::Auth(msg)) => {
            tracing::info!(reason = %msg, "live search disabled");
            None
        }
        Err(e) => return Err(e).context("initializing search client"),
    };

    let live_trigger =
        Arc::new(LiveSearchTrigger::new().context("compiling live-search patterns")?);

    Ok(AppState {
        config,
        llm,
        search,
        live_trigger,
    })
}
