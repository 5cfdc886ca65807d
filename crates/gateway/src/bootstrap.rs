//! AppState construction extracted from `main.rs`.

use std::sync::Arc;

use anyhow::Context;

use sm_domain::config::{Config, ConfigSeverity};
use sm_providers::{AnthropicGateway, LlmGateway};

use crate::state::AppState;

/// Validate config, initialize the LLM gateway and return a fully-wired
/// [`AppState`].
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

    // ── LLM gateway ──────────────────────────────────────────────────
    let llm: Arc<dyn LlmGateway> = Arc::new(
        AnthropicGateway::from_config(&config.llm).context("initializing LLM gateway")?,
    );
    tracing::info!(
        gateway = llm.gateway_id(),
        model = %config.llm.model,
        "LLM gateway ready"
    );

    Ok(AppState { config, llm })
}
