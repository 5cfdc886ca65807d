use std::sync::Arc;

use sm_domain::config::Config;
use sm_providers::LlmGateway;

/// Shared application state passed to all handlers.
///
/// Deliberately small: sessions are per-connection and never stored
/// here, so the state is just the immutable config plus the shared
/// LLM gateway client.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub llm: Arc<dyn LlmGateway>,
}
