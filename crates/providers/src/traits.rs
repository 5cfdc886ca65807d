use sm_domain::error::Result;
use sm_domain::turn::Turn;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Request / Response types
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A gateway-agnostic completion request: an ordered sequence of turns.
///
/// Model, temperature, timeout, and stop sequences are fixed per gateway
/// instance (established once per connection from config), so requests
/// carry only the conversation itself.
#[derive(Debug, Clone, Default)]
pub struct CompletionRequest {
    /// The turns to send, in dialogue order.
    pub turns: Vec<Turn>,
}

impl CompletionRequest {
    pub fn new(turns: Vec<Turn>) -> Self {
        Self { turns }
    }

    /// A single-turn ad hoc prompt (story stages, filters, summarization).
    pub fn prompt(text: impl Into<String>) -> Self {
        Self { turns: vec![Turn::human(text)] }
    }
}

/// A single completion returned by the gateway.
#[derive(Debug, Clone)]
pub struct Completion {
    /// Textual content of the completion.
    pub content: String,
    /// The model that actually produced it.
    pub model: String,
    /// The reason the model stopped generating, when reported.
    pub stop_reason: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Core gateway trait
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The external hosted language-model completion service.
///
/// Implementations translate between our internal [`Turn`] sequence and the
/// wire format of the hosted API. The gateway is treated as a black box with
/// possible latency, timeout, and transient failure — a failed call fails
/// the event that triggered it, with no automatic retry.
#[async_trait::async_trait]
pub trait LlmGateway: Send + Sync {
    /// Send a completion request and wait for the full response.
    async fn complete(&self, req: CompletionRequest) -> Result<Completion>;

    /// A unique identifier for this gateway instance.
    fn gateway_id(&self) -> &str;
}
