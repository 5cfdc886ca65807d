pub mod anthropic;
pub mod traits;
pub(crate) mod util;

// Re-exports for convenience.
pub use anthropic::AnthropicGateway;
pub use traits::{Completion, CompletionRequest, LlmGateway};
