//! The sandman conversation-session engine.
//!
//! One session per connection, created on connect and dropped on
//! disconnect, with no persistence. Two session kinds exist:
//!
//! - [`ChatSession`]: free-form chat with rewind and bounded-context
//!   summarization.
//! - [`StorySession`]: a guided, staged bedtime-story workflow with
//!   content-safety gating and a single retry on filter rejection.
//!
//! Sessions receive raw inbound payloads from the transport and push
//! [`protocol::OutboundEvent`]s into an mpsc channel the transport drains.

pub mod chat;
pub mod history;
pub mod prompts;
pub mod protocol;
pub mod story;

#[cfg(test)]
pub(crate) mod test_support;

pub use chat::ChatSession;
pub use history::{compress, ConversationHistory};
pub use protocol::{InboundEvent, OutboundEvent};
pub use story::{StoryProfile, StorySession, StoryStage};
