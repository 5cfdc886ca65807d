//! Wire envelopes exchanged with clients over the duplex channel.
//!
//! Inbound parsing is deliberately lenient: unknown fields are ignored,
//! a missing `content` defaults to the empty string, and anything that
//! fails to parse — or carries an unknown `type` — is dropped silently.
//! Existing clients rely on silent non-responses being normal, so no
//! error envelope is ever introduced for malformed input.

use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Inbound
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Raw shape of an inbound envelope. Kept private; sessions only ever see
/// the typed [`InboundEvent`].
#[derive(Debug, Deserialize)]
struct RawInbound {
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    content: String,
    index: Option<i64>,
}

/// A parsed inbound client event.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    /// `{"type": "chat.message", "content": "..."}`
    ChatMessage { content: String },
    /// `{"type": "chat.rewind", "index": <int>}` — a missing index
    /// defaults to 0.
    ChatRewind { index: i64 },
    /// `{"type": "story.message", "content": "..."}`
    StoryMessage { content: String },
}

impl InboundEvent {
    /// Parse a raw text payload. Returns `None` for empty payloads,
    /// unparseable JSON, and unknown event types — all of which the
    /// caller drops without a reply.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }
        let parsed: RawInbound = serde_json::from_str(raw).ok()?;
        match parsed.kind.as_deref() {
            Some("chat.message") => Some(Self::ChatMessage {
                content: parsed.content,
            }),
            Some("chat.rewind") => Some(Self::ChatRewind {
                index: parsed.index.unwrap_or(0),
            }),
            Some("story.message") => Some(Self::StoryMessage {
                content: parsed.content,
            }),
            _ => None,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Outbound
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Metadata attached to assistant-authored outbound messages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssistantMeta {
    pub role: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_rewind: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_story: Option<bool>,
}

impl AssistantMeta {
    fn plain() -> Self {
        Self {
            role: "assistant",
            can_rewind: None,
            final_story: None,
        }
    }
}

/// An outbound server event, serialized verbatim onto the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum OutboundEvent {
    /// Signals that a gateway call is in flight; not a state change.
    #[serde(rename = "thinking.start")]
    ThinkingStart,

    #[serde(rename = "chat.message")]
    ChatMessage {
        content: String,
        metadata: AssistantMeta,
    },

    /// Echoes a successfully applied rewind.
    #[serde(rename = "chat.rewind")]
    ChatRewind { index: i64 },

    /// Carries the summary text after history compaction.
    #[serde(rename = "chat.summarized")]
    ChatSummarized { content: String },

    #[serde(rename = "story.message")]
    StoryMessage {
        content: String,
        metadata: AssistantMeta,
    },
}

impl OutboundEvent {
    /// An assistant chat reply, marked reversible.
    pub fn chat_reply(content: impl Into<String>) -> Self {
        Self::ChatMessage {
            content: content.into(),
            metadata: AssistantMeta {
                role: "assistant",
                can_rewind: Some(true),
                final_story: None,
            },
        }
    }

    /// An assistant story message (prompts, follow-ups, apologies).
    pub fn story_message(content: impl Into<String>) -> Self {
        Self::StoryMessage {
            content: content.into(),
            metadata: AssistantMeta::plain(),
        }
    }

    /// The completed story.
    pub fn final_story(content: impl Into<String>) -> Self {
        Self::StoryMessage {
            content: content.into(),
            metadata: AssistantMeta {
                role: "assistant",
                can_rewind: None,
                final_story: Some(true),
            },
        }
    }
}
