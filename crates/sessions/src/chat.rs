//! Free-form chat session with rewind and history summarization.

use std::sync::Arc;

use sm_domain::config::ChatConfig;
use sm_domain::error::{Error, Result};
use sm_domain::turn::Turn;
use sm_providers::{CompletionRequest, LlmGateway};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::history::{compress, ConversationHistory};
use crate::prompts;
use crate::protocol::{InboundEvent, OutboundEvent};

/// One chat conversation, owned by a single connection.
///
/// Events are handled one at a time; the transport never calls into the
/// session concurrently, so the history needs no locking.
pub struct ChatSession {
    history: ConversationHistory,
    gateway: Arc<dyn LlmGateway>,
    outbound: mpsc::Sender<OutboundEvent>,
    summarize_threshold: usize,
}

impl ChatSession {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        outbound: mpsc::Sender<OutboundEvent>,
        config: &ChatConfig,
    ) -> Self {
        Self {
            history: ConversationHistory::new(),
            gateway,
            outbound,
            summarize_threshold: config.summarize_threshold_tokens,
        }
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    /// Handle one raw inbound payload. Unparseable payloads and events
    /// meant for other session kinds are dropped without a reply.
    pub async fn handle_raw(&mut self, raw: &str) -> Result<()> {
        match InboundEvent::parse(raw) {
            Some(InboundEvent::ChatMessage { content }) => self.handle_message(content).await,
            Some(InboundEvent::ChatRewind { index }) => self.handle_rewind(index).await,
            Some(InboundEvent::StoryMessage { .. }) | None => {
                debug!("dropping unhandled chat payload");
                Ok(())
            }
        }
    }

    async fn handle_message(&mut self, content: String) -> Result<()> {
        self.send(OutboundEvent::ThinkingStart).await?;

        self.history.push(Turn::human(content));
        let request = CompletionRequest::new(self.history.turns().to_vec());
        let completion = self.gateway.complete(request).await?;
        self.history.push(Turn::assistant(completion.content.clone()));

        if self.history.should_summarize(self.summarize_threshold) {
            self.summarize().await?;
        }

        self.send(OutboundEvent::chat_reply(completion.content)).await
    }

    /// Compact the history down to a summary turn plus the last two
    /// turns, and tell the client.
    async fn summarize(&mut self) -> Result<()> {
        let prompt = prompts::summarization_prompt(self.history.older_turns());
        let completion = self.gateway.complete(CompletionRequest::prompt(prompt)).await?;

        let before = self.history.len();
        self.history
            .replace(compress(self.history.turns(), &completion.content));
        info!(
            turns_before = before,
            turns_after = self.history.len(),
            "chat history summarized"
        );

        self.send(OutboundEvent::ChatSummarized {
            content: completion.content,
        })
        .await
    }

    async fn handle_rewind(&mut self, index: i64) -> Result<()> {
        if !self.history.rewind(index) {
            debug!(index, "rewind index out of range, ignoring");
            return Ok(());
        }
        info!(index, turns = self.history.len(), "chat history rewound");
        self.send(OutboundEvent::ChatRewind { index }).await
    }

    async fn send(&self, event: OutboundEvent) -> Result<()> {
        self.outbound
            .send(event)
            .await
            .map_err(|_| Error::Other("outbound channel closed".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{drain, MockGateway};

    fn session(replies: &[&str]) -> (ChatSession, mpsc::Receiver<OutboundEvent>, Arc<MockGateway>) {
        let gateway = MockGateway::scripted(replies);
        let (tx, rx) = mpsc::channel(64);
        let session = ChatSession::new(gateway.clone(), tx, &ChatConfig::default());
        (session, rx, gateway)
    }

    fn session_with_threshold(
        replies: &[&str],
        threshold: usize,
    ) -> (ChatSession, mpsc::Receiver<OutboundEvent>, Arc<MockGateway>) {
        let gateway = MockGateway::scripted(replies);
        let (tx, rx) = mpsc::channel(64);
        let config = ChatConfig {
            summarize_threshold_tokens: threshold,
        };
        let session = ChatSession::new(gateway.clone(), tx, &config);
        (session, rx, gateway)
    }

    #[tokio::test]
    async fn message_emits_thinking_then_reply() {
        let (mut session, mut rx, _) = session(&["Hello back"]);
        session
            .handle_raw(r#"{"type":"chat.message","content":"Hello"}"#)
            .await
            .unwrap();

        let events = drain(&mut rx);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], OutboundEvent::ThinkingStart);
        assert_eq!(events[1], OutboundEvent::chat_reply("Hello back"));
        assert_eq!(session.history().len(), 2);
    }

    #[tokio::test]
    async fn request_carries_full_history() {
        let (mut session, _rx, gateway) = session(&["one", "two"]);
        session
            .handle_raw(r#"{"type":"chat.message","content":"first"}"#)
            .await
            .unwrap();
        session
            .handle_raw(r#"{"type":"chat.message","content":"second"}"#)
            .await
            .unwrap();

        assert_eq!(gateway.request_contents(0), vec!["first"]);
        assert_eq!(
            gateway.request_contents(1),
            vec!["first", "one", "second"]
        );
    }

    #[tokio::test]
    async fn rewind_truncates_and_echoes() {
        let (mut session, mut rx, _) = session(&["a", "b"]);
        session
            .handle_raw(r#"{"type":"chat.message","content":"1"}"#)
            .await
            .unwrap();
        session
            .handle_raw(r#"{"type":"chat.message","content":"2"}"#)
            .await
            .unwrap();
        assert_eq!(session.history().len(), 4);

        session
            .handle_raw(r#"{"type":"chat.rewind","index":1}"#)
            .await
            .unwrap();
        assert_eq!(session.history().len(), 2);

        let events = drain(&mut rx);
        assert_eq!(
            events.last(),
            Some(&OutboundEvent::ChatRewind { index: 1 })
        );
    }

    #[tokio::test]
    async fn out_of_range_rewind_is_silent() {
        let (mut session, mut rx, _) = session(&["a"]);
        session
            .handle_raw(r#"{"type":"chat.message","content":"1"}"#)
            .await
            .unwrap();
        drain(&mut rx);

        session
            .handle_raw(r#"{"type":"chat.rewind","index":99}"#)
            .await
            .unwrap();
        session
            .handle_raw(r#"{"type":"chat.rewind","index":-2}"#)
            .await
            .unwrap();
        assert!(drain(&mut rx).is_empty());
        assert_eq!(session.history().len(), 2);
    }

    #[tokio::test]
    async fn summarization_compacts_history_and_notifies() {
        // Threshold of 1 token trips immediately after the first exchange.
        let (mut session, mut rx, gateway) =
            session_with_threshold(&["a long reply", "the summary", "next reply"], 1);

        session
            .handle_raw(r#"{"type":"chat.message","content":"a long message"}"#)
            .await
            .unwrap();

        let events = drain(&mut rx);
        assert_eq!(events[0], OutboundEvent::ThinkingStart);
        assert_eq!(
            events[1],
            OutboundEvent::ChatSummarized {
                content: "the summary".into()
            }
        );
        assert_eq!(events[2], OutboundEvent::chat_reply("a long reply"));

        assert_eq!(session.history().len(), 3);
        assert_eq!(
            session.history().turns()[0].content,
            "Previous conversation summary: the summary"
        );

        // The summarization request is a single synthetic prompt.
        let summary_request = gateway.request_contents(1);
        assert_eq!(summary_request.len(), 1);
        assert!(summary_request[0].contains("Conversation to summarize:"));
    }

    #[tokio::test]
    async fn gateway_failure_propagates() {
        let (mut session, mut rx, _) = session(&[]);
        let err = session
            .handle_raw(r#"{"type":"chat.message","content":"hi"}"#)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Gateway { .. }));
        // thinking.start already went out before the failure
        assert_eq!(drain(&mut rx), vec![OutboundEvent::ThinkingStart]);
        // the human turn appended before the failing call stays: partial
        // mutation is not rolled back
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history().turns()[0], Turn::human("hi"));
    }

    #[tokio::test]
    async fn story_payloads_are_ignored() {
        let (mut session, mut rx, gateway) = session(&["unused"]);
        session
            .handle_raw(r#"{"type":"story.message","content":"hi"}"#)
            .await
            .unwrap();
        session.handle_raw("garbage").await.unwrap();
        assert!(drain(&mut rx).is_empty());
        assert_eq!(gateway.request_count(), 0);
    }
}
