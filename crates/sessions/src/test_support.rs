//! Shared test doubles for session tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use sm_domain::error::{Error, Result};
use sm_providers::{Completion, CompletionRequest, LlmGateway};
use tokio::sync::mpsc;

use crate::protocol::OutboundEvent;

/// Gateway double that replays scripted replies in order and records
/// every request it receives.
pub struct MockGateway {
    replies: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockGateway {
    pub fn scripted(replies: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Contents of the nth request's turns, for asserting prompt shape.
    pub fn request_contents(&self, n: usize) -> Vec<String> {
        let requests = self.requests.lock().unwrap();
        requests[n].turns.iter().map(|t| t.content.clone()).collect()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl LlmGateway for MockGateway {
    async fn complete(&self, req: CompletionRequest) -> Result<Completion> {
        self.requests.lock().unwrap().push(req);
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(content) => Ok(Completion {
                content,
                model: "mock-model".into(),
                stop_reason: Some("end_turn".into()),
            }),
            None => Err(Error::Gateway {
                gateway: "mock".into(),
                message: "script exhausted".into(),
            }),
        }
    }

    fn gateway_id(&self) -> &str {
        "mock"
    }
}

/// Drain everything currently buffered in the outbound channel.
pub fn drain(rx: &mut mpsc::Receiver<OutboundEvent>) -> Vec<OutboundEvent> {
    let mut out = Vec::new();
    while let Ok(event) = rx.try_recv() {
        out.push(event);
    }
    out
}
