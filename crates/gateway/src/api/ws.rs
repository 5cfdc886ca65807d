//! WebSocket endpoints for client sessions.
//!
//! Flow:
//! 1. Client connects to `/ws/chat` or `/ws/story`
//! 2. A fresh session object is created for the connection (story
//!    sessions greet the client immediately)
//! 3. Inbound text frames are handled strictly one at a time, in
//!    arrival order; outbound events flow through an mpsc channel
//!    drained by a dedicated writer task, so mid-handling events like
//!    `thinking.start` reach the client before the reply does
//! 4. On disconnect the session is dropped — no state survives

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use sm_sessions::{ChatSession, OutboundEvent, StorySession};

use crate::state::AppState;

/// Outbound channel depth per connection. The reader loop blocks while
/// a handler runs, so this only needs to absorb one handler's burst.
const OUTBOUND_BUFFER: usize = 64;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Handlers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// GET /ws/chat — upgrade to a free-form chat session.
pub async fn chat_ws(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| async move {
        let (outbound_tx, outbound_rx) = mpsc::channel(OUTBOUND_BUFFER);
        let session = ChatSession::new(state.llm.clone(), outbound_tx, &state.config.chat);
        handle_socket(socket, Session::Chat(session), outbound_rx, "chat").await;
    })
}

/// GET /ws/story — upgrade to a guided story session.
pub async fn story_ws(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| async move {
        let (outbound_tx, outbound_rx) = mpsc::channel(OUTBOUND_BUFFER);
        let session = StorySession::new(state.llm.clone(), outbound_tx);
        if let Err(e) = session.on_connect().await {
            tracing::warn!(error = %e, "story greeting failed before loop start");
        }
        handle_socket(socket, Session::Story(session), outbound_rx, "story").await;
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Socket loop
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

enum Session {
    Chat(ChatSession),
    Story(StorySession),
}

impl Session {
    async fn handle_raw(&mut self, raw: &str) -> sm_domain::error::Result<()> {
        match self {
            Session::Chat(session) => session.handle_raw(raw).await,
            Session::Story(session) => session.handle_raw(raw).await,
        }
    }
}

async fn handle_socket(
    socket: WebSocket,
    mut session: Session,
    mut outbound_rx: mpsc::Receiver<OutboundEvent>,
    kind: &'static str,
) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    let (mut ws_sink, mut ws_stream) = socket.split();

    tracing::info!(conn_id = %conn_id, kind, "session connected");

    // Writer task: forwards outbound channel events to the WS sink.
    let writer_conn_id = conn_id.clone();
    let writer = tokio::spawn(async move {
        while let Some(event) = outbound_rx.recv().await {
            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!(conn_id = %writer_conn_id, error = %e, "outbound serialization failed");
                    continue;
                }
            };
            if ws_sink.send(Message::Text(json)).await.is_err() {
                break;
            }
        }
    });

    // Reader loop: events are processed strictly in arrival order. A
    // handler failure drops the event and keeps the connection open.
    while let Some(Ok(msg)) = ws_stream.next().await {
        match msg {
            Message::Text(text) => {
                if let Err(e) = session.handle_raw(&text).await {
                    tracing::error!(conn_id = %conn_id, kind, error = %e, "event handling failed");
                }
            }
            Message::Close(_) => break,
            Message::Ping(_) | Message::Pong(_) => {
                // axum handles WS-level ping/pong automatically.
            }
            _ => {}
        }
    }

    writer.abort();
    tracing::info!(conn_id = %conn_id, kind, "session disconnected");
}
