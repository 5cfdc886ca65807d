pub mod health;
pub mod ws;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

/// Build the full API router.
///
/// Everything is public: client sessions are anonymous and carry no
/// credentials, so there is no auth middleware here.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/ws/chat", get(ws::chat_ws))
        .route("/ws/story", get(ws::story_ws))
}
