//! HTTP/WebSocket surface of the sandman engine.
//!
//! One axum server exposes a health probe and two WebSocket endpoints,
//! `/ws/chat` and `/ws/story`. Each accepted socket gets its own
//! session object; nothing is shared between connections except the
//! config and the LLM gateway client.

pub mod api;
pub mod bootstrap;
pub mod cli;
pub mod state;
