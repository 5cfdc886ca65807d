//! Shared domain types for sandman: conversation turns, the common error
//! type, and the configuration tree.

pub mod config;
pub mod error;
pub mod turn;
