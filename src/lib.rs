//! deepseek-gateway: a thin HTTP front for the DeepSeek chat API.
//!
//! Forwards a question to the provider and returns the answer as plain
//! text, and serves a timer-driven SSE demo stream alongside it.

pub mod chat;
pub mod config;
pub mod server;
