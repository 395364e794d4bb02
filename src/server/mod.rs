//! HTTP server exposing the question endpoints.
//!
//! - [`api`]: Route handlers and shared state
//! - [`streaming`]: Timer-driven SSE parts for the streaming endpoint

pub mod api;
pub mod streaming;
