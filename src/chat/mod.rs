//! Chat-completion client and the service that wraps it.
//!
//! - [`ChatClient`]: the seam to the external provider ("send text, receive
//!   text or a stream of text")
//! - [`deepseek`]: OpenAI-compatible HTTP client for the DeepSeek API
//! - [`service`]: the adapter used by the HTTP layer

pub mod deepseek;
pub mod service;

use std::pin::Pin;

use async_trait::async_trait;
use futures::stream::Stream;
use thiserror::Error;

/// An ordered stream of content chunks from the provider.
pub type ContentStream = Pin<Box<dyn Stream<Item = Result<String, ChatError>> + Send + 'static>>;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned {status}: {body}")]
    Provider {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to decode provider response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Provider returned no content")]
    EmptyResponse,
}

/// A chat-completion provider.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send `prompt` as a single user message and return the full answer.
    async fn call(&self, prompt: &str) -> Result<String, ChatError>;

    /// Send `prompt` and return the answer as it is generated.
    async fn stream(&self, prompt: &str) -> Result<ContentStream, ChatError>;
}
