//! DeepSeek chat-completion client.
//!
//! Speaks the OpenAI-compatible protocol:
//! - POST {base_url}/chat/completions (JSON response)
//! - POST {base_url}/chat/completions with `stream: true` (SSE response)

use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures::{future, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::chat::{ChatClient, ChatError, ContentStream};
use crate::config::ProviderConfig;

// ─── Wire Types ────────────────────────────────────────────────────────────

/// Chat completion request body.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Chat completion response (non-streaming).
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Streaming chat completion chunk.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionChunk {
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,

    /// Set when the provider aborts the stream with an error payload.
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct ChunkChoice {
    #[serde(default)]
    pub delta: ChunkDelta,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChunkDelta {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionChunk {
    /// The provider's error, or the non-empty content of the first choice.
    fn into_item(self) -> Option<Result<String, ChatError>> {
        if let Some(error) = self.error {
            let message = error
                .get("message")
                .and_then(|m| m.as_str())
                .or_else(|| error.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return Some(Err(ChatError::Stream(message)));
        }

        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta.content)
            .filter(|content| !content.is_empty())
            .map(Ok)
    }
}

// ─── Client ────────────────────────────────────────────────────────────────

/// HTTP client for an OpenAI-compatible chat-completion endpoint.
pub struct DeepSeekClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    temperature: Option<f64>,
    request_timeout: std::time::Duration,
}

impl DeepSeekClient {
    /// Create a client from provider settings.
    pub fn new(config: &ProviderConfig) -> Result<Self, ChatError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.request_timeout())
            .build()?;

        let api_key = config.resolve_api_key();
        if api_key.is_none() {
            warn!(
                env = config.api_key_env,
                "No API key configured; provider requests will be unauthenticated"
            );
        }

        Ok(Self {
            http,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            api_key,
            temperature: config.temperature,
            request_timeout: config.request_timeout(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request_body(&self, prompt: &str, stream: bool) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            stream,
            temperature: self.temperature,
        }
    }

    /// Send a request and turn a non-2xx status into [`ChatError::Provider`].
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ChatError> {
        let request = match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = body, "Provider returned an error");
            return Err(ChatError::Provider { status, body });
        }

        Ok(response)
    }
}

#[async_trait]
impl ChatClient for DeepSeekClient {
    async fn call(&self, prompt: &str) -> Result<String, ChatError> {
        debug!(model = self.model, prompt_len = prompt.len(), "Sending chat completion");

        let request = self
            .http
            .post(&self.endpoint)
            .timeout(self.request_timeout)
            .json(&self.request_body(prompt, false));
        let response = self.send(request).await?;

        let text = response.text().await?;
        let completion: ChatCompletionResponse = serde_json::from_str(&text)?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(ChatError::EmptyResponse)
    }

    async fn stream(&self, prompt: &str) -> Result<ContentStream, ChatError> {
        debug!(model = self.model, prompt_len = prompt.len(), "Opening chat completion stream");

        let request = self
            .http
            .post(&self.endpoint)
            .json(&self.request_body(prompt, true));
        let response = self.send(request).await?;

        let stream = response
            .bytes_stream()
            .eventsource()
            .take_while(|event| {
                future::ready(!matches!(event, Ok(event) if event.data.trim() == "[DONE]"))
            })
            .filter_map(|event| async move {
                match event {
                    Ok(event) if event.data.trim().is_empty() => None,
                    Ok(event) => match serde_json::from_str::<ChatCompletionChunk>(&event.data) {
                        Ok(chunk) => chunk.into_item(),
                        Err(e) => Some(Err(ChatError::Decode(e))),
                    },
                    Err(e) => Some(Err(ChatError::Stream(e.to_string()))),
                }
            });

        Ok(Box::pin(stream))
    }
}
