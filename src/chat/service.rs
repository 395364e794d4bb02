//! The chat adapter used by the HTTP layer.

use std::sync::Arc;

use tracing::debug;

use crate::chat::{ChatClient, ChatError, ContentStream};

/// Wraps a [`ChatClient`] and exposes the two questions the API can ask.
#[derive(Clone)]
pub struct ChatService {
    client: Arc<dyn ChatClient>,
}

impl ChatService {
    pub fn new(client: Arc<dyn ChatClient>) -> Self {
        Self { client }
    }

    /// Ask a question and wait for the full answer.
    pub async fn ask(&self, question: &str) -> Result<String, ChatError> {
        let answer = self.client.call(question).await?;
        debug!(answer_len = answer.len(), "Received answer");
        Ok(answer)
    }

    /// Ask a question and receive the answer as the provider streams it.
    pub async fn ask_streaming(&self, question: &str) -> Result<ContentStream, ChatError> {
        self.client.stream(question).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use futures::StreamExt;

    use super::*;

    /// Echoes the prompt back and counts calls.
    #[derive(Default)]
    struct EchoClient {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ChatClient for EchoClient {
        async fn call(&self, prompt: &str) -> Result<String, ChatError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("echo: {prompt}"))
        }

        async fn stream(&self, prompt: &str) -> Result<ContentStream, ChatError> {
            let words: Vec<Result<String, ChatError>> = prompt
                .split_whitespace()
                .map(|word| Ok(word.to_string()))
                .collect();
            Ok(Box::pin(futures::stream::iter(words)))
        }
    }

    #[tokio::test]
    async fn test_ask_returns_client_answer() {
        let client = Arc::new(EchoClient::default());
        let service = ChatService::new(client.clone());

        assert_eq!(service.ask("why").await.unwrap(), "echo: why");
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_ask_streaming_forwards_chunks_in_order() {
        let service = ChatService::new(Arc::new(EchoClient::default()));

        let chunks: Vec<String> = service
            .ask_streaming("one two three")
            .await
            .unwrap()
            .map(|chunk| chunk.unwrap())
            .collect()
            .await;

        assert_eq!(chunks, vec!["one", "two", "three"]);
    }
}
