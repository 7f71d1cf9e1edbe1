//! REST client for an OpenAI-compatible chat-completions endpoint.

use std::time::Duration;

use serde::Deserialize;

use crate::config::OpenAiConfig;

/// HTTP request timeout. Vision completions are slow; well above the
/// latency of a text-only call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// A chat completion as returned by the endpoint, reduced to the fields this
/// service reads.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletion {
    /// Server-assigned completion identifier.
    #[serde(default)]
    pub id: String,
    /// The model that actually served the request.
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ChatMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessage {
    pub content: Option<String>,
}

impl ChatCompletion {
    /// Text of the first choice, or the empty string when the endpoint
    /// returned no usable message.
    pub fn content(&self) -> &str {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .unwrap_or("")
    }
}

/// Errors from the chat-completions layer.
#[derive(Debug, thiserror::Error)]
pub enum ChatApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint returned a non-2xx status code.
    #[error("Chat API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

/// Seam for handlers: anything that can run one chat completion.
#[async_trait::async_trait]
pub trait ChatCompletions: Send + Sync {
    /// Run a completion over the given messages and return the parsed
    /// response.
    async fn complete(
        &self,
        messages: &[serde_json::Value],
    ) -> Result<ChatCompletion, ChatApiError>;
}

/// Production client for a single OpenAI-compatible endpoint.
pub struct ChatClient {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl ChatClient {
    /// Create a client with a pre-configured HTTP connection pool.
    pub fn new(config: OpenAiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { client, config }
    }

    /// Ensure the response has a success status code. Returns the response
    /// unchanged on success, or a [`ChatApiError::Api`] containing the
    /// status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ChatApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ChatApiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait::async_trait]
impl ChatCompletions for ChatClient {
    async fn complete(
        &self,
        messages: &[serde_json::Value],
    ) -> Result<ChatCompletion, ChatApiError> {
        let body = serde_json::json!({
            "model": self.config.model,
            "temperature": self.config.temperature,
            "messages": messages,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let completion: ChatCompletion = response.json().await?;

        tracing::debug!(
            completion_id = %completion.id,
            model = %completion.model,
            "Chat completion received"
        );

        Ok(completion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_reads_first_choice() {
        let completion: ChatCompletion = serde_json::from_value(serde_json::json!({
            "id": "cmpl-123",
            "model": "gpt-4o-mini",
            "choices": [
                {"message": {"content": "{\"condition\":\"Acne\"}"}},
                {"message": {"content": "ignored"}},
            ],
        }))
        .unwrap();

        assert_eq!(completion.content(), "{\"condition\":\"Acne\"}");
    }

    #[test]
    fn missing_choices_or_content_read_as_empty() {
        let empty: ChatCompletion = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(empty.content(), "");
        assert_eq!(empty.id, "");

        let null_content: ChatCompletion = serde_json::from_value(serde_json::json!({
            "id": "cmpl-456",
            "choices": [{"message": {"content": null}}],
        }))
        .unwrap();
        assert_eq!(null_content.content(), "");
    }
}
