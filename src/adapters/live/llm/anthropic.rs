//! Live adapter for the `LlmClient` port using the Anthropic messages API.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{endpoint, send_json};
use crate::ports::llm::{ChatRequest, CompletionResponse, LlmClient, LlmError, LlmFuture};

/// Public Anthropic endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Live LLM client that calls the Anthropic Claude API.
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl AnthropicClient {
    /// Creates a client; `base_url` defaults to [`DEFAULT_BASE_URL`].
    #[must_use]
    pub fn new(api_key: impl Into<String>, base_url: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }
}

/// Request body sent to the Anthropic messages API.
#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<AnthropicMessage<'a>>,
}

/// A single message in the Anthropic API request.
#[derive(Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Top-level response from the Anthropic messages API.
#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
    #[serde(default)]
    usage: Usage,
}

/// A content block in the Anthropic response; only text blocks carry `text`.
#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

/// Token usage reported by the Anthropic API.
#[derive(Default, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

impl LlmClient for AnthropicClient {
    fn complete(&self, request: &ChatRequest) -> LlmFuture<'_> {
        let request = request.clone();

        Box::pin(async move {
            let body = AnthropicRequest {
                model: &request.model,
                max_tokens: request.max_tokens,
                messages: request
                    .messages
                    .iter()
                    .map(|m| AnthropicMessage { role: m.role.as_str(), content: &m.content })
                    .collect(),
            };

            let http = self
                .client
                .post(endpoint(&self.base_url, "/v1/messages"))
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&body);
            let response: AnthropicResponse = send_json("Anthropic", http).await?;

            let text =
                response.content.into_iter().filter_map(|block| block.text).collect::<String>();
            if text.is_empty() {
                return Err(LlmError::EmptyReply);
            }

            Ok(CompletionResponse {
                text,
                prompt_tokens: response.usage.input_tokens,
                completion_tokens: response.usage.output_tokens,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use super::*;
    use crate::ports::llm::ChatMessage;

    fn request() -> ChatRequest {
        ChatRequest {
            model: "claude-sonnet-4-5".into(),
            messages: vec![
                ChatMessage::user("prompt"),
                ChatMessage::assistant("feat: first"),
                ChatMessage::user("shorter"),
            ],
            max_tokens: 1000,
        }
    }

    #[tokio::test]
    async fn sends_history_and_joins_text_blocks() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/messages")
            .match_header("x-api-key", "secret")
            .match_header("anthropic-version", ANTHROPIC_VERSION)
            .match_body(Matcher::PartialJson(json!({
                "model": "claude-sonnet-4-5",
                "max_tokens": 1000,
                "messages": [
                    {"role": "user", "content": "prompt"},
                    {"role": "assistant", "content": "feat: first"},
                    {"role": "user", "content": "shorter"}
                ]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "content": [
                        {"type": "text", "text": "feat: "},
                        {"type": "tool_use", "id": "t"},
                        {"type": "text", "text": "short"}
                    ],
                    "usage": {"input_tokens": 12, "output_tokens": 3}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = AnthropicClient::new("secret", Some(server.url()));
        let response = client.complete(&request()).await.unwrap();

        assert_eq!(response.text, "feat: short");
        assert_eq!(response.prompt_tokens, 12);
        assert_eq!(response.completion_tokens, 3);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn api_error_carries_status_and_message() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/messages")
            .with_status(401)
            .with_body(
                json!({"error": {"type": "auth", "message": "invalid x-api-key"}}).to_string(),
            )
            .create_async()
            .await;

        let client = AnthropicClient::new("bad", Some(server.url()));
        let err = client.complete(&request()).await.unwrap_err();

        let LlmError::Api { status, message } = err else {
            panic!("expected an API error, got {err:?}");
        };
        assert_eq!(status, 401);
        assert_eq!(message, "invalid x-api-key");
    }

    #[tokio::test]
    async fn reply_without_text_is_empty_reply() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/messages")
            .with_status(200)
            .with_body(json!({"content": []}).to_string())
            .create_async()
            .await;

        let client = AnthropicClient::new("k", Some(server.url()));
        assert!(matches!(client.complete(&request()).await, Err(LlmError::EmptyReply)));
    }
}
