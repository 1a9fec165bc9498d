//! Live adapter for the `LlmClient` port using OpenAI chat completions.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{endpoint, send_json};
use crate::ports::llm::{ChatRequest, CompletionResponse, LlmClient, LlmError, LlmFuture};

/// Public OpenAI endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Live LLM client for the OpenAI chat completions API.
///
/// No token limit is sent: reasoning models count hidden reasoning against
/// it and can return an empty reply when it is small.
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
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

#[derive(Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAiMessage<'a>>,
}

#[derive(Serialize)]
struct OpenAiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Usage,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

#[derive(Default, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

impl LlmClient for OpenAiClient {
    fn complete(&self, request: &ChatRequest) -> LlmFuture<'_> {
        let request = request.clone();

        Box::pin(async move {
            let body = OpenAiRequest {
                model: &request.model,
                messages: request
                    .messages
                    .iter()
                    .map(|m| OpenAiMessage { role: m.role.as_str(), content: &m.content })
                    .collect(),
            };

            let http = self
                .client
                .post(endpoint(&self.base_url, "/v1/chat/completions"))
                .bearer_auth(&self.api_key)
                .json(&body);
            let response: OpenAiResponse = send_json("OpenAI", http).await?;

            let text = response
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content)
                .filter(|text| !text.is_empty())
                .ok_or(LlmError::EmptyReply)?;

            Ok(CompletionResponse {
                text,
                prompt_tokens: response.usage.prompt_tokens,
                completion_tokens: response.usage.completion_tokens,
            })
        })
    }
}
