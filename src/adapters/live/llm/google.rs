//! Live adapter for the `LlmClient` port using the Gemini `generateContent` API.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{endpoint, send_json};
use crate::ports::llm::{ChatRequest, CompletionResponse, LlmClient, LlmError, LlmFuture, Role};

/// Public Gemini endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Live LLM client for Google Gemini.
pub struct GoogleClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GoogleClient {
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
struct GeminiRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: UsageMetadata,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

/// Gemini calls the assistant side `model`.
fn gemini_role(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "model",
    }
}

impl LlmClient for GoogleClient {
    fn complete(&self, request: &ChatRequest) -> LlmFuture<'_> {
        let request = request.clone();

        Box::pin(async move {
            let body = GeminiRequest {
                contents: request
                    .messages
                    .iter()
                    .map(|m| Content {
                        role: gemini_role(m.role),
                        parts: [Part { text: &m.content }],
                    })
                    .collect(),
            };

            let path = format!("/v1beta/models/{}:generateContent", request.model);
            let http = self
                .client
                .post(endpoint(&self.base_url, &path))
                .header("x-goog-api-key", &self.api_key)
                .json(&body);
            let response: GeminiResponse = send_json("Gemini", http).await?;

            let text = response
                .candidates
                .into_iter()
                .next()
                .and_then(|candidate| candidate.content)
                .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect::<String>())
                .filter(|text| !text.is_empty())
                .ok_or(LlmError::EmptyReply)?;

            Ok(CompletionResponse {
                text,
                prompt_tokens: response.usage_metadata.prompt_token_count,
                completion_tokens: response.usage_metadata.candidates_token_count,
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

    #[tokio::test]
    async fn maps_assistant_to_model_role() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-pro:generateContent")
            .match_header("x-goog-api-key", "g-key")
            .match_body(Matcher::Json(json!({
                "contents": [
                    {"role": "user", "parts": [{"text": "prompt"}]},
                    {"role": "model", "parts": [{"text": "feat: a"}]},
                    {"role": "user", "parts": [{"text": "again"}]}
                ]
            })))
            .with_status(200)
            .with_body(
                json!({
                    "candidates": [{"content": {"role": "model", "parts": [{"text": "feat: b"}]}}],
                    "usageMetadata": {"promptTokenCount": 7, "candidatesTokenCount": 2}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let request = ChatRequest {
            model: "gemini-2.5-pro".into(),
            messages: vec![
                ChatMessage::user("prompt"),
                ChatMessage::assistant("feat: a"),
                ChatMessage::user("again"),
            ],
            max_tokens: 1000,
        };
        let client = GoogleClient::new("g-key", Some(server.url()));
        let response = client.complete(&request).await.unwrap();

        assert_eq!(response.text, "feat: b");
        assert_eq!(response.prompt_tokens, 7);
        assert_eq!(response.completion_tokens, 2);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn no_candidates_is_empty_reply() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/m:generateContent")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let request = ChatRequest {
            model: "m".into(),
            messages: vec![ChatMessage::user("p")],
            max_tokens: 1,
        };
        let result = GoogleClient::new("k", Some(server.url())).complete(&request).await;
        assert!(matches!(result, Err(LlmError::EmptyReply)));
    }
}
