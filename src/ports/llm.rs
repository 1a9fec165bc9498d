//! LLM client port for chat completions.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Boxed future type alias used by [`LlmClient`] to keep the trait dyn-compatible.
pub type LlmFuture<'a> =
    Pin<Box<dyn Future<Output = Result<CompletionResponse, LlmError>> + Send + 'a>>;

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person driving the conversation.
    User,
    /// The model.
    Assistant,
}

impl Role {
    /// Wire name shared by the OpenAI and Anthropic APIs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author of the message.
    pub role: Role,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// A message from the user.
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    /// A message from the model.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// A request to continue a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The model identifier (e.g. `"claude-sonnet-4-5"`).
    pub model: String,
    /// The full message history, oldest first.
    pub messages: Vec<ChatMessage>,
    /// Maximum number of tokens to generate.
    pub max_tokens: u32,
}

/// The response from an LLM completion call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionResponse {
    /// The generated text.
    pub text: String,
    /// Number of prompt tokens consumed.
    pub prompt_tokens: u32,
    /// Number of completion tokens generated.
    pub completion_tokens: u32,
}

/// Errors reported by an [`LlmClient`].
#[derive(Debug, Error)]
pub enum LlmError {
    /// The request never produced an HTTP response.
    #[error("request failed: {0}")]
    Http(String),
    /// The provider answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Provider error message, or the raw body.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse response: {0}")]
    Parse(String),
    /// The response held no text.
    #[error("no reply")]
    EmptyReply,
    /// A recorded interaction was replayed as a failure.
    #[error("{0}")]
    Replayed(String),
    /// No chat backend was set up for this run.
    #[error("no chat provider configured")]
    Unconfigured,
}

/// Sends conversations to a language model.
pub trait LlmClient: Send + Sync {
    /// Generates the next assistant message for the given conversation.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails (network, auth, rate-limit, etc.).
    fn complete(&self, request: &ChatRequest) -> LlmFuture<'_>;
}
