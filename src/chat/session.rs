//! Conversation history.

use tracing::debug;

use crate::ports::llm::{ChatMessage, ChatRequest, LlmClient, LlmError};

/// A conversation with one model; every request carries the full history.
pub struct ChatSession<'a> {
    client: &'a dyn LlmClient,
    model: String,
    max_tokens: u32,
    messages: Vec<ChatMessage>,
}

impl<'a> ChatSession<'a> {
    /// Starts an empty conversation.
    pub fn new(client: &'a dyn LlmClient, model: impl Into<String>, max_tokens: u32) -> Self {
        Self { client, model: model.into(), max_tokens, messages: Vec::new() }
    }

    /// Sends `content` as the next user message and returns the reply.
    ///
    /// On failure the history is left as it was before the call.
    ///
    /// # Errors
    ///
    /// Returns the client's error.
    pub async fn reply(&mut self, content: &str) -> Result<String, LlmError> {
        self.messages.push(ChatMessage::user(content));
        let request = ChatRequest {
            model: self.model.clone(),
            messages: self.messages.clone(),
            max_tokens: self.max_tokens,
        };

        match self.client.complete(&request).await {
            Ok(response) => {
                debug!(
                    prompt_tokens = response.prompt_tokens,
                    completion_tokens = response.completion_tokens,
                    "reply received"
                );
                self.messages.push(ChatMessage::assistant(response.text.clone()));
                Ok(response.text)
            }
            Err(err) => {
                self.messages.pop();
                Err(err)
            }
        }
    }

    /// Messages exchanged so far, oldest first.
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}
