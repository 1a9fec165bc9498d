//! Replaying adapter for the `LlmClient` port.

use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::llm::{ChatRequest, CompletionResponse, LlmClient, LlmError, LlmFuture};

/// Serves recorded LLM completions from a cassette.
///
/// Requests are not compared with the recorded inputs; replies come back
/// in recording order.
pub struct ReplayingLlmClient {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingLlmClient {
    /// Create a replaying LLM client backed by the given replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }

    fn next_response(&self) -> Result<CompletionResponse, LlmError> {
        let output = next_output(&self.replayer, "llm", "complete").map_err(LlmError::Replayed)?;
        replay_result(output).map_err(LlmError::Parse)?.map_err(LlmError::Replayed)
    }
}

impl LlmClient for ReplayingLlmClient {
    fn complete(&self, _request: &ChatRequest) -> LlmFuture<'_> {
        let result = self.next_response();
        Box::pin(async move { result })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use crate::ports::llm::ChatMessage;

    fn client(outputs: Vec<serde_json::Value>) -> ReplayingLlmClient {
        let interactions = outputs
            .into_iter()
            .zip(0..)
            .map(|(output, seq)| Interaction {
                seq,
                port: "llm".into(),
                method: "complete".into(),
                input: json!({}),
                output,
            })
            .collect();
        let cassette = Cassette {
            name: "t".into(),
            recorded_at: Utc::now(),
            commit: "c".into(),
            interactions,
        };
        ReplayingLlmClient::new(CassetteReplayer::new(&cassette))
    }

    fn request() -> ChatRequest {
        ChatRequest { model: "m".into(), messages: vec![ChatMessage::user("p")], max_tokens: 1 }
    }

    #[tokio::test]
    async fn serves_recorded_replies_then_failures() {
        let client = client(vec![
            json!({"ok": {"text": "feat: one", "prompt_tokens": 1, "completion_tokens": 1}}),
            json!({"err": "API error (500): down"}),
        ]);

        assert_eq!(client.complete(&request()).await.unwrap().text, "feat: one");
        let err = client.complete(&request()).await.unwrap_err();
        assert_eq!(err.to_string(), "API error (500): down");
        let exhausted = client.complete(&request()).await.unwrap_err();
        assert!(exhausted.to_string().contains("Cassette exhausted"));
    }

    #[tokio::test]
    async fn malformed_output_is_parse_error() {
        let client = client(vec![json!({"ok": {"text": 3}})]);
        assert!(matches!(client.complete(&request()).await, Err(LlmError::Parse(_))));
    }
}
