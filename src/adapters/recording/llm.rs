//! Recording adapter for the `LlmClient` port.

use std::sync::{Arc, Mutex};

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::llm::{ChatRequest, LlmClient, LlmFuture};

/// Records LLM interactions while delegating to an inner implementation.
pub struct RecordingLlmClient {
    inner: Box<dyn LlmClient>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingLlmClient {
    /// Creates a new recording LLM client wrapping the given implementation.
    pub fn new(inner: Box<dyn LlmClient>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl LlmClient for RecordingLlmClient {
    fn complete(&self, request: &ChatRequest) -> LlmFuture<'_> {
        let request = request.clone();

        Box::pin(async move {
            let result = self.inner.complete(&request).await;
            record_result(&self.recorder, "llm", "complete", &request, &result);
            result
        })
    }
}
