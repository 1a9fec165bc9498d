//! Live adapters for the `LlmClient` port, one per provider.

pub mod anthropic;
pub mod google;
pub mod openai;

pub use anthropic::AnthropicClient;
pub use google::GoogleClient;
pub use openai::OpenAiClient;

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::config::{ChatSettings, Provider};
use crate::ports::llm::{LlmClient, LlmError};

/// Builds the live client for the configured provider.
#[must_use]
pub fn client_for(settings: &ChatSettings) -> Box<dyn LlmClient> {
    let api_key = settings.api_key.clone();
    let base_url = settings.base_url.clone();
    match settings.provider {
        Provider::OpenAi => Box::new(OpenAiClient::new(api_key, base_url)),
        Provider::Anthropic => Box::new(AnthropicClient::new(api_key, base_url)),
        Provider::Google => Box::new(GoogleClient::new(api_key, base_url)),
    }
}

/// Error body shared by all three providers: `{"error": {"message": ...}}`.
#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Sends `request` and decodes a JSON body, mapping non-success statuses to
/// [`LlmError::Api`] with the provider's own message when it has one.
async fn send_json<T: DeserializeOwned>(
    provider: &str,
    request: RequestBuilder,
) -> Result<T, LlmError> {
    let response = request
        .send()
        .await
        .map_err(|e| LlmError::Http(format!("{provider} API request failed: {e}")))?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| LlmError::Http(format!("failed to read {provider} API response: {e}")))?;
    debug!(provider, status = status.as_u16(), bytes = text.len(), "provider responded");

    if !status.is_success() {
        let message =
            serde_json::from_str::<ApiErrorBody>(&text).map(|e| e.error.message).unwrap_or(text);
        return Err(LlmError::Api { status: status.as_u16(), message });
    }

    serde_json::from_str(&text)
        .map_err(|e| LlmError::Parse(format!("{provider} API response: {e}")))
}

/// Trims a base URL so paths can be appended with a leading slash.
fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        assert_eq!(endpoint("http://h:1/", "/v1/x"), "http://h:1/v1/x");
        assert_eq!(endpoint("http://h:1", "/v1/x"), "http://h:1/v1/x");
    }

    #[test]
    fn client_for_accepts_every_provider() {
        for provider in [Provider::OpenAi, Provider::Anthropic, Provider::Google] {
            let settings = ChatSettings {
                provider,
                api_key: "k".into(),
                model: provider.default_model().into(),
                base_url: None,
                max_tokens: 10,
            };
            let _client = client_for(&settings);
        }
    }
}
