use serde::Serialize;

use crate::config::ProviderSettings;
use crate::llm::chat_runtime::{Auth, ChatCompletionResponse, post_json};
use crate::llm::provider::{ChatMessage, Provider, ProviderError};

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

/// OpenAI chat-completions client with a single user turn per call.
///
/// The model is a deployment choice taken from [`ProviderSettings`], never
/// from the caller of [`OpenAiClient::ask`].
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    settings: ProviderSettings,
    http: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(settings: ProviderSettings) -> Self {
        Self::with_http_client(settings, reqwest::Client::new())
    }

    pub fn with_http_client(settings: ProviderSettings, http: reqwest::Client) -> Self {
        Self { settings, http }
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.settings.base())
    }

    pub fn request_body(&self, query: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.settings.model.clone(),
            messages: vec![ChatMessage::user(query)],
        }
    }

    pub async fn ask(&self, query: &str) -> Result<String, ProviderError> {
        let provider = Provider::Openai;
        let api_key = self.settings.require_api_key(provider)?;

        let response: ChatCompletionResponse = post_json(
            &self.http,
            provider,
            &self.endpoint(),
            Auth::Bearer(api_key),
            &self.request_body(query),
        )
        .await?;

        response.into_content(provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{any, body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer, api_key: Option<&str>) -> OpenAiClient {
        let mut settings = ProviderSettings::new("gpt-4.1-mini", format!("{}/v1", server.uri()));
        if let Some(key) = api_key {
            settings = settings.with_api_key(key);
        }
        OpenAiClient::new(settings)
    }

    #[tokio::test]
    async fn missing_key_fails_without_calling_the_api() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = client(&server, None).ask("hello").await.unwrap_err();
        assert!(matches!(
            err,
            ProviderError::MissingApiKey {
                provider: Provider::Openai,
                key_env: "OPENAI_API_KEY"
            }
        ));
    }

    #[tokio::test]
    async fn sends_single_user_turn_with_configured_model() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer sk-test"))
            .and(body_json(json!({
                "model": "gpt-4.1-mini",
                "messages": [{"role": "user", "content": "Say hello!"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chatcmpl-1",
                "choices": [{"message": {"role": "assistant", "content": "Hello there."}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let answer = client(&server, Some("sk-test")).ask("Say hello!").await.unwrap();
        assert_eq!(answer, "Hello there.");
    }

    #[tokio::test]
    async fn empty_content_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": ""}}]
            })))
            .mount(&server)
            .await;

        let err = client(&server, Some("sk-test")).ask("hi").await.unwrap_err();
        assert!(matches!(err, ProviderError::EmptyResponse { .. }));
    }

    #[tokio::test]
    async fn non_success_status_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&server)
            .await;

        let err = client(&server, Some("sk-bad")).ask("hi").await.unwrap_err();
        assert!(err.is_transport());
        let message = err.to_string();
        assert!(message.contains("401"), "{message}");
        assert!(message.contains("Unauthorized"), "{message}");
    }
}
