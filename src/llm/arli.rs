use serde::Serialize;

use crate::config::ProviderSettings;
use crate::llm::chat_runtime::{Auth, ChatCompletionResponse, post_json};
use crate::llm::provider::{ChatMessage, Provider, ProviderError};

pub const SYSTEM_INSTRUCTION: &str = "You are a helpful assistant.";

#[derive(Debug, Serialize)]
pub struct ArliCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    repetition_penalty: f32,
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_completion_tokens: u32,
    stream: bool,
}

/// Arli AI text-completion client.
///
/// Every request carries the fixed system instruction and sampling settings;
/// callers only supply the query text.
#[derive(Debug, Clone)]
pub struct ArliClient {
    settings: ProviderSettings,
    http: reqwest::Client,
}

impl ArliClient {
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

    pub fn request_body(&self, query: &str) -> ArliCompletionRequest {
        ArliCompletionRequest {
            model: self.settings.model.clone(),
            messages: vec![ChatMessage::system(SYSTEM_INSTRUCTION), ChatMessage::user(query)],
            repetition_penalty: 1.1,
            temperature: 0.7,
            top_p: 0.9,
            top_k: 40,
            max_completion_tokens: 1024,
            stream: false,
        }
    }

    pub async fn ask(&self, query: &str) -> Result<String, ProviderError> {
        let provider = Provider::Arli;
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
    use wiremock::matchers::{any, body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer, api_key: Option<&str>) -> ArliClient {
        let mut settings =
            ProviderSettings::new("Gemma-3-27B-ArliAI-RPMax-v3", format!("{}/v1/", server.uri()));
        if let Some(key) = api_key {
            settings = settings.with_api_key(key);
        }
        ArliClient::new(settings)
    }

    #[test]
    fn request_body_carries_fixed_sampling_settings() {
        let body = serde_json::to_value(
            ArliClient::new(ProviderSettings::new("m", "http://unused")).request_body("q"),
        )
        .unwrap();
        assert_eq!(body["messages"][0], json!({"role": "system", "content": SYSTEM_INSTRUCTION}));
        assert_eq!(body["messages"][1], json!({"role": "user", "content": "q"}));
        assert_eq!(body["top_k"], 40);
        assert_eq!(body["max_completion_tokens"], 1024);
        assert_eq!(body["stream"], false);
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
        assert!(err.is_configuration());
        assert_eq!(err.to_string(), "ARLI_API_KEY is not set. Configure it in the environment or a .env file.");
    }

    #[tokio::test]
    async fn returns_first_choice_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer arli-key"))
            .and(body_partial_json(json!({
                "model": "Gemma-3-27B-ArliAI-RPMax-v3",
                "stream": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "Hello from Arli"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let answer = client(&server, Some("arli-key")).ask("Say hello!").await.unwrap();
        assert_eq!(answer, "Hello from Arli");
    }

    #[tokio::test]
    async fn missing_content_is_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let err = client(&server, Some("arli-key")).ask("hi").await.unwrap_err();
        assert!(matches!(
            err,
            ProviderError::EmptyResponse {
                provider: Provider::Arli
            }
        ));
    }

    #[tokio::test]
    async fn server_error_carries_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client(&server, Some("arli-key")).ask("hi").await.unwrap_err();
        assert!(err.to_string().contains("500 Internal Server Error"), "{err}");
    }

    #[tokio::test]
    async fn unreachable_host_is_request_error() {
        let settings = ProviderSettings::new("m", "http://127.0.0.1:1/v1").with_api_key("k");
        let err = ArliClient::new(settings).ask("hi").await.unwrap_err();
        assert!(matches!(err, ProviderError::Request { .. }));
    }
}
