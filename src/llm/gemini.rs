use serde::{Deserialize, Serialize};

use crate::config::ProviderSettings;
use crate::llm::chat_runtime::{Auth, post_json};
use crate::llm::provider::{Provider, ProviderError};

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateContentResponse {
    /// Text of the first candidate; multiple text parts are concatenated.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect();
        (!text.is_empty()).then_some(text)
    }
}

/// Gemini `generateContent` text-completion client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    settings: ProviderSettings,
    http: reqwest::Client,
}

impl GeminiClient {
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
        let model = self.settings.model.trim_start_matches("models/");
        format!("{}/models/{model}:generateContent", self.settings.base())
    }

    pub fn request_body(&self, query: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(query.to_string()),
                }],
            }],
        }
    }

    pub async fn ask(&self, query: &str) -> Result<String, ProviderError> {
        let provider = Provider::Gemini;
        let api_key = self.settings.require_api_key(provider)?;

        let response: GenerateContentResponse = post_json(
            &self.http,
            provider,
            &self.endpoint(),
            Auth::Header(API_KEY_HEADER, api_key),
            &self.request_body(query),
        )
        .await?;

        response
            .into_text()
            .ok_or(ProviderError::EmptyResponse { provider })
    }
}
