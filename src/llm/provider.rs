use std::fmt;
use std::str::FromStr;

use reqwest::StatusCode;
use serde::Serialize;
use serde_json::{Value, json};

use crate::config::Settings;
use crate::llm::arli::ArliClient;
use crate::llm::gemini::GeminiClient;
use crate::llm::openai::OpenAiClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Gemini,
    Arli,
    Openai,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Self::Gemini, Self::Arli, Self::Openai];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Arli => "arli",
            Self::Openai => "openai",
        }
    }

    pub fn api_key_env(self) -> &'static str {
        match self {
            Self::Gemini => "GEMINI_API_KEY",
            Self::Arli => "ARLI_API_KEY",
            Self::Openai => "OPENAI_API_KEY",
        }
    }

    /// Comma-separated list used in error messages.
    pub fn supported_values() -> String {
        Self::ALL
            .iter()
            .map(|provider| provider.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownProvider(pub String);

impl fmt::Display for UnknownProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown provider '{}' (supported: {})",
            self.0,
            Provider::supported_values()
        )
    }
}

impl std::error::Error for UnknownProvider {}

impl FromStr for Provider {
    type Err = UnknownProvider;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(Self::Gemini),
            "arli" | "arliai" => Ok(Self::Arli),
            "openai" => Ok(Self::Openai),
            _ => Err(UnknownProvider(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Failure of a single completion call.
///
/// `MissingApiKey` is a configuration problem detected before any I/O;
/// `Request` and `Api` mean the call itself failed; `EmptyResponse` means the
/// provider answered successfully but without usable content.
#[derive(Debug)]
pub enum ProviderError {
    MissingApiKey {
        provider: Provider,
        key_env: &'static str,
    },
    Request {
        provider: Provider,
        source: reqwest::Error,
    },
    Api {
        provider: Provider,
        status: StatusCode,
        body: String,
    },
    EmptyResponse {
        provider: Provider,
    },
}

impl ProviderError {
    pub fn provider(&self) -> Provider {
        match self {
            Self::MissingApiKey { provider, .. }
            | Self::Request { provider, .. }
            | Self::Api { provider, .. }
            | Self::EmptyResponse { provider } => *provider,
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::MissingApiKey { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Request { .. } | Self::Api { .. })
    }

    /// HTTP status of a non-success response, when there was one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Request { source, .. } => source.status(),
            _ => None,
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingApiKey { key_env, .. } => {
                write!(f, "{key_env} is not set. Configure it in the environment or a .env file.")
            }
            Self::Request { provider, source } => {
                write!(f, "{provider} request failed: {source}")
            }
            Self::Api {
                provider,
                status,
                body,
            } => {
                if body.trim().is_empty() {
                    write!(f, "{provider} API error: {status}")
                } else {
                    write!(f, "{provider} API error: {status}: {}", body.trim())
                }
            }
            Self::EmptyResponse { provider } => {
                write!(f, "No response content returned from {provider}.")
            }
        }
    }
}

impl std::error::Error for ProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Request { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// A completion client for one provider, chosen explicitly by the caller.
#[derive(Debug, Clone)]
pub enum LlmClient {
    Gemini(GeminiClient),
    Arli(ArliClient),
    Openai(OpenAiClient),
}

impl LlmClient {
    pub fn new(provider: Provider, settings: &Settings) -> Self {
        let provider_settings = settings.provider(provider).clone();
        match provider {
            Provider::Gemini => Self::Gemini(GeminiClient::new(provider_settings)),
            Provider::Arli => Self::Arli(ArliClient::new(provider_settings)),
            Provider::Openai => Self::Openai(OpenAiClient::new(provider_settings)),
        }
    }

    pub fn provider(&self) -> Provider {
        match self {
            Self::Gemini(_) => Provider::Gemini,
            Self::Arli(_) => Provider::Arli,
            Self::Openai(_) => Provider::Openai,
        }
    }

    pub fn model(&self) -> &str {
        match self {
            Self::Gemini(client) => client.model(),
            Self::Arli(client) => client.model(),
            Self::Openai(client) => client.model(),
        }
    }

    pub fn endpoint(&self) -> String {
        match self {
            Self::Gemini(client) => client.endpoint(),
            Self::Arli(client) => client.endpoint(),
            Self::Openai(client) => client.endpoint(),
        }
    }

    /// JSON body that `ask` would send for `query`. Does not touch the network
    /// and does not need an API key.
    pub fn request_body(&self, query: &str) -> Value {
        let body = match self {
            Self::Gemini(client) => serde_json::to_value(client.request_body(query)),
            Self::Arli(client) => serde_json::to_value(client.request_body(query)),
            Self::Openai(client) => serde_json::to_value(client.request_body(query)),
        };
        body.unwrap_or_else(|_| json!({}))
    }

    pub async fn ask(&self, query: &str) -> Result<String, ProviderError> {
        match self {
            Self::Gemini(client) => client.ask(query).await,
            Self::Arli(client) => client.ask(query).await,
            Self::Openai(client) => client.ask(query).await,
        }
    }
}

pub async fn ask(provider: Provider, settings: &Settings, query: &str) -> Result<String, ProviderError> {
    LlmClient::new(provider, settings).ask(query).await
}
