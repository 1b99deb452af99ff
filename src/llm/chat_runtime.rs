use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::llm::provider::{Provider, ProviderError};

/// How the API key travels with the request.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Auth<'a> {
    Bearer(&'a str),
    Header(&'static str, &'a str),
}

/// Sends one JSON POST and decodes a successful body as `R`.
///
/// No retries and no timeout: the call lasts as long as the remote end does.
pub(crate) async fn post_json<T, R>(
    client: &reqwest::Client,
    provider: Provider,
    url: &str,
    auth: Auth<'_>,
    payload: &T,
) -> Result<R, ProviderError>
where
    T: Serialize + ?Sized,
    R: DeserializeOwned,
{
    debug!(provider = provider.as_str(), url, "Sending completion request");

    let request = client.post(url).json(payload);
    let request = match auth {
        Auth::Bearer(key) => request.bearer_auth(key),
        Auth::Header(name, key) => request.header(name, key),
    };

    let response = request.send().await.map_err(|source| {
        error!(provider = provider.as_str(), error = %source, "HTTP request failed");
        ProviderError::Request { provider, source }
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        error!(
            provider = provider.as_str(),
            status = %status,
            body = %body,
            "API error"
        );
        return Err(ProviderError::Api {
            provider,
            status,
            body,
        });
    }

    response.json::<R>().await.map_err(|source| {
        error!(provider = provider.as_str(), error = %source, "Failed to decode response");
        ProviderError::Request { provider, source }
    })
}

/// OpenAI-style `chat/completions` response, reduced to what we read.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<AssistantMessage>,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

impl ChatCompletionResponse {
    /// Content of the first choice, unmodified, or `EmptyResponse`.
    pub(crate) fn into_content(self, provider: Provider) -> Result<String, ProviderError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.is_empty())
            .ok_or(ProviderError::EmptyResponse { provider })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> ChatCompletionResponse {
        serde_json::from_value(value).expect("response should deserialize")
    }

    #[test]
    fn first_choice_content_is_returned_verbatim() {
        let response = parse(json!({
            "choices": [
                {"message": {"role": "assistant", "content": "  Hello!\n"}},
                {"message": {"role": "assistant", "content": "second"}}
            ]
        }));
        assert_eq!(
            response.into_content(Provider::Openai).unwrap(),
            "  Hello!\n"
        );
    }

    #[test]
    fn missing_or_empty_content_is_empty_response() {
        for body in [
            json!({}),
            json!({"choices": []}),
            json!({"choices": [{}]}),
            json!({"choices": [{"message": {"content": null}}]}),
            json!({"choices": [{"message": {"content": ""}}]}),
        ] {
            let err = parse(body).into_content(Provider::Arli).unwrap_err();
            assert!(matches!(
                err,
                ProviderError::EmptyResponse {
                    provider: Provider::Arli
                }
            ));
        }
    }
}
