//! OpenAI-compatible chat-completions client.
//!
//! One client serves OpenAI, Groq and xAI: they differ only in endpoint,
//! API key variable and model names, all of which come from [`LlmSettings`].

use async_trait::async_trait;
use brief_core::{LlmProvider, LlmSettings, truncate_with_ellipsis};
use brief_proto::CollaboratorError;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

/// Longest error body kept in an error message.
const MAX_ERROR_BODY: usize = 300;

/// Error type for provider operations.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("request failed: {0}")]
    Request(String),

    #[error("response parse error: {0}")]
    Parse(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("rate limited by {provider}")]
    RateLimited { provider: String },

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("model returned an empty completion")]
    EmptyCompletion,
}

impl From<ProviderError> for CollaboratorError {
    fn from(error: ProviderError) -> Self {
        match error {
            ProviderError::RateLimited { provider } => CollaboratorError::RateLimited { provider },
            ProviderError::Timeout { seconds } => CollaboratorError::Timeout { seconds },
            ProviderError::Auth(_) | ProviderError::Config(_) => {
                CollaboratorError::Unavailable(error.to_string())
            }
            ProviderError::Api { .. }
            | ProviderError::Request(_)
            | ProviderError::Parse(_)
            | ProviderError::EmptyCompletion => CollaboratorError::Failed(error.to_string()),
        }
    }
}

/// Single-prompt text completion.
#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Chat-completions client bound to one provider and model.
pub struct ChatClient {
    client: Client,
    provider: LlmProvider,
    endpoint: String,
    api_key: Option<String>,
    api_key_env: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    timeout_seconds: u64,
}

impl ChatClient {
    /// Builds a client from settings, reading the API key from the environment.
    ///
    /// A missing key is not an error here; calls fail with
    /// [`ProviderError::Auth`] instead.
    pub fn from_settings(settings: &LlmSettings) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .map_err(|e| ProviderError::Config(e.to_string()))?;

        let api_key = settings.api_key();
        if api_key.is_none() {
            tracing::warn!(
                provider = %settings.provider,
                env = settings.api_key_env(),
                "Chat client created without API key"
            );
        }

        Ok(Self {
            client,
            provider: settings.provider,
            endpoint: settings.api_url().to_string(),
            api_key,
            api_key_env: settings.api_key_env().to_string(),
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
            timeout_seconds: settings.timeout_seconds,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider(&self) -> LlmProvider {
        self.provider
    }

    fn payload(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
        })
    }
}

#[async_trait]
impl Completion for ChatClient {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            ProviderError::Auth(format!("{} is not set", self.api_key_env))
        })?;

        debug!(
            provider = %self.provider,
            model = %self.model,
            prompt_chars = prompt.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&self.payload(prompt))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout {
                        seconds: self.timeout_seconds,
                    }
                } else {
                    ProviderError::Request(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(self.provider, status, &body));
        }

        let json: serde_json::Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout {
                    seconds: self.timeout_seconds,
                }
            } else {
                ProviderError::Parse(e.to_string())
            }
        })?;

        parse_completion(&json)
    }
}

/// Maps a non-success HTTP status to a provider error.
fn status_error(provider: LlmProvider, status: StatusCode, body: &str) -> ProviderError {
    let message = truncate_with_ellipsis(body.trim(), MAX_ERROR_BODY);
    match status {
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited {
            provider: provider.to_string(),
        },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ProviderError::Auth(format!("{provider} returned {status}: {message}"))
        }
        _ => ProviderError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

/// Extracts the first choice's text from a chat-completions response.
pub fn parse_completion(json: &serde_json::Value) -> Result<String, ProviderError> {
    let content = json["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| ProviderError::Parse("response has no message content".to_string()))?
        .trim();

    if content.is_empty() {
        return Err(ProviderError::EmptyCompletion);
    }
    Ok(content.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_completion() {
        let json = serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "  Report text.\n"}}]
        });
        assert_eq!(parse_completion(&json).unwrap(), "Report text.");
    }

    #[test]
    fn test_parse_completion_empty_is_error() {
        let json = serde_json::json!({"choices": [{"message": {"content": "   "}}]});
        assert!(matches!(parse_completion(&json), Err(ProviderError::EmptyCompletion)));
    }

    #[test]
    fn test_parse_completion_missing_content() {
        let json = serde_json::json!({"error": {"message": "bad"}});
        assert!(matches!(parse_completion(&json), Err(ProviderError::Parse(_))));
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            status_error(LlmProvider::Groq, StatusCode::TOO_MANY_REQUESTS, ""),
            ProviderError::RateLimited { provider } if provider == "groq"
        ));
        assert!(matches!(
            status_error(LlmProvider::OpenAi, StatusCode::UNAUTHORIZED, "bad key"),
            ProviderError::Auth(_)
        ));
        assert!(matches!(
            status_error(LlmProvider::OpenAi, StatusCode::BAD_GATEWAY, "upstream"),
            ProviderError::Api { status: 502, .. }
        ));
    }

    #[test]
    fn test_error_body_is_truncated() {
        let body = "x".repeat(2_000);
        match status_error(LlmProvider::OpenAi, StatusCode::INTERNAL_SERVER_ERROR, &body) {
            ProviderError::Api { message, .. } => assert!(message.len() <= MAX_ERROR_BODY + 3),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_collaborator_error_mapping() {
        let err: CollaboratorError = ProviderError::Timeout { seconds: 30 }.into();
        assert_eq!(err, CollaboratorError::Timeout { seconds: 30 });

        let err: CollaboratorError = ProviderError::Auth("no key".to_string()).into();
        assert!(matches!(err, CollaboratorError::Unavailable(_)));

        let err: CollaboratorError = ProviderError::EmptyCompletion.into();
        assert!(matches!(err, CollaboratorError::Failed(_)));
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network() {
        let settings = LlmSettings {
            api_key_env: Some("BRIEF_TEST_KEY_THAT_IS_NEVER_SET".to_string()),
            ..LlmSettings::default()
        };
        let client = ChatClient::from_settings(&settings).unwrap();
        assert!(!client.is_configured());
        let err = client.complete("hello").await.unwrap_err();
        assert!(err.to_string().contains("BRIEF_TEST_KEY_THAT_IS_NEVER_SET"));
    }

    #[test]
    fn test_payload_shape() {
        let client = ChatClient::from_settings(&LlmSettings::judge_default()).unwrap();
        let payload = client.payload("check this");
        assert_eq!(payload["model"], "gpt-4o-mini");
        assert_eq!(payload["messages"][0]["role"], "user");
        assert_eq!(payload["messages"][0]["content"], "check this");
        assert_eq!(payload["max_tokens"], 600);
    }
}
