//! Chat-completion client for OpenAI-compatible endpoints.

use async_trait::async_trait;
use derive_builder::Builder;
use mockall::automock;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

/// Default endpoint, Groq's OpenAI-compatible API.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("Authentication failed with status {status}, check the API key")]
    Authentication { status: u16 },
    #[error("Rate limit or quota exceeded. {body}")]
    Quota { body: String },
    #[error("Service responded with status {status}. {body}")]
    Api { status: u16, body: String },
    #[error("Unable to reach the completion service. {0}")]
    Network(#[from] reqwest::Error),
    #[error("Unexpected response from the completion service. {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Body of a `/chat/completions` request.
#[derive(Debug, Clone, PartialEq, Serialize, Builder)]
#[builder(setter(into))]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Something that can turn a prompt into completion text.
#[automock]
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}

/// Client for Groq, or any other service speaking the same protocol.
#[derive(Debug)]
pub struct GroqClient {
    client: Client,
    endpoint: String,
    api_key: SecretString,
}

impl GroqClient {
    pub fn new(api_key: &SecretString, base_url: &Url) -> Result<Self, CompletionError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint: format!(
                "{}/chat/completions",
                base_url.as_str().trim_end_matches('/')
            ),
            api_key: SecretString::from(api_key.expose_secret().to_string()),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CompletionProvider for GroqClient {
    #[instrument(skip_all, fields(model = %request.model, endpoint = %self.endpoint))]
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("Completion service responded with {} ({} bytes)", status, body.len());

        parse_completion(status, &body)
    }
}

/// Map a raw HTTP response to completion text or a typed error.
pub fn parse_completion(status: StatusCode, body: &str) -> Result<String, CompletionError> {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            return Err(CompletionError::Authentication {
                status: status.as_u16(),
            });
        }
        StatusCode::TOO_MANY_REQUESTS => {
            return Err(CompletionError::Quota {
                body: body.to_string(),
            });
        }
        status if !status.is_success() => {
            return Err(CompletionError::Api {
                status: status.as_u16(),
                body: body.to_string(),
            });
        }
        _ => {}
    }

    let parsed: CompletionResponse = serde_json::from_str(body)
        .map_err(|e| CompletionError::MalformedResponse(e.to_string()))?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| CompletionError::MalformedResponse("response has no content".to_string()))
}
