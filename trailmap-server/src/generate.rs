//! Roadmap generation through an OpenAI-compatible chat completions API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use trailmap_core::LearnerProfile;

use crate::config::GenerationSettings;
use crate::prompt::{build_messages, ChatMessage};

/// Longest provider message passed on to users.
const MAX_MESSAGE_CHARS: usize = 300;

/// A failed generation call. `status` is the provider's HTTP status when the
/// request got that far.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct GenerationError {
    pub status: Option<u16>,
    pub message: String,
}

impl GenerationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    pub fn not_configured() -> Self {
        Self::new("generation is not configured")
    }

    fn provider(status: u16, body: &str) -> Self {
        Self {
            status: Some(status),
            message: provider_message(body),
        }
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        Self {
            status: err.status().map(|s| s.as_u16()),
            message: format!("could not reach the model provider: {err}"),
        }
    }
}

/// Something that turns a learner profile into roadmap markdown.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, profile: &LearnerProfile) -> Result<String, GenerationError>;
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// `POST {base_url}/chat/completions` with a bearer key. One attempt per
/// call; retries are left to the user.
#[derive(Debug, Clone)]
pub struct ChatCompletionsClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl ChatCompletionsClient {
    pub fn new(settings: &GenerationSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: completions_endpoint(&settings.base_url),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Generator for ChatCompletionsClient {
    async fn generate(&self, profile: &LearnerProfile) -> Result<String, GenerationError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(GenerationError::not_configured());
        };

        let request = CompletionRequest {
            model: &self.model,
            messages: build_messages(profile),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!(endpoint = %self.endpoint, model = %self.model, "requesting roadmap");
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = GenerationError::provider(status.as_u16(), &body);
            warn!(status = status.as_u16(), message = %err.message, "model provider rejected request");
            return Err(err);
        }

        let completion: CompletionResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| GenerationError::new("the model returned an empty response"))
    }
}

fn completions_endpoint(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

/// The provider's `error.message` when the body is a JSON error object,
/// otherwise the raw body, truncated either way.
fn provider_message(body: &str) -> String {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string());

    if message.is_empty() {
        return "the model provider returned an error".to_string();
    }
    truncate(&message, MAX_MESSAGE_CHARS)
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}
