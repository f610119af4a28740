use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    errors::{AppError, AppResult},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role("assistant", content)
    }

    fn with_role(role: &str, content: impl Into<String>) -> Self {
        ChatMessage {
            role: role.to_string(),
            content: content.into(),
        }
    }
}

/// A single round-trip chat completion.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, messages: Vec<ChatMessage>) -> AppResult<String>;
}

/// Client for any OpenAI-compatible `/chat/completions` endpoint.
pub struct ChatCompletionsClient {
    http: reqwest::Client,
    api_base: String,
    api_key: Option<SecretString>,
    model: String,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

impl ChatCompletionsClient {
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.llm_timeout_seconds))
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_base: config.llm_api_base.trim_end_matches('/').to_string(),
            api_key: config.llm_api_key.clone(),
            model: config.llm_model.clone(),
        })
    }
}

#[async_trait]
impl LanguageModel for ChatCompletionsClient {
    async fn complete(&self, messages: Vec<ChatMessage>) -> AppResult<String> {
        let api_key = self.api_key.as_ref().ok_or(AppError::UpstreamNotConfigured)?;
        let url = format!("{}/chat/completions", self.api_base);

        let response = self
            .http
            .post(&url)
            .bearer_auth(api_key.expose_secret())
            .json(&CompletionRequest {
                model: &self.model,
                messages: &messages,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("Language model returned {}: {}", status, body);
            return Err(AppError::UpstreamUnavailable(format!(
                "the assistant returned status {}",
                status.as_u16()
            )));
        }

        let completion: CompletionResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| AppError::UpstreamUnavailable("the assistant sent an empty reply".to_string()))
    }
}
