//! OpenRouter chat-completions client

use crate::config::LlmConfig;
use crate::error::{AtsMatchError, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionChoice {
    pub message: ChatMessage,
}

impl ChatCompletionRequest {
    /// A single user turn carrying the whole prompt.
    pub fn user_prompt(model_slug: &str, prompt: &str) -> Self {
        Self {
            model: model_slug.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        }
    }
}

impl ChatCompletionResponse {
    pub fn into_content(self) -> Result<String> {
        self.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| AtsMatchError::LlmProvider("Response contained no message content".to_string()))
    }
}

#[derive(Clone)]
pub struct OpenRouterClient {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl OpenRouterClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = config.api_key()?;
        Self::with_api_key(config, api_key)
    }

    pub fn with_api_key(config: &LlmConfig, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }

    /// Send `prompt` to `model_slug` and return the first choice's text.
    pub async fn complete(&self, model_slug: &str, prompt: &str) -> Result<String> {
        let request = ChatCompletionRequest::user_prompt(model_slug, prompt);
        let start = Instant::now();
        info!("Requesting completion from {}", model_slug);

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AtsMatchError::LlmProvider(format!("{} returned {}: {}", model_slug, status, body)));
        }

        let parsed: ChatCompletionResponse = response.json().await?;
        let content = parsed.into_content()?;
        debug!(
            "Completion of {} chars in {}ms",
            content.len(),
            start.elapsed().as_millis()
        );
        Ok(content)
    }
}
