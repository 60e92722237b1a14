//! OpenAI-compatible reasoning provider
//!
//! Works with OpenAI and any chat-completions-compatible API (Azure OpenAI,
//! vLLM, Ollama, etc.) pointed at via `base_url`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

use crate::config::ReasoningConfig;

use super::prompts::PromptBuilder;
use super::provider::{ReasoningError, ReasoningProvider};

pub struct OpenAiReasoningProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
}

impl OpenAiReasoningProvider {
    pub fn new(config: &ReasoningConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .unwrap_or_else(|e| {
                error!(error = %e, "failed to build HTTP client with custom timeout, using default client");
                Client::new()
            });

        Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl ReasoningProvider for OpenAiReasoningProvider {
    #[tracing::instrument(skip(self, source), fields(model = %self.model, source_bytes = source.len()))]
    async fn assess(&self, source: &str, project_label: &str) -> Result<String, ReasoningError> {
        let prompt = PromptBuilder::build_assessment_prompt(project_label, source);

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt,
            }],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        debug!("sending assessment request to reasoning service");

        let response = self
            .client
            .post(self.chat_url())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => ReasoningError::Authentication(body),
                429 => ReasoningError::RateLimited(body),
                500..=599 => ReasoningError::ServiceUnavailable(format!("{status}: {body}")),
                _ => ReasoningError::InvalidResponse(format!("{status}: {body}")),
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ReasoningError::InvalidResponse(format!("malformed body: {e}")))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(ReasoningError::InvalidResponse(
                "response contained no text content".to_string(),
            ));
        }

        Ok(content)
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}
