//! HTTP client for the intent classifier
//!
//! Speaks the Anthropic Messages API or any OpenAI-compatible chat endpoint
//! (DeepSeek, OpenAI, local gateways), picked from the configured URL. The
//! model only turns text into intents; every calendar decision is made by
//! the resolver.

use crate::core::config::LlmConfig;
use crate::core::error::{Result, ScheduleError};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Output budget for a classification reply (a small JSON object)
const CLASSIFY_MAX_TOKENS: u32 = 1024;

/// Reasoner models spend output tokens thinking before the JSON answer
const REASONER_MAX_TOKENS: u32 = 8192;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Wire format of the configured endpoint
#[derive(Debug, Clone, PartialEq)]
pub enum ApiFormat {
    Anthropic,
    OpenAI,
}

impl ApiFormat {
    /// Anthropic only for anthropic.com; everything else is treated as OpenAI-compatible
    fn for_url(url: &str) -> Self {
        if url.contains("anthropic.com") {
            ApiFormat::Anthropic
        } else {
            ApiFormat::OpenAI
        }
    }
}

pub struct LlmClient {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
    api_format: ApiFormat,
}

impl LlmClient {
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        Self::with_client(Client::new(), api_key, api_url, model)
    }

    fn with_client(client: Client, api_key: String, api_url: String, model: String) -> Self {
        let api_format = ApiFormat::for_url(&api_url);
        Self {
            client,
            api_key,
            api_url,
            model,
            api_format,
        }
    }

    /// Create a client from the `[llm]` config section
    ///
    /// The API key is read from the environment variable named by `api_key_env`;
    /// `LLM_API_URL` and `LLM_MODEL` override the configured endpoint and model.
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            ScheduleError::LlmError(format!("{} not set", config.api_key_env))
        })?;
        let api_url = std::env::var("LLM_API_URL").unwrap_or_else(|_| config.api_url.clone());
        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| config.model.clone());

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ScheduleError::LlmError(e.to_string()))?;

        Ok(Self::with_client(client, api_key, api_url, model))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// One deterministic (temperature 0) completion; returns the first text block
    pub async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let text = match self.api_format {
            ApiFormat::Anthropic => {
                let body = MessagesRequest {
                    model: &self.model,
                    max_tokens: CLASSIFY_MAX_TOKENS,
                    temperature: 0.0,
                    system,
                    messages: vec![ChatMessage::user(user)],
                };
                let request = self
                    .client
                    .post(&self.api_url)
                    .header("x-api-key", &self.api_key)
                    .header("anthropic-version", ANTHROPIC_VERSION)
                    .json(&body);
                let reply: MessagesResponse = self.send(request).await?;
                reply.content.into_iter().next().map(|block| block.text)
            }
            ApiFormat::OpenAI => {
                let body = ChatRequest {
                    model: &self.model,
                    max_tokens: self.max_tokens(),
                    temperature: 0.0,
                    messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
                };
                let request = self
                    .client
                    .post(&self.api_url)
                    .bearer_auth(&self.api_key)
                    .json(&body);
                let reply: ChatResponse = self.send(request).await?;
                reply
                    .choices
                    .into_iter()
                    .next()
                    .map(|choice| choice.message.content)
            }
        };
        text.ok_or_else(|| ScheduleError::LlmError("model returned no content".into()))
    }

    fn max_tokens(&self) -> u32 {
        if self.model.contains("reasoner") {
            REASONER_MAX_TOKENS
        } else {
            CLASSIFY_MAX_TOKENS
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request
            .send()
            .await
            .map_err(|e| ScheduleError::LlmError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), model = %self.model, "Classifier endpoint rejected request");
            return Err(ScheduleError::LlmError(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| ScheduleError::LlmError(e.to_string()))
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> ChatMessage<'a> {
    fn system(content: &'a str) -> Self {
        Self {
            role: "system",
            content,
        }
    }

    fn user(content: &'a str) -> Self {
        Self {
            role: "user",
            content,
        }
    }
}

/// Anthropic Messages API body; the system prompt travels outside `messages`
#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<TextBlock>,
}

#[derive(Deserialize)]
struct TextBlock {
    text: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: String,
}
