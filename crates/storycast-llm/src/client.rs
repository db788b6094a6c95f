//! OpenAI-compatible chat-completion HTTP client.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{LlmError, LlmResult};

/// Configuration for the chat client.
#[derive(Debug, Clone)]
pub struct ChatClientConfig {
    /// Base URL of the chat-completion API
    pub base_url: String,
    /// API key sent as a bearer token
    pub api_key: String,
    /// Model identifier
    pub model: String,
    /// Request timeout
    pub timeout: Duration,
    /// Max retries for transport failures
    pub max_retries: u32,
}

impl ChatClientConfig {
    /// Create config from environment variables.
    ///
    /// `OPENAI_API_KEY` is required; the rest have defaults.
    pub fn from_env() -> LlmResult<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| LlmError::config("OPENAI_API_KEY not set"))?;

        Ok(Self {
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            api_key,
            model: std::env::var("STORYCAST_LLM_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            timeout: Duration::from_secs(
                std::env::var("STORYCAST_LLM_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(120),
            ),
            max_retries: std::env::var("STORYCAST_LLM_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
        })
    }
}

/// Chat completion request body.
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Chat completion response body.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

const MAX_COMPLETION_TOKENS: u32 = 4000;

/// Thin client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct ChatClient {
    http: Client,
    config: ChatClientConfig,
}

impl ChatClient {
    /// Create a new chat client.
    pub fn new(config: ChatClientConfig) -> LlmResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(LlmError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> LlmResult<Self> {
        Self::new(ChatClientConfig::from_env()?)
    }

    /// The configured model identifier.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Send one prompt and return the completion text.
    pub async fn complete(
        &self,
        system: Option<&str>,
        prompt: &str,
        temperature: f32,
    ) -> LlmResult<String> {
        let mut messages = Vec::new();
        if let Some(system) = system {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system.to_string(),
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        });

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages,
            temperature,
            max_tokens: MAX_COMPLETION_TOKENS,
        };

        self.with_retry(|| self.send(&request)).await
    }

    async fn send(&self, request: &ChatRequest) -> LlmResult<String> {
        let url = format!("{}/chat/completions", self.config.base_url);
        debug!("Sending chat completion request to {}", url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::RequestFailed(format!(
                "chat API returned {}: {}",
                status, body
            )));
        }

        let body: ChatResponse = response.json().await?;
        parse_completion(body)
    }

    /// Execute with bounded exponential-backoff retry.
    async fn with_retry<F, Fut>(&self, operation: F) -> LlmResult<String>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = LlmResult<String>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let delay = Duration::from_millis(500 * 2u64.pow(attempt));
                    warn!(
                        "Chat request failed (attempt {}), retrying in {:?}: {}",
                        attempt + 1,
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or(LlmError::RequestFailed("unknown error".to_string())))
    }
}

fn parse_completion(body: ChatResponse) -> LlmResult<String> {
    body.choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| LlmError::InvalidResponse("no choices in completion".to_string()))
}
