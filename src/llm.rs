//! Hosted LLM client — OpenAI-compatible chat completions against Groq.

use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, instrument};

use crate::config::Settings;
use crate::constants::{APP_NAME, APP_VERSION, DEFAULT_MAX_TOKENS};
use crate::error::{CrewError, Result, sanitize_upstream_message};

/// Map a 0–100 temperature onto the 0–1 range the API expects.
pub fn normalize_temperature(temperature: f64) -> f64 {
    temperature / 100.0
}

/// Everything needed to talk to the model for one run.
#[derive(Clone, Debug)]
pub struct LlmConfig {
    pub model: String,
    pub api_key: String,
    pub base_url: String,
    /// Already normalised to 0–1.
    pub temperature: f64,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl LlmConfig {
    pub fn from_settings(settings: &Settings, temperature: f64) -> Self {
        LlmConfig {
            model: settings.model.clone(),
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.clone(),
            temperature,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: settings.timeout,
        }
    }
}

/// One message in a chat exchange.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        ChatMessage {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Token accounting reported by the provider.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

impl TokenUsage {
    pub fn add(&mut self, other: &TokenUsage) {
        self.prompt_tokens += other.prompt_tokens;
        self.completion_tokens += other.completion_tokens;
        self.total_tokens += other.total_tokens;
    }
}

/// A finished completion.
#[derive(Clone, Debug, PartialEq)]
pub struct Completion {
    pub content: String,
    pub usage: Option<TokenUsage>,
}

/// Anything that can answer a chat exchange.
#[allow(async_fn_in_trait)]
pub trait ChatModel {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<Completion>;
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    usage: Option<TokenUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Thin wrapper around the Groq HTTP API.
#[derive(Clone)]
pub struct GroqClient {
    config: LlmConfig,
    http_client: HttpClient,
}

impl GroqClient {
    pub fn new(config: LlmConfig) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(config.timeout)
            .user_agent(format!("{APP_NAME}/{APP_VERSION}"))
            .build()
            .map_err(|err| CrewError::Config(format!("build HTTP client: {err}")))?;
        Ok(GroqClient {
            config,
            http_client,
        })
    }

    fn request_body(&self, messages: &[ChatMessage]) -> Value {
        json!({
            "model": self.config.model,
            "messages": messages,
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
        })
    }
}

impl ChatModel for GroqClient {
    #[instrument(skip_all, fields(model = %self.config.model, messages = messages.len()))]
    async fn complete(&self, messages: &[ChatMessage]) -> Result<Completion> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        debug!("sending chat completion request");

        let response = self
            .http_client
            .post(url)
            .bearer_auth(&self.config.api_key)
            .json(&self.request_body(messages))
            .send()
            .await
            .map_err(|err| CrewError::Transport(err.without_url().to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| CrewError::Transport(err.without_url().to_string()))?;

        if !status.is_success() {
            return Err(CrewError::Upstream {
                status: status.as_u16(),
                message: sanitize_upstream_message(&text),
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|err| CrewError::InvalidResponse(format!("decode chat response: {err}")))?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CrewError::InvalidResponse("no choices in response".to_string()))?;

        let content = choice.message.content.unwrap_or_default();
        debug!(chars = content.len(), usage = ?parsed.usage, "chat completion received");
        Ok(Completion {
            content,
            usage: parsed.usage,
        })
    }
}
