//! OpenAI chat-completions backend.

use async_trait::async_trait;
use std::env;

use crate::lexcounsel::clients::common::{build_wire_messages, ChatRequest, ChatResponse};
use crate::lexcounsel::clients::get_http_client;
use crate::lexcounsel::completion::{CompletionClient, CompletionError};
use crate::lexcounsel::schema::{Document, Message};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub base_url: String,
}

impl OpenAIConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        OpenAIConfig {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Read `OPENAI_API_KEY` (required), `OPENAI_MODEL`, and
    /// `OPENAI_TEMPERATURE` from the environment.
    pub fn from_env() -> Result<Self, CompletionError> {
        let api_key = env::var("OPENAI_API_KEY").unwrap_or_default();
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err("OPENAI_API_KEY is required when LLM_PROVIDER=openai".into());
        }

        let mut config = OpenAIConfig::new(api_key);
        if let Ok(model) = env::var("OPENAI_MODEL") {
            let model = model.trim();
            if !model.is_empty() {
                config.model = model.to_string();
            }
        }
        if let Ok(temperature) = env::var("OPENAI_TEMPERATURE") {
            config.temperature = temperature.trim().parse::<f32>().map_err(|err| {
                format!("Invalid OPENAI_TEMPERATURE '{}': {}", temperature, err)
            })?;
        }
        Ok(config)
    }
}

pub struct OpenAIClient {
    config: OpenAIConfig,
    client: reqwest::Client,
}

impl OpenAIClient {
    pub fn new(config: OpenAIConfig) -> Self {
        let client = get_http_client(&config.base_url);
        OpenAIClient { config, client }
    }
}

#[async_trait]
impl CompletionClient for OpenAIClient {
    async fn complete(
        &self,
        agent_name: &str,
        system_prompt: &str,
        conversation: &[Message],
        documents: &[Document],
    ) -> Result<String, CompletionError> {
        let request = ChatRequest {
            model: Some(self.config.model.clone()),
            temperature: self.config.temperature,
            messages: build_wire_messages(system_prompt, conversation, documents),
        };

        log::debug!(
            "OpenAI completion for {}: model={} messages={}",
            agent_name,
            self.config.model,
            request.messages.len()
        );

        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("OpenAI request failed with {}: {}", status, body).into());
        }

        let parsed: ChatResponse = response.json().await?;
        Ok(parsed.first_content())
    }
}
