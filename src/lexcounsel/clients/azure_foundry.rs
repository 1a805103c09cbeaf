//! Azure AI Foundry (Azure OpenAI) chat-completions backend.
//!
//! Same wire shape as the OpenAI backend, but the model is addressed through
//! a deployment name in the URL and authentication accepts either an `api-key`
//! header or an Entra bearer token.

use async_trait::async_trait;
use std::env;

use crate::lexcounsel::clients::common::{build_wire_messages, ChatRequest, ChatResponse};
use crate::lexcounsel::clients::get_http_client;
use crate::lexcounsel::completion::{CompletionClient, CompletionError};
use crate::lexcounsel::schema::{Document, Message};

const DEFAULT_API_VERSION: &str = "2023-09-01-preview";

#[derive(Debug, Clone)]
pub struct AzureFoundryConfig {
    pub endpoint: String,
    pub deployment: String,
    pub api_version: String,
    pub temperature: f32,
    pub api_key: Option<String>,
    pub azure_ad_token: Option<String>,
}

impl AzureFoundryConfig {
    /// Read `AZURE_OPENAI_ENDPOINT`, `AZURE_OPENAI_DEPLOYMENT` (both
    /// required), `AZURE_OPENAI_API_VERSION` (with `OPENAI_API_VERSION` as a
    /// fallback), `OPENAI_TEMPERATURE`, and one of `AZURE_OPENAI_API_KEY` or
    /// `AZURE_OPENAI_AD_TOKEN` from the environment.
    pub fn from_env() -> Result<Self, CompletionError> {
        let endpoint = trimmed_env("AZURE_OPENAI_ENDPOINT");
        let deployment = trimmed_env("AZURE_OPENAI_DEPLOYMENT");
        if endpoint.is_empty() {
            return Err("AZURE_OPENAI_ENDPOINT is required when LLM_PROVIDER=azure_foundry".into());
        }
        if deployment.is_empty() {
            return Err(
                "AZURE_OPENAI_DEPLOYMENT is required when LLM_PROVIDER=azure_foundry".into(),
            );
        }

        let api_version = [
            trimmed_env("AZURE_OPENAI_API_VERSION"),
            trimmed_env("OPENAI_API_VERSION"),
        ]
        .iter()
        .find(|value| !value.is_empty())
        .cloned()
        .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        let temperature_raw = trimmed_env("OPENAI_TEMPERATURE");
        let temperature = if temperature_raw.is_empty() {
            0.2
        } else {
            temperature_raw.parse::<f32>().map_err(|err| {
                format!("Invalid OPENAI_TEMPERATURE '{}': {}", temperature_raw, err)
            })?
        };

        let api_key = non_empty(trimmed_env("AZURE_OPENAI_API_KEY"));
        let azure_ad_token = non_empty(trimmed_env("AZURE_OPENAI_AD_TOKEN"));
        if api_key.is_none() && azure_ad_token.is_none() {
            return Err(
                "AZURE_OPENAI_API_KEY or AZURE_OPENAI_AD_TOKEN is required when LLM_PROVIDER=azure_foundry"
                    .into(),
            );
        }

        let auth_method = if azure_ad_token.is_some() {
            "azure_ad_token"
        } else {
            "api_key"
        };
        log::info!(
            "Azure Foundry config: auth_method={} endpoint={} deployment={} api_version={} temperature={}",
            auth_method,
            endpoint,
            deployment,
            api_version,
            temperature
        );

        Ok(AzureFoundryConfig {
            endpoint,
            deployment,
            api_version,
            temperature,
            api_key,
            azure_ad_token,
        })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint.trim_end_matches('/'),
            self.deployment,
            self.api_version
        )
    }
}

fn trimmed_env(name: &str) -> String {
    env::var(name).unwrap_or_default().trim().to_string()
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

pub struct AzureFoundryClient {
    config: AzureFoundryConfig,
    client: reqwest::Client,
}

impl AzureFoundryClient {
    pub fn new(config: AzureFoundryConfig) -> Self {
        let client = get_http_client(&config.endpoint);
        AzureFoundryClient { config, client }
    }
}

#[async_trait]
impl CompletionClient for AzureFoundryClient {
    async fn complete(
        &self,
        agent_name: &str,
        system_prompt: &str,
        conversation: &[Message],
        documents: &[Document],
    ) -> Result<String, CompletionError> {
        // The deployment in the URL selects the model.
        let request = ChatRequest {
            model: None,
            temperature: self.config.temperature,
            messages: build_wire_messages(system_prompt, conversation, documents),
        };

        log::debug!(
            "Azure Foundry completion for {}: deployment={} messages={}",
            agent_name,
            self.config.deployment,
            request.messages.len()
        );

        let mut builder = self.client.post(self.config.completions_url()).json(&request);
        if let Some(token) = &self.config.azure_ad_token {
            builder = builder.bearer_auth(token);
        } else if let Some(api_key) = &self.config.api_key {
            builder = builder.header("api-key", api_key);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("Azure Foundry request failed with {}: {}", status, body).into());
        }

        let parsed: ChatResponse = response.json().await?;
        Ok(parsed.first_content())
    }
}
