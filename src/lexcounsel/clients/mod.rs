//! Completion backends and their shared HTTP plumbing.

pub mod azure_foundry;
pub mod common;
pub mod mock;
pub mod openai;

use lazy_static::lazy_static;
use std::collections::HashMap;
use std::env;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::lexcounsel::completion::{CompletionClient, CompletionError};

use self::azure_foundry::{AzureFoundryClient, AzureFoundryConfig};
use self::mock::MockCompletionClient;
use self::openai::{OpenAIClient, OpenAIConfig};

lazy_static! {
    /// One pooled reqwest client per base URL, so connections and TLS
    /// sessions are reused across completion calls.
    static ref HTTP_CLIENT_POOL: Mutex<HashMap<String, reqwest::Client>> =
        Mutex::new(HashMap::new());
}

/// Get or build the shared HTTP client for `base_url`.
pub fn get_http_client(base_url: &str) -> reqwest::Client {
    let mut pool = match HTTP_CLIENT_POOL.lock() {
        Ok(pool) => pool,
        Err(poisoned) => poisoned.into_inner(),
    };
    if let Some(client) = pool.get(base_url) {
        return client.clone();
    }

    let client = reqwest::ClientBuilder::new()
        .pool_idle_timeout(Some(Duration::from_secs(90)))
        .pool_max_idle_per_host(10)
        .tcp_keepalive(Some(Duration::from_secs(60)))
        .timeout(Duration::from_secs(300))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new());

    pool.insert(base_url.to_string(), client.clone());
    client
}

/// Build the completion backend selected by `LLM_PROVIDER`.
///
/// Recognized values are `mock` (the default), `openai`, and `azure_foundry`.
pub fn client_from_env() -> Result<Arc<dyn CompletionClient>, CompletionError> {
    let provider = env::var("LLM_PROVIDER")
        .unwrap_or_else(|_| "mock".to_string())
        .trim()
        .to_lowercase();
    match provider.as_str() {
        "mock" => Ok(Arc::new(MockCompletionClient)),
        "openai" => Ok(Arc::new(OpenAIClient::new(OpenAIConfig::from_env()?))),
        "azure_foundry" | "azurefoundry" => Ok(Arc::new(AzureFoundryClient::new(
            AzureFoundryConfig::from_env()?,
        ))),
        other => Err(format!(
            "Unsupported LLM_PROVIDER '{}'. Expected mock, openai, or azure_foundry.",
            other
        )
        .into()),
    }
}
