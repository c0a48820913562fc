//! Anify novel search provider.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use super::{ProviderAdapter, ProviderError, ProviderResult};

/// Anify provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnifyConfig {
    /// Register this provider.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_api_url() -> String {
    "https://api.anify.tv".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for AnifyConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            api_url: default_api_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Searches the Anify novel index.
pub struct AnifyProvider {
    client: Client,
    api_url: String,
}

impl AnifyProvider {
    pub fn new(config: AnifyConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    fn document_url(&self, id: &str) -> String {
        format!("{}/pdf/{}", self.api_url, id)
    }
}

#[async_trait]
impl ProviderAdapter for AnifyProvider {
    fn name(&self) -> &str {
        "anify"
    }

    async fn search(&self, query: &str) -> Result<Vec<ProviderResult>, ProviderError> {
        let url = format!("{}/search/novels", self.api_url);
        debug!(provider = "anify", query = query, "Searching provider");

        let response = self
            .client
            .post(&url)
            .json(&json!({ "query": query }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let items: Vec<AnifyItem> = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse response: {}", e)))?;

        Ok(items
            .into_iter()
            .map(|item| ProviderResult {
                url: self.document_url(&item.id),
                title: item.title,
                alt_titles: Vec::new(),
            })
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct AnifyItem {
    id: String,
    title: String,
}
