//! Content provider abstraction.
//!
//! A provider is any source searchable by free text that returns candidate
//! titles and their source URLs. The engine treats every registered provider
//! the same way through [`ProviderAdapter`].

mod anify;

pub use anify::{AnifyConfig, AnifyProvider};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One search hit from a provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProviderResult {
    /// Title as listed by the provider.
    pub title: String,
    /// Source URL; doubles as the provider-side identity of the connector.
    pub url: String,
    /// Alternate titles, when the provider lists any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alt_titles: Vec<String>,
}

/// Errors that can occur during provider searches.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Provider API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse provider response: {0}")]
    ParseError(String),

    #[error("Request timeout")]
    Timeout,
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProviderError::Timeout
        } else if e.is_decode() {
            ProviderError::ParseError(e.to_string())
        } else {
            ProviderError::ConnectionFailed(e.to_string())
        }
    }
}

/// Trait for content provider search backends.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Search the provider by free text.
    async fn search(&self, query: &str) -> Result<Vec<ProviderResult>, ProviderError>;
}
