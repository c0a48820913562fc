//! HTTP transport used by the catalog client.
//!
//! The transport performs exactly one HTTP exchange per call and never
//! retries. Retry and pacing decisions belong to the caller.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::{debug, warn};

use super::ExternalCatalogError;

/// Raw HTTP access needed by the catalog client.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST a JSON body and decode the JSON response.
    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, ExternalCatalogError>;

    /// GET a URL and return the body as text.
    async fn get_text(&self, url: &str) -> Result<String, ExternalCatalogError>;
}

/// `reqwest`-backed transport.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with the given User-Agent and request timeout.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, ExternalCatalogError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    async fn check_status(response: Response) -> Result<Response, ExternalCatalogError> {
        let status = response.status();
        if status == 429 {
            warn!("Catalog rate limit exceeded");
            return Err(ExternalCatalogError::RateLimitExceeded);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExternalCatalogError::ApiError {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, ExternalCatalogError> {
        debug!(url = url, "POST catalog query");

        let response = self
            .client
            .post(url)
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ExternalCatalogError::ParseError(format!("Invalid JSON body: {}", e)))
    }

    async fn get_text(&self, url: &str) -> Result<String, ExternalCatalogError> {
        debug!(url = url, "GET catalog listing");

        let response = self.client.get(url).send().await?;
        let response = Self::check_status(response).await?;
        Ok(response.text().await?)
    }
}
