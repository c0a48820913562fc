//! Mock HTTP transport for testing the catalog client.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::external_catalog::{ExternalCatalogError, HttpTransport};

/// A recorded HTTP exchange for test assertions.
#[derive(Debug, Clone)]
pub enum RecordedRequest {
    Post { url: String, body: Value },
    Get { url: String },
}

#[derive(Debug)]
enum QueuedResponse {
    Json(Value),
    Text(String),
    Error(ExternalCatalogError),
}

/// Mock implementation of the HttpTransport trait.
///
/// Responses are served in the order they were queued, regardless of the
/// request method. An empty queue answers with an API error.
#[derive(Debug)]
pub struct MockTransport {
    /// Queued responses.
    responses: Arc<RwLock<VecDeque<QueuedResponse>>>,
    /// Recorded requests.
    requests: Arc<RwLock<Vec<RecordedRequest>>>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    /// Create a new mock transport with an empty response queue.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(RwLock::new(VecDeque::new())),
            requests: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Queue a JSON response.
    pub async fn push_json(&self, value: Value) {
        self.responses
            .write()
            .await
            .push_back(QueuedResponse::Json(value));
    }

    /// Queue a text response.
    pub async fn push_text(&self, text: &str) {
        self.responses
            .write()
            .await
            .push_back(QueuedResponse::Text(text.to_string()));
    }

    /// Queue a failure.
    pub async fn push_error(&self, error: ExternalCatalogError) {
        self.responses
            .write()
            .await
            .push_back(QueuedResponse::Error(error));
    }

    /// Get all recorded requests.
    pub async fn recorded(&self) -> Vec<RecordedRequest> {
        self.requests.read().await.clone()
    }

    /// Get the number of requests made.
    pub async fn request_count(&self) -> usize {
        self.requests.read().await.len()
    }

    async fn next_response(&self) -> Result<QueuedResponse, ExternalCatalogError> {
        self.responses
            .write()
            .await
            .pop_front()
            .ok_or_else(|| ExternalCatalogError::ApiError {
                status: 503,
                message: "no mock response queued".to_string(),
            })
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, ExternalCatalogError> {
        self.requests.write().await.push(RecordedRequest::Post {
            url: url.to_string(),
            body: body.clone(),
        });

        match self.next_response().await? {
            QueuedResponse::Json(value) => Ok(value),
            QueuedResponse::Text(text) => serde_json::from_str(&text)
                .map_err(|e| ExternalCatalogError::ParseError(e.to_string())),
            QueuedResponse::Error(err) => Err(err),
        }
    }

    async fn get_text(&self, url: &str) -> Result<String, ExternalCatalogError> {
        self.requests.write().await.push(RecordedRequest::Get {
            url: url.to_string(),
        });

        match self.next_response().await? {
            QueuedResponse::Json(value) => Ok(value.to_string()),
            QueuedResponse::Text(text) => Ok(text),
            QueuedResponse::Error(err) => Err(err),
        }
    }
}
