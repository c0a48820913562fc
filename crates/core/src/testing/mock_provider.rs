//! Mock content provider for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::provider::{ProviderAdapter, ProviderError, ProviderResult};

/// Mock implementation of the ProviderAdapter trait.
///
/// Returns configured results for every query unless results were pinned for
/// that exact query. Searches are recorded in call order.
#[derive(Debug)]
pub struct MockProvider {
    name: String,
    /// Results returned for any query without pinned results.
    results: Arc<RwLock<Vec<ProviderResult>>>,
    /// Exact results for specific queries.
    query_results: Arc<RwLock<HashMap<String, Vec<ProviderResult>>>>,
    /// Recorded search queries.
    searches: Arc<RwLock<Vec<String>>>,
    /// If set, the next search will fail with this error.
    next_error: Arc<RwLock<Option<ProviderError>>>,
    /// If set, every search fails.
    always_fail: Arc<RwLock<bool>>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("mock")
    }
}

impl MockProvider {
    /// Create a new mock provider with no results.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            results: Arc::new(RwLock::new(Vec::new())),
            query_results: Arc::new(RwLock::new(HashMap::new())),
            searches: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            always_fail: Arc::new(RwLock::new(false)),
        }
    }

    /// Set the results returned for any query.
    pub async fn set_results(&self, results: Vec<ProviderResult>) {
        *self.results.write().await = results;
    }

    /// Return exactly these results when `query` is searched.
    pub async fn set_query_results(&self, query: &str, results: Vec<ProviderResult>) {
        self.query_results
            .write()
            .await
            .insert(query.to_string(), results);
    }

    /// Get all recorded search queries.
    pub async fn recorded_searches(&self) -> Vec<String> {
        self.searches.read().await.clone()
    }

    /// Get the number of searches performed.
    pub async fn search_count(&self) -> usize {
        self.searches.read().await.len()
    }

    /// Configure the next search to fail with the given error.
    pub async fn set_next_error(&self, error: ProviderError) {
        *self.next_error.write().await = Some(error);
    }

    /// Make every search fail.
    pub async fn set_always_fail(&self, fail: bool) {
        *self.always_fail.write().await = fail;
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(&self, query: &str) -> Result<Vec<ProviderResult>, ProviderError> {
        self.searches.write().await.push(query.to_string());

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }
        if *self.always_fail.read().await {
            return Err(ProviderError::ConnectionFailed(format!(
                "{} is unavailable",
                self.name
            )));
        }

        if let Some(results) = self.query_results.read().await.get(query) {
            return Ok(results.clone());
        }
        Ok(self.results.read().await.clone())
    }
}
