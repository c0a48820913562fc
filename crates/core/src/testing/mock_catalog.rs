//! Mock media catalog for testing.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::external_catalog::{ExternalCatalogError, Media, MediaCatalog, MediaType};

/// A recorded catalog query for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCatalogQuery {
    Search {
        query: String,
        page: u32,
        per_page: u32,
    },
    GetMedia {
        id: u64,
    },
    MediaIds {
        media_type: MediaType,
    },
}

/// Mock implementation of the MediaCatalog trait.
///
/// Provides controllable behavior for testing:
/// - Serve entries by ID and answer searches by title substring
/// - Pin exact search results for specific queries
/// - Track queries for assertions
/// - Simulate one-shot or per-ID failures
///
/// # Example
///
/// ```rust,ignore
/// use anisync_core::testing::{MockCatalog, fixtures};
///
/// let catalog = MockCatalog::new();
/// catalog.add_media(fixtures::novel(1, "Overlord")).await;
///
/// let results = catalog.search("overlord", 1, 10).await?;
/// assert_eq!(results.len(), 1);
/// ```
#[derive(Debug)]
pub struct MockCatalog {
    /// Entries by ID.
    media: Arc<RwLock<BTreeMap<u64, Media>>>,
    /// Exact results for specific queries.
    search_results: Arc<RwLock<HashMap<String, Vec<Media>>>>,
    /// ID listings by media type.
    ids: Arc<RwLock<HashMap<MediaType, Vec<u64>>>>,
    /// IDs whose lookup always fails.
    failing_ids: Arc<RwLock<HashSet<u64>>>,
    /// Recorded queries.
    queries: Arc<RwLock<Vec<RecordedCatalogQuery>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<ExternalCatalogError>>>,
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCatalog {
    /// Create a new empty mock catalog.
    pub fn new() -> Self {
        Self {
            media: Arc::new(RwLock::new(BTreeMap::new())),
            search_results: Arc::new(RwLock::new(HashMap::new())),
            ids: Arc::new(RwLock::new(HashMap::new())),
            failing_ids: Arc::new(RwLock::new(HashSet::new())),
            queries: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Add an entry.
    pub async fn add_media(&self, media: Media) {
        self.media.write().await.insert(media.id, media);
    }

    /// Return exactly these results when `query` is searched.
    pub async fn set_search_results(&self, query: &str, results: Vec<Media>) {
        self.search_results
            .write()
            .await
            .insert(query.to_string(), results);
    }

    /// Set the ID listing for a media type.
    pub async fn set_ids(&self, media_type: MediaType, ids: Vec<u64>) {
        self.ids.write().await.insert(media_type, ids);
    }

    /// Make every lookup of `id` fail.
    pub async fn fail_id(&self, id: u64) {
        self.failing_ids.write().await.insert(id);
    }

    // =========================================================================
    // Query Recording
    // =========================================================================

    /// Get all recorded queries.
    pub async fn recorded_queries(&self) -> Vec<RecordedCatalogQuery> {
        self.queries.read().await.clone()
    }

    /// Get the number of `get_media` lookups performed.
    pub async fn lookup_count(&self) -> usize {
        self.queries
            .read()
            .await
            .iter()
            .filter(|q| matches!(q, RecordedCatalogQuery::GetMedia { .. }))
            .count()
    }

    /// Get the number of searches performed.
    pub async fn search_count(&self) -> usize {
        self.queries
            .read()
            .await
            .iter()
            .filter(|q| matches!(q, RecordedCatalogQuery::Search { .. }))
            .count()
    }

    /// Clear recorded queries.
    pub async fn clear_recorded(&self) {
        self.queries.write().await.clear();
    }

    // =========================================================================
    // Error Injection
    // =========================================================================

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: ExternalCatalogError) {
        *self.next_error.write().await = Some(error);
    }

    /// Take the next error if set.
    async fn take_error(&self) -> Option<ExternalCatalogError> {
        self.next_error.write().await.take()
    }

    /// Record a query.
    async fn record(&self, query: RecordedCatalogQuery) {
        self.queries.write().await.push(query);
    }
}

#[async_trait]
impl MediaCatalog for MockCatalog {
    async fn search(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Media>, ExternalCatalogError> {
        self.record(RecordedCatalogQuery::Search {
            query: query.to_string(),
            page,
            per_page,
        })
        .await;

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        if let Some(results) = self.search_results.read().await.get(query) {
            return Ok(results.iter().take(per_page as usize).cloned().collect());
        }

        let query_lower = query.to_lowercase();
        let results = self
            .media
            .read()
            .await
            .values()
            .filter(|m| {
                m.title
                    .variants()
                    .any(|t| t.to_lowercase().contains(&query_lower))
            })
            .take(per_page as usize)
            .cloned()
            .collect();

        Ok(results)
    }

    async fn get_media(&self, id: u64) -> Result<Option<Media>, ExternalCatalogError> {
        self.record(RecordedCatalogQuery::GetMedia { id }).await;

        if let Some(err) = self.take_error().await {
            return Err(err);
        }
        if self.failing_ids.read().await.contains(&id) {
            return Err(ExternalCatalogError::ApiError {
                status: 500,
                message: format!("lookup of {} failed", id),
            });
        }

        Ok(self.media.read().await.get(&id).cloned())
    }

    async fn media_ids(&self, media_type: MediaType) -> Result<Vec<u64>, ExternalCatalogError> {
        self.record(RecordedCatalogQuery::MediaIds { media_type })
            .await;

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        Ok(self
            .ids
            .read()
            .await
            .get(&media_type)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_search_by_title_substring() {
        let catalog = MockCatalog::new();
        catalog.add_media(fixtures::novel(1, "Overlord")).await;
        catalog.add_media(fixtures::novel(2, "Goblin Slayer")).await;

        let results = catalog.search("overlord", 1, 10).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, 1);
    }

    #[tokio::test]
    async fn test_pinned_results_win_and_respect_per_page() {
        let catalog = MockCatalog::new();
        catalog
            .set_search_results(
                "x",
                vec![fixtures::novel(5, "A"), fixtures::novel(6, "B")],
            )
            .await;

        let results = catalog.search("x", 1, 1).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, 5);
    }

    #[tokio::test]
    async fn test_get_media_missing_is_none() {
        let catalog = MockCatalog::new();
        assert!(catalog.get_media(9).await.unwrap().is_none());
        assert_eq!(catalog.lookup_count().await, 1);
    }

    #[tokio::test]
    async fn test_failing_id_always_fails() {
        let catalog = MockCatalog::new();
        catalog.add_media(fixtures::novel(3, "C")).await;
        catalog.fail_id(3).await;

        assert!(catalog.get_media(3).await.is_err());
        assert!(catalog.get_media(3).await.is_err());
    }

    #[tokio::test]
    async fn test_next_error_is_one_shot() {
        let catalog = MockCatalog::new();
        catalog
            .set_next_error(ExternalCatalogError::RateLimitExceeded)
            .await;

        assert!(catalog.media_ids(MediaType::Manga).await.is_err());
        assert!(catalog.media_ids(MediaType::Manga).await.unwrap().is_empty());
    }
}
