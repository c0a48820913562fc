//! Crawl orchestrator implementation.
//!
//! Lists every catalog ID of one media type and reconciles the entries of the
//! target format one at a time. Each ID costs exactly one catalog lookup plus
//! at most one reconciliation.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::external_catalog::{ExternalCatalogError, MediaFormat, MediaType};
use crate::reconcile::{FormattedResponse, ReconcileError, ReconciliationEngine};

/// Configuration for the crawler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Which catalog listing to walk.
    #[serde(default = "default_media_type")]
    pub media_type: MediaType,

    /// Abort on the first failed ID instead of skipping it.
    #[serde(default)]
    pub stop_on_error: bool,

    /// Maximum IDs to visit (default: the whole listing).
    #[serde(default)]
    pub max_ids: Option<usize>,
}

fn default_media_type() -> MediaType {
    MediaType::Manga
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            media_type: default_media_type(),
            stop_on_error: false,
            max_ids: None,
        }
    }
}

/// Errors that end a crawl.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Failed to list catalog IDs: {0}")]
    Listing(#[source] ExternalCatalogError),

    #[error("Failed to fetch ID {id}: {source}")]
    Fetch {
        id: u64,
        #[source]
        source: ExternalCatalogError,
    },

    #[error("Failed to reconcile ID {id}: {source}")]
    Reconcile {
        id: u64,
        #[source]
        source: ReconcileError,
    },
}

/// Counts logged at the end of a crawl.
#[derive(Debug, Default)]
struct CrawlSummary {
    visited: usize,
    matched: usize,
    skipped: usize,
    failed: usize,
}

impl CrawlSummary {
    fn record<T>(&mut self, outcome: &Result<Option<T>, CrawlError>) {
        self.visited += 1;
        match outcome {
            Ok(Some(_)) => self.matched += 1,
            Ok(None) => self.skipped += 1,
            Err(_) => self.failed += 1,
        }
    }
}

/// Walks the catalog and reconciles every entry of the target format.
pub struct CrawlOrchestrator {
    engine: Arc<ReconciliationEngine>,
    config: CrawlConfig,
}

impl CrawlOrchestrator {
    pub fn new(engine: Arc<ReconciliationEngine>, config: CrawlConfig) -> Self {
        Self { engine, config }
    }

    /// Crawl with the configured error policy and ID cap.
    pub async fn run(&self) -> Result<Vec<FormattedResponse>, CrawlError> {
        self.crawl(self.config.stop_on_error, self.config.max_ids)
            .await
    }

    /// Crawl the listing, visiting at most `max_ids` IDs.
    ///
    /// Successful records are returned in listing order. A failed ID is
    /// logged and skipped unless `stop_on_error` is set, in which case the
    /// crawl ends with that error. Failing to obtain the listing is always
    /// fatal.
    pub async fn crawl(
        &self,
        stop_on_error: bool,
        max_ids: Option<usize>,
    ) -> Result<Vec<FormattedResponse>, CrawlError> {
        let started = Instant::now();
        let catalog = self.engine.catalog();
        let target_format = self.engine.config().target_format;

        let ids = catalog
            .media_ids(self.config.media_type)
            .await
            .map_err(CrawlError::Listing)?;
        let max = max_ids.map_or(ids.len(), |m| m.min(ids.len()));

        info!(
            media_type = %self.config.media_type,
            listed = ids.len(),
            max = max,
            "Starting crawl"
        );

        let mut results = Vec::new();
        let mut summary = CrawlSummary::default();

        for (i, &id) in ids.iter().take(max).enumerate() {
            let item_started = Instant::now();
            let outcome = self.visit(id, target_format).await;
            summary.record(&outcome);

            match outcome {
                Ok(Some(record)) => results.push(record),
                Ok(None) => {}
                Err(e) => {
                    warn!(id = id, error = %e, "Crawl item failed");
                    if stop_on_error {
                        return Err(e);
                    }
                }
            }

            debug!(
                id = id,
                elapsed_ms = item_started.elapsed().as_millis() as u64,
                "Fetched ID #{}/{}",
                i + 1,
                max
            );
        }

        info!(
            visited = summary.visited,
            matched = summary.matched,
            skipped = summary.skipped,
            failed = summary.failed,
            duration_ms = started.elapsed().as_millis() as u64,
            "Crawl finished"
        );

        Ok(results)
    }

    async fn visit(
        &self,
        id: u64,
        target_format: MediaFormat,
    ) -> Result<Option<FormattedResponse>, CrawlError> {
        let media = self
            .engine
            .catalog()
            .get_media(id)
            .await
            .map_err(|source| CrawlError::Fetch { id, source })?;

        match media {
            Some(media) if media.is_format(target_format) => self
                .engine
                .resolve(&media)
                .await
                .map_err(|source| CrawlError::Reconcile { id, source }),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderAdapter;
    use crate::reconcile::EngineConfig;
    use crate::testing::{fixtures, MockCatalog, MockProvider};

    #[test]
    fn test_summary_counts_each_outcome() {
        let mut summary = CrawlSummary::default();
        summary.record::<()>(&Ok(Some(())));
        summary.record::<()>(&Ok(None));
        summary.record::<()>(&Ok(None));
        summary.record::<()>(&Err(CrawlError::Fetch {
            id: 3,
            source: ExternalCatalogError::RateLimitExceeded,
        }));

        assert_eq!(summary.visited, 4);
        assert_eq!(summary.matched, 1);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.failed, 1);
    }

    fn orchestrator(catalog: Arc<MockCatalog>, provider: Arc<MockProvider>) -> CrawlOrchestrator {
        let providers: Vec<Arc<dyn ProviderAdapter>> = vec![provider];
        let engine = ReconciliationEngine::new(EngineConfig::default(), catalog, providers);
        CrawlOrchestrator::new(Arc::new(engine), CrawlConfig::default())
    }

    #[test]
    fn test_config_defaults() {
        let config: CrawlConfig = toml::from_str("").unwrap();
        assert_eq!(config.media_type, MediaType::Manga);
        assert!(!config.stop_on_error);
        assert!(config.max_ids.is_none());
    }

    #[test]
    fn test_config_rejects_unknown_media_type() {
        let parsed: Result<CrawlConfig, _> = toml::from_str(r#"media_type = "MOVIE""#);
        assert!(parsed.is_err());
    }

    #[tokio::test]
    async fn test_listing_failure_is_fatal() {
        let catalog = Arc::new(MockCatalog::new());
        catalog
            .set_next_error(ExternalCatalogError::RateLimitExceeded)
            .await;

        let err = orchestrator(catalog, Arc::new(MockProvider::new("p")))
            .crawl(false, None)
            .await
            .unwrap_err();
        assert!(matches!(err, CrawlError::Listing(_)));
    }

    #[tokio::test]
    async fn test_missing_entries_are_skipped() {
        let catalog = Arc::new(MockCatalog::new());
        catalog.set_ids(MediaType::Manga, vec![1, 2]).await;
        let provider = Arc::new(MockProvider::new("p"));

        let results = orchestrator(catalog.clone(), provider.clone())
            .crawl(true, None)
            .await
            .unwrap();

        assert!(results.is_empty());
        assert_eq!(catalog.lookup_count().await, 2);
        assert_eq!(provider.search_count().await, 0);
    }

    #[tokio::test]
    async fn test_max_ids_larger_than_listing() {
        let catalog = Arc::new(MockCatalog::new());
        catalog.set_ids(MediaType::Manga, vec![1]).await;
        catalog.add_media(fixtures::media(1, "A", MediaFormat::Manga)).await;

        orchestrator(catalog.clone(), Arc::new(MockProvider::new("p")))
            .crawl(false, Some(50))
            .await
            .unwrap();

        assert_eq!(catalog.lookup_count().await, 1);
    }
}
