//! Bidirectional catalog/provider search.
//!
//! A search runs two passes:
//! - Catalog-anchored: one catalog search, every provider hit matched against
//!   the catalog hits of the target format
//! - Provider-anchored: every provider hit searched in the catalog on its own
//!   (sanitized) title, matched without a format filter
//!
//! The second pass can only upgrade connectors found by the first, and only
//! when it scores at least `compare_threshold`.

use std::sync::Arc;
use std::time::Instant;

use futures::future::try_join_all;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::cache::{CacheError, MediaCache};
use crate::external_catalog::{ExternalCatalogError, Media, MediaCatalog};
use crate::matching::{sanitize_title, similarity, Similarity};
use crate::provider::{ProviderAdapter, ProviderError, ProviderResult};

use super::config::EngineConfig;
use super::merge::{format_search, search_compare};
use super::types::{FormattedResponse, SearchMatch};

/// Errors that abort a reconciliation.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Catalog request failed: {0}")]
    Catalog(#[from] ExternalCatalogError),

    #[error("Provider '{provider}' failed: {source}")]
    Provider {
        provider: String,
        #[source]
        source: ProviderError,
    },

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

/// Matches provider search results to canonical catalog entries.
pub struct ReconciliationEngine {
    config: EngineConfig,
    catalog: Arc<dyn MediaCatalog>,
    providers: Vec<Arc<dyn ProviderAdapter>>,
    cache: Option<Arc<dyn MediaCache>>,
    insert_results: bool,
}

impl ReconciliationEngine {
    /// Create an engine without a cache.
    pub fn new(
        config: EngineConfig,
        catalog: Arc<dyn MediaCatalog>,
        providers: Vec<Arc<dyn ProviderAdapter>>,
    ) -> Self {
        Self {
            config,
            catalog,
            providers,
            cache: None,
            insert_results: false,
        }
    }

    /// Attach a cache. Lookups always consult it; search results are written
    /// to it only when `insert_results` is set.
    pub fn with_cache(mut self, cache: Arc<dyn MediaCache>, insert_results: bool) -> Self {
        self.cache = Some(cache);
        self.insert_results = insert_results;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The catalog this engine searches.
    pub fn catalog(&self) -> &Arc<dyn MediaCatalog> {
        &self.catalog
    }

    /// Names of the registered providers, in registration order.
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Run both passes for `query` and merge them.
    pub async fn search(&self, query: &str) -> Result<Vec<FormattedResponse>, ReconcileError> {
        let start = Instant::now();

        let catalog_pass = self.catalog_anchored_search(query).await?;
        let merged = search_compare(Vec::new(), catalog_pass, 0.0);
        debug!(query = %query, records = merged.len(), "Catalog-anchored pass complete");

        let provider_pass = self.provider_anchored_search(query).await?;
        debug!(query = %query, records = provider_pass.len(), "Provider-anchored pass complete");
        let merged = search_compare(merged, provider_pass, self.config.compare_threshold);

        if self.insert_results {
            if let Some(cache) = &self.cache {
                let inserted = cache.insert(&merged)?;
                debug!(inserted = inserted, "Stored search results");
            }
        }

        info!(
            query = %query,
            records = merged.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Search complete"
        );

        Ok(merged)
    }

    /// Search the catalog once and match every provider hit against the
    /// catalog hits of the target format.
    pub async fn catalog_anchored_search(
        &self,
        query: &str,
    ) -> Result<Vec<FormattedResponse>, ReconcileError> {
        let (hits, provider_results) = tokio::try_join!(
            async {
                self.catalog
                    .search(query, 1, self.config.per_page)
                    .await
                    .map_err(ReconcileError::from)
            },
            self.search_providers(query),
        )?;

        let candidates: Vec<&Media> = hits
            .iter()
            .filter(|m| m.is_format(self.config.target_format))
            .collect();

        let matches = provider_results
            .into_iter()
            .filter_map(|result| {
                best_match(&result, candidates.iter().copied()).map(|(media, similarity)| {
                    SearchMatch {
                        connector_id: result.url,
                        media: media.clone(),
                        similarity,
                    }
                })
            })
            .collect();

        Ok(format_search(matches))
    }

    /// Search every provider, then look each hit up in the catalog by its
    /// sanitized title.
    pub async fn provider_anchored_search(
        &self,
        query: &str,
    ) -> Result<Vec<FormattedResponse>, ReconcileError> {
        let provider_results = self.search_providers(query).await?;

        let mut matches = Vec::new();
        for result in provider_results {
            let hits = self
                .catalog
                .search(&sanitize_title(&result.title), 1, self.config.per_page)
                .await?;

            if let Some((media, similarity)) = best_match(&result, hits.iter()) {
                matches.push(SearchMatch {
                    connector_id: result.url,
                    media: media.clone(),
                    similarity,
                });
            }
        }

        Ok(format_search(matches))
    }

    /// Look up a canonical entry by catalog ID.
    ///
    /// Returns the cached record when there is one. Otherwise the entry is
    /// fetched and reconciled; `None` when the catalog does not know the ID or
    /// the search does not reproduce it.
    pub async fn get(&self, id: u64) -> Result<Option<FormattedResponse>, ReconcileError> {
        if let Some(cached) = self.cached(id)? {
            return Ok(Some(cached));
        }

        match self.catalog.get_media(id).await? {
            Some(media) => self.reconcile_entry(&media).await,
            None => {
                debug!(id = id, "Catalog entry not found");
                Ok(None)
            }
        }
    }

    /// Like [`get`](Self::get) for an entry that was already fetched.
    pub async fn resolve(&self, media: &Media) -> Result<Option<FormattedResponse>, ReconcileError> {
        if let Some(cached) = self.cached(media.id)? {
            return Ok(Some(cached));
        }
        self.reconcile_entry(media).await
    }

    fn cached(&self, id: u64) -> Result<Option<FormattedResponse>, ReconcileError> {
        match &self.cache {
            Some(cache) => {
                let hit = cache.get(id)?;
                if hit.is_some() {
                    debug!(id = id, "Cache hit");
                }
                Ok(hit)
            }
            None => Ok(None),
        }
    }

    async fn reconcile_entry(
        &self,
        media: &Media,
    ) -> Result<Option<FormattedResponse>, ReconcileError> {
        let Some(title) = media.preferred_title() else {
            warn!(id = media.id, "Catalog entry has no title");
            return Ok(None);
        };

        let results = self.search(title).await?;
        Ok(results.into_iter().find(|r| r.id == media.id))
    }

    async fn search_providers(&self, query: &str) -> Result<Vec<ProviderResult>, ReconcileError> {
        let searches = self.providers.iter().map(|provider| async move {
            let results = provider
                .search(query)
                .await
                .map_err(|source| ReconcileError::Provider {
                    provider: provider.name().to_string(),
                    source,
                })?;
            debug!(
                provider = provider.name(),
                results = results.len(),
                "Provider search complete"
            );
            Ok::<_, ReconcileError>(results)
        });

        let results = try_join_all(searches).await?;
        Ok(results.into_iter().flatten().collect())
    }
}

/// Pick the catalog entry that best matches a provider hit.
///
/// Ties keep the earlier entry.
fn best_match<'a>(
    result: &ProviderResult,
    candidates: impl IntoIterator<Item = &'a Media>,
) -> Option<(&'a Media, Similarity)> {
    let mut best: Option<(&Media, Similarity)> = None;

    for media in candidates {
        let title = media.preferred_title().unwrap_or_default();
        let score = similarity(title, &result.title, &media.alt_titles());

        if best.map_or(true, |(_, b)| score.value > b.value) {
            best = Some((media, score));
        }
    }

    best
}
