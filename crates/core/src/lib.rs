pub mod cache;
pub mod config;
pub mod crawl;
pub mod external_catalog;
pub mod matching;
pub mod provider;
pub mod reconcile;
pub mod testing;

pub use cache::{CacheConfig, CacheError, MediaCache, SqliteMediaCache};
pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, Config,
    ConfigError, ProvidersConfig,
};
pub use crawl::{CrawlConfig, CrawlError, CrawlOrchestrator};
pub use external_catalog::{
    AniListClient, AniListConfig, ExternalCatalogError, HttpTransport, Media, MediaCatalog,
    MediaFormat, MediaTitle, MediaType, RequestGate, ReqwestTransport, Season, SeasonalMedia,
};
pub use matching::{sanitize_title, similarity, Similarity, MATCH_THRESHOLD};
pub use provider::{AnifyConfig, AnifyProvider, ProviderAdapter, ProviderError, ProviderResult};
pub use reconcile::{
    format_search, search_compare, Connector, EngineConfig, FormattedResponse, ReconcileError,
    ReconciliationEngine, SearchMatch,
};
