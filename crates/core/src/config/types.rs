use serde::{Deserialize, Serialize};

use crate::cache::CacheConfig;
use crate::crawl::CrawlConfig;
use crate::external_catalog::AniListConfig;
use crate::provider::AnifyConfig;
use crate::reconcile::EngineConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: AniListConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub crawl: CrawlConfig,
}

/// Content provider configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub anify: AnifyConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external_catalog::{MediaFormat, MediaType, Season};

    #[test]
    fn test_deserialize_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.catalog.api_url, "https://graphql.anilist.co");
        assert_eq!(config.catalog.rate_limit_per_minute, 30);
        assert_eq!(config.catalog.search_format, Some(MediaFormat::Novel));
        assert!(config.providers.anify.enabled);
        assert!(!config.cache.enabled);
        assert_eq!(config.engine.compare_threshold, 0.5);
        assert_eq!(config.crawl.media_type, MediaType::Manga);
    }

    #[test]
    fn test_deserialize_full_config() {
        let toml = r#"
[catalog]
rate_limit_per_minute = 60
search_type = "ANIME"
season = "FALL"
season_year = 2024

[providers.anify]
enabled = false
api_url = "http://localhost:3000"

[cache]
enabled = true
path = "/data/anisync.db"
insert_results = true

[engine]
target_format = "MANGA"
per_page = 25

[crawl]
media_type = "ANIME"
stop_on_error = true
max_ids = 100
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.catalog.rate_limit_per_minute, 60);
        assert_eq!(config.catalog.search_type, MediaType::Anime);
        assert_eq!(config.catalog.season, Season::Fall);
        assert_eq!(config.catalog.next_year, 2023);
        assert!(!config.providers.anify.enabled);
        assert_eq!(config.providers.anify.api_url, "http://localhost:3000");
        assert!(config.cache.insert_results);
        assert_eq!(config.cache.path.to_str().unwrap(), "/data/anisync.db");
        assert_eq!(config.engine.target_format, MediaFormat::Manga);
        assert_eq!(config.engine.per_page, 25);
        assert_eq!(config.crawl.max_ids, Some(100));
        assert!(config.crawl.stop_on_error);
    }

    #[test]
    fn test_deserialize_unknown_media_type_fails() {
        let toml = r#"
[crawl]
media_type = "NOVEL"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }
}
