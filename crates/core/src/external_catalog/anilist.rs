//! AniList GraphQL client.
//!
//! AniList requires:
//! - JSON-bodied POST requests against a single GraphQL endpoint
//! - Rate limiting: every call, sitemap listings included, passes the
//!   client's [`RequestGate`] (30 counted requests per minute by default)

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::rate_limiter::RequestGate;
use super::transport::{HttpTransport, ReqwestTransport};
use super::types::{Media, MediaFormat, MediaType, Season, SeasonalMedia};
use super::{ExternalCatalogError, MediaCatalog};

/// Number of sitemap pages per media type.
const SITEMAP_PAGES: u32 = 2;

/// Fields requested for every media entry.
const MEDIA_FIELDS: &str = r#"
    id
    idMal
    title { romaji english native userPreferred }
    type
    format
    status(version: 2)
    description
    coverImage { extraLarge large }
    bannerImage
    startDate { year month day }
    endDate { year month day }
    season
    seasonYear
    episodes
    chapters
    volumes
    genres
    synonyms
    tags { id name }
    isAdult
    meanScore
    averageScore
    popularity
    favourites
    countryOfOrigin
"#;

static ANIME_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"anime/([0-9]+)").expect("anime id pattern is valid"));

static MANGA_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"manga/([0-9]+)").expect("manga id pattern is valid"));

/// AniList client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AniListConfig {
    /// GraphQL endpoint.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Public site hosting the sitemap listings.
    #[serde(default = "default_site_url")]
    pub site_url: String,
    /// Counted requests per minute.
    #[serde(default = "default_rate_limit")]
    pub rate_limit_per_minute: u32,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Media type searched by free-text queries.
    #[serde(default = "default_search_type")]
    pub search_type: MediaType,
    /// Format filter applied to free-text queries (none = any format).
    #[serde(default = "default_search_format")]
    pub search_format: Option<MediaFormat>,
    #[serde(default = "default_season")]
    pub season: Season,
    #[serde(default = "default_season_year")]
    pub season_year: i32,
    #[serde(default = "default_next_season")]
    pub next_season: Season,
    #[serde(default = "default_season_year")]
    pub next_year: i32,
}

fn default_api_url() -> String {
    "https://graphql.anilist.co".to_string()
}

fn default_site_url() -> String {
    "https://anilist.co".to_string()
}

fn default_rate_limit() -> u32 {
    30
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("anisync/{}", env!("CARGO_PKG_VERSION"))
}

fn default_search_type() -> MediaType {
    MediaType::Manga
}

fn default_search_format() -> Option<MediaFormat> {
    Some(MediaFormat::Novel)
}

fn default_season() -> Season {
    Season::Winter
}

fn default_next_season() -> Season {
    Season::Spring
}

fn default_season_year() -> i32 {
    2023
}

impl Default for AniListConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            site_url: default_site_url(),
            rate_limit_per_minute: default_rate_limit(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
            search_type: default_search_type(),
            search_format: default_search_format(),
            season: default_season(),
            season_year: default_season_year(),
            next_season: default_next_season(),
            next_year: default_season_year(),
        }
    }
}

/// AniList API client.
pub struct AniListClient {
    transport: Arc<dyn HttpTransport>,
    gate: RequestGate,
    config: AniListConfig,
}

impl AniListClient {
    /// Create a new client backed by `reqwest`.
    pub fn new(config: AniListConfig) -> Result<Self, ExternalCatalogError> {
        let transport = ReqwestTransport::new(
            &config.user_agent,
            Duration::from_secs(config.timeout_secs),
        )?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client over an existing transport.
    pub fn with_transport(config: AniListConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let gate = RequestGate::new(config.rate_limit_per_minute);
        Self {
            transport,
            gate,
            config,
        }
    }

    /// Replace the admission gate (tests use short windows).
    pub fn with_gate(mut self, gate: RequestGate) -> Self {
        self.gate = gate;
        self
    }

    /// The admission gate in front of every request.
    pub fn gate(&self) -> &RequestGate {
        &self.gate
    }

    /// Send one GraphQL document and decode its `data` member.
    async fn graphql<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> Result<T, ExternalCatalogError> {
        self.gate.admit().await;

        let body = json!({ "query": query, "variables": variables });
        let value = self.transport.post_json(&self.config.api_url, &body).await?;

        let response: GraphQlResponse<T> = serde_json::from_value(value).map_err(|e| {
            ExternalCatalogError::ParseError(format!("Unexpected GraphQL response shape: {}", e))
        })?;

        if let Some(error) = response.errors.into_iter().next() {
            return Err(ExternalCatalogError::ApiError {
                status: error.status.unwrap_or(400),
                message: error.message,
            });
        }

        response
            .data
            .ok_or_else(|| ExternalCatalogError::ParseError("GraphQL response had no data".into()))
    }

    /// Search for media by title.
    pub async fn search(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Media>, ExternalCatalogError> {
        debug!(
            "AniList search: query='{}', page={}, per_page={}",
            query, page, per_page
        );

        let document = format!(
            r#"query ($page: Int, $perPage: Int, $search: String, $type: MediaType, $format: MediaFormat) {{
                Page(page: $page, perPage: $perPage) {{
                    media(type: $type, format: $format, search: $search) {{ {MEDIA_FIELDS} }}
                }}
            }}"#
        );
        let variables = json!({
            "search": query,
            "type": self.config.search_type,
            "format": self.config.search_format,
            "page": page,
            "perPage": per_page,
        });

        let data: PageData = self.graphql(&document, variables).await?;
        Ok(data.page.media)
    }

    /// Fetch a single entry. Returns `Ok(None)` when AniList has no such ID.
    pub async fn get_media(&self, id: u64) -> Result<Option<Media>, ExternalCatalogError> {
        debug!("AniList get media: id={}", id);

        let document = format!(
            r#"query ($id: Int) {{
                Media(id: $id) {{ {MEDIA_FIELDS} }}
            }}"#
        );

        match self.graphql::<MediaData>(&document, json!({ "id": id })).await {
            Ok(data) => Ok(data.media),
            Err(e) if e.is_not_found() => {
                debug!("AniList media {} not found", id);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// All anime IDs listed in the sitemap.
    pub async fn anime_ids(&self) -> Result<Vec<u64>, ExternalCatalogError> {
        self.sitemap_ids(MediaType::Anime).await
    }

    /// All manga IDs listed in the sitemap.
    pub async fn manga_ids(&self) -> Result<Vec<u64>, ExternalCatalogError> {
        self.sitemap_ids(MediaType::Manga).await
    }

    async fn sitemap_ids(&self, media_type: MediaType) -> Result<Vec<u64>, ExternalCatalogError> {
        let mut ids = Vec::new();

        for page in 0..SITEMAP_PAGES {
            let url = format!(
                "{}/sitemap/{}-{}.xml",
                self.config.site_url.trim_end_matches('/'),
                media_type.slug(),
                page
            );

            self.gate.admit().await;
            let body = self.transport.get_text(&url).await?;

            let page_ids = extract_ids(&body, media_type);
            if page_ids.is_empty() {
                warn!("Sitemap page {} listed no {} IDs", url, media_type);
            }
            ids.extend(page_ids);
        }

        debug!("Sitemap listed {} {} IDs", ids.len(), media_type);
        Ok(ids)
    }

    /// Trending, current season, next season, popular and top-rated listings.
    pub async fn get_seasonal(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<SeasonalMedia, ExternalCatalogError> {
        let document = format!(
            r#"query ($page: Int, $perPage: Int, $type: MediaType, $season: MediaSeason, $seasonYear: Int, $nextSeason: MediaSeason, $nextYear: Int) {{
                trending: Page(page: $page, perPage: $perPage) {{
                    media(sort: TRENDING_DESC, type: $type, isAdult: false) {{ ...media }}
                }}
                season: Page(page: $page, perPage: $perPage) {{
                    media(season: $season, seasonYear: $seasonYear, sort: POPULARITY_DESC, type: $type, isAdult: false) {{ ...media }}
                }}
                nextSeason: Page(page: $page, perPage: $perPage) {{
                    media(season: $nextSeason, seasonYear: $nextYear, sort: POPULARITY_DESC, type: $type, isAdult: false) {{ ...media }}
                }}
                popular: Page(page: $page, perPage: $perPage) {{
                    media(sort: POPULARITY_DESC, type: $type, isAdult: false) {{ ...media }}
                }}
                top: Page(page: $page, perPage: $perPage) {{
                    media(sort: SCORE_DESC, type: $type, isAdult: false) {{ ...media }}
                }}
            }}

            fragment media on Media {{ {MEDIA_FIELDS} }}"#
        );
        let variables = json!({
            "page": page,
            "perPage": per_page,
            "type": self.config.search_type,
            "season": self.config.season,
            "seasonYear": self.config.season_year,
            "nextSeason": self.config.next_season,
            "nextYear": self.config.next_year,
        });

        let data: SeasonalData = self.graphql(&document, variables).await?;
        Ok(SeasonalMedia {
            trending: data.trending.media,
            season: data.season.media,
            next_season: data.next_season.media,
            popular: data.popular.media,
            top: data.top.media,
        })
    }
}

#[async_trait]
impl MediaCatalog for AniListClient {
    async fn search(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Media>, ExternalCatalogError> {
        AniListClient::search(self, query, page, per_page).await
    }

    async fn get_media(&self, id: u64) -> Result<Option<Media>, ExternalCatalogError> {
        AniListClient::get_media(self, id).await
    }

    async fn media_ids(&self, media_type: MediaType) -> Result<Vec<u64>, ExternalCatalogError> {
        self.sitemap_ids(media_type).await
    }
}

/// Pull numeric IDs out of a sitemap body, in document order.
fn extract_ids(body: &str, media_type: MediaType) -> Vec<u64> {
    let pattern = match media_type {
        MediaType::Anime => &ANIME_ID,
        MediaType::Manga => &MANGA_ID,
    };

    pattern
        .captures_iter(body)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}

// ============================================================================
// AniList API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
    #[serde(default)]
    status: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct PageData {
    #[serde(rename = "Page")]
    page: MediaPage,
}

#[derive(Debug, Deserialize)]
struct MediaPage {
    #[serde(default)]
    media: Vec<Media>,
}

#[derive(Debug, Deserialize)]
struct MediaData {
    #[serde(rename = "Media")]
    media: Option<Media>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeasonalData {
    trending: MediaPage,
    season: MediaPage,
    next_season: MediaPage,
    popular: MediaPage,
    top: MediaPage,
}
