//! External catalog integration for AniList.
//!
//! AniList is the source of canonical media IDs and metadata. Every request
//! goes through a per-client admission gate that caps requests per minute.

mod anilist;
mod rate_limiter;
mod transport;
mod types;

pub use anilist::{AniListClient, AniListConfig};
pub use rate_limiter::RequestGate;
pub use transport::{HttpTransport, ReqwestTransport};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when interacting with the catalog.
#[derive(Debug, Error)]
pub enum ExternalCatalogError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Rate limit exceeded on the remote side (HTTP 429).
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimitExceeded,

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Media type classifier not recognized.
    #[error("Unknown media type: {0}")]
    UnknownMediaType(String),
}

impl ExternalCatalogError {
    /// Whether the remote side reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ExternalCatalogError::ApiError { status: 404, .. })
    }
}

/// Read access to the media catalog.
///
/// Implemented by [`AniListClient`]; the reconciliation engine and the crawler
/// only depend on this trait.
#[async_trait]
pub trait MediaCatalog: Send + Sync {
    /// Search the catalog by free text.
    async fn search(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Media>, ExternalCatalogError>;

    /// Fetch one entry by ID. A missing entry is `Ok(None)`, not an error.
    async fn get_media(&self, id: u64) -> Result<Option<Media>, ExternalCatalogError>;

    /// Every known ID of the given kind, in listing order.
    async fn media_ids(&self, media_type: MediaType) -> Result<Vec<u64>, ExternalCatalogError>;
}
