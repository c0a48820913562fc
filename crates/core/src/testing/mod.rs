//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the collaborator traits so the
//! engine and crawler can be exercised without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use anisync_core::testing::{fixtures, MockCatalog, MockProvider};
//!
//! let catalog = MockCatalog::new();
//! let provider = MockProvider::new("mock");
//!
//! // Configure mock responses
//! catalog.add_media(fixtures::novel(1, "Overlord")).await;
//! provider.set_results(vec![fixtures::provider_result("Overlord", "u1")]).await;
//!
//! // Hand both to a ReconciliationEngine...
//! ```

mod mock_catalog;
mod mock_provider;
mod mock_transport;

pub use mock_catalog::{MockCatalog, RecordedCatalogQuery};
pub use mock_provider::MockProvider;
pub use mock_transport::{MockTransport, RecordedRequest};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::external_catalog::{Media, MediaFormat, MediaTitle, MediaType};
    use crate::provider::ProviderResult;

    /// Create a catalog entry with the given romaji title and format.
    pub fn media(id: u64, title: &str, format: MediaFormat) -> Media {
        let media_type = match format {
            MediaFormat::Manga | MediaFormat::Novel | MediaFormat::OneShot => MediaType::Manga,
            _ => MediaType::Anime,
        };

        Media {
            id,
            id_mal: None,
            title: MediaTitle {
                romaji: Some(title.to_string()),
                english: None,
                native: None,
                user_preferred: Some(title.to_string()),
            },
            media_type: Some(media_type),
            format: Some(format),
            status: Some("FINISHED".to_string()),
            description: None,
            cover_image: None,
            banner_image: None,
            start_date: None,
            end_date: None,
            season: None,
            season_year: None,
            episodes: None,
            chapters: None,
            volumes: None,
            genres: vec!["Fantasy".to_string()],
            synonyms: Vec::new(),
            tags: Vec::new(),
            is_adult: Some(false),
            mean_score: None,
            average_score: None,
            popularity: None,
            favourites: None,
            country_of_origin: Some("JP".to_string()),
        }
    }

    /// Create a light novel entry.
    pub fn novel(id: u64, title: &str) -> Media {
        media(id, title, MediaFormat::Novel)
    }

    /// Create a light novel entry that also carries an English title.
    pub fn novel_with_english(id: u64, romaji: &str, english: &str) -> Media {
        let mut entry = novel(id, romaji);
        entry.title.english = Some(english.to_string());
        entry
    }

    /// Create a provider search hit.
    pub fn provider_result(title: &str, url: &str) -> ProviderResult {
        ProviderResult {
            title: title.to_string(),
            url: url.to_string(),
            alt_titles: Vec::new(),
        }
    }
}
