//! Types for AniList API responses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ExternalCatalogError;

// ============================================================================
// Classifiers
// ============================================================================

/// Top-level media kind, also the name of the sitemap listing it is crawled from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaType {
    Anime,
    Manga,
}

impl MediaType {
    /// Lower-case name used in sitemap URLs and media paths.
    pub fn slug(&self) -> &'static str {
        match self {
            MediaType::Anime => "anime",
            MediaType::Manga => "manga",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for MediaType {
    type Err = ExternalCatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "anime" => Ok(MediaType::Anime),
            "manga" => Ok(MediaType::Manga),
            other => Err(ExternalCatalogError::UnknownMediaType(other.to_string())),
        }
    }
}

/// Release format of a catalog entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaFormat {
    Tv,
    TvShort,
    Movie,
    Special,
    Ova,
    Ona,
    Music,
    Manga,
    Novel,
    OneShot,
    /// Any format this crate does not know about yet.
    #[serde(other)]
    Unknown,
}

/// Airing season.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

// ============================================================================
// Media
// ============================================================================

/// Title variants of a catalog entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaTitle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub romaji: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub english: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_preferred: Option<String>,
}

impl MediaTitle {
    /// Display title: user-preferred, then romaji, English, native.
    /// Empty variants are skipped.
    pub fn preferred(&self) -> Option<&str> {
        [
            self.user_preferred.as_deref(),
            self.romaji.as_deref(),
            self.english.as_deref(),
            self.native.as_deref(),
        ]
        .into_iter()
        .flatten()
        .find(|t| !t.is_empty())
    }

    /// All present title variants.
    pub fn variants(&self) -> impl Iterator<Item = &str> {
        [
            self.romaji.as_deref(),
            self.english.as_deref(),
            self.native.as_deref(),
            self.user_preferred.as_deref(),
        ]
        .into_iter()
        .flatten()
    }
}

/// Year/month/day triple where any part may be unknown.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FuzzyDate {
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub day: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CoverImage {
    #[serde(default)]
    pub extra_large: Option<String>,
    #[serde(default)]
    pub large: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaTag {
    pub id: u64,
    pub name: String,
}

/// A catalog entry as returned by AniList.
///
/// Only `id` and `title` are required; everything else is descriptive and
/// defaults when the API omits it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    /// AniList ID (the canonical ID).
    pub id: u64,
    #[serde(default)]
    pub id_mal: Option<u64>,
    pub title: MediaTitle,
    #[serde(default, rename = "type")]
    pub media_type: Option<MediaType>,
    #[serde(default)]
    pub format: Option<MediaFormat>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cover_image: Option<CoverImage>,
    #[serde(default)]
    pub banner_image: Option<String>,
    #[serde(default)]
    pub start_date: Option<FuzzyDate>,
    #[serde(default)]
    pub end_date: Option<FuzzyDate>,
    #[serde(default)]
    pub season: Option<Season>,
    #[serde(default)]
    pub season_year: Option<i32>,
    #[serde(default)]
    pub episodes: Option<u32>,
    #[serde(default)]
    pub chapters: Option<u32>,
    #[serde(default)]
    pub volumes: Option<u32>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub genres: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub synonyms: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<MediaTag>,
    #[serde(default)]
    pub is_adult: Option<bool>,
    #[serde(default)]
    pub mean_score: Option<u32>,
    #[serde(default)]
    pub average_score: Option<u32>,
    #[serde(default)]
    pub popularity: Option<u32>,
    #[serde(default)]
    pub favourites: Option<u32>,
    #[serde(default)]
    pub country_of_origin: Option<String>,
}

impl Media {
    /// Title used when searching for this entry elsewhere.
    pub fn preferred_title(&self) -> Option<&str> {
        self.title.preferred()
    }

    /// Every title variant followed by every synonym.
    pub fn alt_titles(&self) -> Vec<String> {
        self.title
            .variants()
            .chain(self.synonyms.iter().map(String::as_str))
            .map(str::to_string)
            .collect()
    }

    /// Whether the entry has the given format.
    pub fn is_format(&self, format: MediaFormat) -> bool {
        self.format == Some(format)
    }
}

/// AniList sends `null` for empty lists on some entries.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// The five seasonal listings fetched in one request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeasonalMedia {
    pub trending: Vec<Media>,
    pub season: Vec<Media>,
    pub next_season: Vec<Media>,
    pub popular: Vec<Media>,
    pub top: Vec<Media>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferred_skips_empty_variants() {
        let title = MediaTitle {
            user_preferred: Some(String::new()),
            romaji: Some("Overlord".to_string()),
            ..Default::default()
        };
        assert_eq!(title.preferred(), Some("Overlord"));

        let title = MediaTitle {
            user_preferred: Some(String::new()),
            romaji: Some(String::new()),
            english: None,
            native: Some("オーバーロード".to_string()),
        };
        assert_eq!(title.preferred(), Some("オーバーロード"));

        let title = MediaTitle {
            user_preferred: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(title.preferred(), None);
    }

    #[test]
    fn test_media_decodes_minimal_shape() {
        let json = r#"{"id": 1, "title": {"romaji": "Overlord"}}"#;
        let media: Media = serde_json::from_str(json).unwrap();
        assert_eq!(media.id, 1);
        assert_eq!(media.preferred_title(), Some("Overlord"));
        assert!(media.genres.is_empty());
        assert!(media.format.is_none());
    }

    #[test]
    fn test_media_rejects_missing_title() {
        let json = r#"{"id": 1, "format": "NOVEL"}"#;
        assert!(serde_json::from_str::<Media>(json).is_err());
    }

    #[test]
    fn test_media_accepts_null_lists() {
        let json = r#"{"id": 7, "title": {}, "genres": null, "synonyms": null, "tags": null}"#;
        let media: Media = serde_json::from_str(json).unwrap();
        assert!(media.synonyms.is_empty());
        assert!(media.tags.is_empty());
    }

    #[test]
    fn test_unknown_format_decodes() {
        let json = r#"{"id": 1, "title": {}, "format": "HOLOGRAM"}"#;
        let media: Media = serde_json::from_str(json).unwrap();
        assert_eq!(media.format, Some(MediaFormat::Unknown));
    }

    #[test]
    fn test_format_wire_names() {
        assert_eq!(
            serde_json::to_string(&MediaFormat::TvShort).unwrap(),
            "\"TV_SHORT\""
        );
        assert_eq!(
            serde_json::from_str::<MediaFormat>("\"ONE_SHOT\"").unwrap(),
            MediaFormat::OneShot
        );
    }

    #[test]
    fn test_preferred_title_chain() {
        let mut title = MediaTitle {
            romaji: Some("Romaji".to_string()),
            english: Some("English".to_string()),
            native: Some("ネイティブ".to_string()),
            user_preferred: Some("Preferred".to_string()),
        };
        assert_eq!(title.preferred(), Some("Preferred"));
        title.user_preferred = None;
        assert_eq!(title.preferred(), Some("Romaji"));
        title.romaji = None;
        assert_eq!(title.preferred(), Some("English"));
        title.english = None;
        assert_eq!(title.preferred(), Some("ネイティブ"));
        title.native = None;
        assert_eq!(title.preferred(), None);
    }

    #[test]
    fn test_alt_titles_include_variants_and_synonyms() {
        let json = r#"{
            "id": 2,
            "title": {"romaji": "Youkoso", "english": "Classroom of the Elite", "native": null},
            "synonyms": ["CotE"]
        }"#;
        let media: Media = serde_json::from_str(json).unwrap();
        assert_eq!(
            media.alt_titles(),
            vec!["Youkoso", "Classroom of the Elite", "CotE"]
        );
    }

    #[test]
    fn test_media_type_from_str() {
        assert_eq!("manga".parse::<MediaType>().unwrap(), MediaType::Manga);
        assert_eq!(" ANIME ".parse::<MediaType>().unwrap(), MediaType::Anime);
        assert!(matches!(
            "novel".parse::<MediaType>(),
            Err(ExternalCatalogError::UnknownMediaType(kind)) if kind == "novel"
        ));
    }

    #[test]
    fn test_media_round_trips_camel_case() {
        let json = r#"{"id": 3, "idMal": 9, "title": {"userPreferred": "X"}, "seasonYear": 2020, "countryOfOrigin": "JP"}"#;
        let media: Media = serde_json::from_str(json).unwrap();
        assert_eq!(media.id_mal, Some(9));
        let back = serde_json::to_value(&media).unwrap();
        assert_eq!(back["title"]["userPreferred"], "X");
        assert_eq!(back["countryOfOrigin"], "JP");
    }
}
