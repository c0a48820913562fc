//! Records produced by reconciliation.

use serde::{Deserialize, Serialize};

use crate::external_catalog::Media;
use crate::matching::Similarity;

/// A provider source link attached to a canonical entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Connector {
    /// Provider URL of the matched item.
    pub id: String,
    /// How closely the provider title matched the entry.
    pub similarity: Similarity,
}

/// One canonical catalog entry and every connector matched to it.
///
/// `id` always equals `data.id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormattedResponse {
    pub id: u64,
    pub data: Media,
    pub connectors: Vec<Connector>,
}

impl FormattedResponse {
    /// Start a record for `media` with a single connector.
    pub fn new(media: Media, connector: Connector) -> Self {
        Self {
            id: media.id,
            data: media,
            connectors: vec![connector],
        }
    }

    /// Find a connector by provider URL.
    pub fn connector(&self, id: &str) -> Option<&Connector> {
        self.connectors.iter().find(|c| c.id == id)
    }
}

/// A single provider hit paired with its best catalog entry.
#[derive(Debug, Clone)]
pub struct SearchMatch {
    pub connector_id: String,
    pub media: Media,
    pub similarity: Similarity,
}
