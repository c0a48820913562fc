//! Reconciliation engine configuration.

use serde::{Deserialize, Serialize};

use crate::external_catalog::MediaFormat;

/// Configuration for the reconciliation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Only catalog hits of this format are matched in the catalog-anchored pass.
    #[serde(default = "default_target_format")]
    pub target_format: MediaFormat,

    /// Minimum similarity (0.0-1.0) a provider-anchored connector needs to
    /// replace the catalog-anchored one.
    #[serde(default = "default_compare_threshold")]
    pub compare_threshold: f64,

    /// Results requested per catalog search.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_target_format() -> MediaFormat {
    MediaFormat::Novel
}

fn default_compare_threshold() -> f64 {
    0.5
}

fn default_per_page() -> u32 {
    10
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            target_format: default_target_format(),
            compare_threshold: default_compare_threshold(),
            per_page: default_per_page(),
        }
    }
}
