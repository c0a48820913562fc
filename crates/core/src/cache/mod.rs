//! Media cache - reconciled records from previous searches.
//!
//! The cache lets `get` answer without touching the catalog or providers when
//! an ID has already been reconciled.

mod sqlite;

pub use sqlite::SqliteMediaCache;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::reconcile::FormattedResponse;

/// Trait for media cache storage.
pub trait MediaCache: Send + Sync {
    /// Get a cached record by canonical ID.
    fn get(&self, id: u64) -> Result<Option<FormattedResponse>, CacheError>;

    /// Store records, ignoring IDs that are already cached.
    ///
    /// Returns the number of new records added.
    fn insert(&self, records: &[FormattedResponse]) -> Result<u32, CacheError>;
}

/// Cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Enable the cache.
    #[serde(default)]
    pub enabled: bool,
    /// SQLite database file.
    #[serde(default = "default_cache_path")]
    pub path: PathBuf,
    /// Write every search result to the cache.
    #[serde(default)]
    pub insert_results: bool,
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("anisync.db")
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_cache_path(),
            insert_results: false,
        }
    }
}

/// Errors for cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
