//! SQLite-backed media cache implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use super::{CacheError, MediaCache};
use crate::reconcile::FormattedResponse;

/// SQLite-backed media cache.
///
/// One row per canonical ID; the entry and its connectors are stored as JSON.
pub struct SqliteMediaCache {
    conn: Mutex<Connection>,
}

impl SqliteMediaCache {
    /// Create a new SQLite cache, creating the database file and table if needed.
    pub fn new(path: &Path) -> Result<Self, CacheError> {
        let conn = Connection::open(path).map_err(|e| CacheError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite cache (useful for testing).
    pub fn in_memory() -> Result<Self, CacheError> {
        let conn =
            Connection::open_in_memory().map_err(|e| CacheError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), CacheError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS media_cache (
                id INTEGER PRIMARY KEY,
                data TEXT NOT NULL,
                connectors TEXT NOT NULL,
                cached_at TEXT NOT NULL
            );
            "#,
        )
        .map_err(|e| CacheError::Database(e.to_string()))?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, CacheError> {
        self.conn
            .lock()
            .map_err(|_| CacheError::Database("cache connection lock poisoned".to_string()))
    }

    /// Number of cached records.
    pub fn count(&self) -> Result<u64, CacheError> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM media_cache", [], |row| row.get(0))
            .map_err(|e| CacheError::Database(e.to_string()))?;
        Ok(count as u64)
    }
}

impl MediaCache for SqliteMediaCache {
    fn get(&self, id: u64) -> Result<Option<FormattedResponse>, CacheError> {
        let conn = self.lock()?;

        let row: Option<(String, String)> = conn
            .query_row(
                "SELECT data, connectors FROM media_cache WHERE id = ?",
                params![id as i64],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .map_err(|e| CacheError::Database(e.to_string()))?;

        let Some((data, connectors)) = row else {
            return Ok(None);
        };

        Ok(Some(FormattedResponse {
            id,
            data: serde_json::from_str(&data)?,
            connectors: serde_json::from_str(&connectors)?,
        }))
    }

    fn insert(&self, records: &[FormattedResponse]) -> Result<u32, CacheError> {
        let conn = self.lock()?;
        let now = Utc::now().to_rfc3339();
        let mut new_count = 0;

        for record in records {
            let data = serde_json::to_string(&record.data)?;
            let connectors = serde_json::to_string(&record.connectors)?;

            let changed = conn
                .execute(
                    "INSERT OR IGNORE INTO media_cache (id, data, connectors, cached_at)
                     VALUES (?, ?, ?, ?)",
                    params![record.id as i64, &data, &connectors, &now],
                )
                .map_err(|e| CacheError::Database(e.to_string()))?;
            new_count += changed as u32;
        }

        Ok(new_count)
    }
}
