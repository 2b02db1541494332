//! SQLite cache for indexer responses, keyed by content hash of the request.
//!
//! Entries carry their insertion time so callers can bound staleness: a live
//! view reads only fresh entries, a one-shot view accepts any hit.

use rusqlite::{Connection, OptionalExtension};
use sha2::{Digest, Sha256};
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// Content-addressed response cache. Key = SHA-256 of the normalized request.
pub struct ResponseCache {
    conn: Mutex<Connection>,
}

impl ResponseCache {
    /// Open or create cache at `path`. Creates parent dirs if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CacheError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS responses (
                key TEXT PRIMARY KEY,
                body TEXT NOT NULL,
                created_utc INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_responses_created ON responses(created_utc);
            "#,
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Content-hash key from a normalized request identifier (e.g. the JSON
    /// body of a query).
    pub fn key_for(content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Cached body for `key`, restricted to entries younger than
    /// `max_age_secs` when given. `None` on miss or stale entry.
    pub fn get(&self, key: &str, max_age_secs: Option<i64>) -> Result<Option<String>, CacheError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        let mut stmt =
            conn.prepare("SELECT body, created_utc FROM responses WHERE key = ?1")?;
        let row = stmt
            .query_row([key], |r| {
                Ok((r.get::<_, String>(0)?, r.get::<_, i64>(1)?))
            })
            .optional()?;
        let Some((body, created)) = row else {
            return Ok(None);
        };
        if let Some(max_age) = max_age_secs {
            let now = time::OffsetDateTime::now_utc().unix_timestamp();
            if now - created > max_age {
                return Ok(None);
            }
        }
        Ok(Some(body))
    }

    /// Insert or replace the body for `key`.
    pub fn set(&self, key: &str, body: &str) -> Result<(), CacheError> {
        let created = time::OffsetDateTime::now_utc().unix_timestamp();
        let conn = self
            .conn
            .lock()
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        conn.execute(
            "INSERT OR REPLACE INTO responses (key, body, created_utc) VALUES (?1, ?2, ?3)",
            rusqlite::params![key, body, created],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn key_deterministic() {
        let k1 = ResponseCache::key_for(r#"{"accountHash":"0xaa"}"#);
        let k2 = ResponseCache::key_for(r#"{"accountHash":"0xaa"}"#);
        assert_eq!(k1, k2);
        assert_eq!(k1.len(), 64);
    }

    #[test]
    fn get_set_roundtrip() {
        let tmp = NamedTempFile::new().unwrap();
        let cache = ResponseCache::open(tmp.path()).unwrap();
        let key = ResponseCache::key_for("req1");
        cache.set(&key, r#"{"calls":[]}"#).unwrap();
        assert_eq!(
            cache.get(&key, None).unwrap(),
            Some(r#"{"calls":[]}"#.to_string())
        );
        assert!(cache.get("missing", None).unwrap().is_none());
    }

    #[test]
    fn max_age_zero_rejects_existing_entry() {
        let tmp = NamedTempFile::new().unwrap();
        let cache = ResponseCache::open(tmp.path()).unwrap();
        let key = ResponseCache::key_for("req2");
        cache.set(&key, "body").unwrap();
        // a fresh entry is within any generous bound
        assert!(cache.get(&key, Some(3600)).unwrap().is_some());
        // an entry written "now" is still within a zero bound only for the
        // same second; use a negative bound to force staleness
        assert!(cache.get(&key, Some(-1)).unwrap().is_none());
    }
}
