use crate::model::CacheError;
use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection};
use serde_json::Value;

/// Ticker-keyed cache of raw provent payloads with a freshness window.
/// The analysis engine never touches this; it only ever receives already
/// resolved payloads.
pub struct SqliteCache {
    conn: Connection,
    ttl: Duration,
}

impl SqliteCache {
    pub fn new(db_path: &str, ttl_hours: i64) -> Result<Self, CacheError> {
        Self::with_connection(Connection::open(db_path)?, ttl_hours)
    }

    fn with_connection(conn: Connection, ttl_hours: i64) -> Result<Self, CacheError> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS provent_cache (
                ticker TEXT PRIMARY KEY,
                payload TEXT NOT NULL,
                fetched_at TEXT NOT NULL
            );
            ",
        )?;

        Ok(Self {
            conn,
            ttl: Duration::hours(ttl_hours),
        })
    }

    /// Returns the cached payload for a ticker while it is within the TTL;
    /// a stale entry reads as a miss.
    pub fn get(&self, ticker: &str) -> Result<Option<Value>, CacheError> {
        let mut stmt = self
            .conn
            .prepare("SELECT payload, fetched_at FROM provent_cache WHERE ticker = ?1")?;
        let mut rows = stmt.query(params![ticker])?;

        if let Some(row) = rows.next()? {
            let payload: String = row.get(0)?;
            let fetched_at_str: String = row.get(1)?;
            let fetched_at: DateTime<Utc> = fetched_at_str
                .parse()
                .map_err(|_| CacheError::Corrupt(ticker.to_string()))?;

            if Utc::now().signed_duration_since(fetched_at) >= self.ttl {
                return Ok(None);
            }

            let value = serde_json::from_str(&payload)
                .map_err(|_| CacheError::Corrupt(ticker.to_string()))?;
            Ok(Some(value))
        } else {
            Ok(None)
        }
    }

    pub fn put(&self, ticker: &str, payload: &Value) -> Result<(), CacheError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO provent_cache (ticker, payload, fetched_at)
             VALUES (?1, ?2, ?3)",
            params![ticker, payload.to_string(), Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn clear(&self) -> Result<(), CacheError> {
        self.conn.execute("DELETE FROM provent_cache", [])?;
        Ok(())
    }
}
