use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::{CandleRow, CandleStore};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS exchange (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS candle (
    exchange_id TEXT NOT NULL REFERENCES exchange(id),
    base TEXT NOT NULL,
    quote TEXT NOT NULL,
    asset TEXT NOT NULL,
    interval_secs INTEGER NOT NULL,
    timestamp_ms INTEGER NOT NULL,
    open REAL NOT NULL,
    high REAL NOT NULL,
    low REAL NOT NULL,
    close REAL NOT NULL,
    volume REAL NOT NULL,
    PRIMARY KEY(exchange_id, base, quote, asset, interval_secs, timestamp_ms)
);
"#;

/// SQLite-backed candle storage over a single connection.
pub struct SqliteCandleStore {
    conn: Mutex<Connection>,
}

impl SqliteCandleStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open sqlite db {}", path.display()))?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.ensure_schema()?;
        Ok(store)
    }

    pub fn ensure_schema(&self) -> Result<()> {
        self.lock()?.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Register an exchange name and return its id. Existing names keep their id.
    pub fn register_exchange(&self, name: &str) -> Result<String> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO exchange (id, name) VALUES (?1, ?2) ON CONFLICT(name) DO NOTHING",
            params![uuid::Uuid::new_v4().to_string(), name],
        )?;
        let id: String =
            tx.query_row("SELECT id FROM exchange WHERE name = ?1", [name], |row| {
                row.get(0)
            })?;
        tx.commit()?;
        Ok(id)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("sqlite connection mutex poisoned"))
    }
}

impl CandleStore for SqliteCandleStore {
    fn insert_candles(&self, rows: &[CandleRow]) -> Result<usize> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut written = 0;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO candle (
                    exchange_id, base, quote, asset, interval_secs, timestamp_ms,
                    open, high, low, close, volume
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                ON CONFLICT(exchange_id, base, quote, asset, interval_secs, timestamp_ms)
                DO UPDATE SET
                    open = excluded.open,
                    high = excluded.high,
                    low = excluded.low,
                    close = excluded.close,
                    volume = excluded.volume
                "#,
            )?;
            for r in rows {
                written += stmt.execute(params![
                    r.exchange_id,
                    r.base,
                    r.quote,
                    r.asset,
                    r.interval_secs,
                    r.timestamp.timestamp_millis(),
                    r.open,
                    r.high,
                    r.low,
                    r.close,
                    r.volume,
                ])?;
            }
        }
        tx.commit().context("candle insert commit failed")?;
        Ok(written)
    }

    fn query_candles(
        &self,
        exchange_id: &str,
        base: &str,
        quote: &str,
        asset: &str,
        interval_secs: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CandleRow>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT timestamp_ms, open, high, low, close, volume
            FROM candle
            WHERE exchange_id = ?1 AND base = ?2 AND quote = ?3 AND asset = ?4
              AND interval_secs = ?5 AND timestamp_ms BETWEEN ?6 AND ?7
            ORDER BY timestamp_ms ASC
            "#,
        )?;

        let rows = stmt.query_map(
            params![
                exchange_id,
                base,
                quote,
                asset,
                interval_secs,
                start.timestamp_millis(),
                end.timestamp_millis(),
            ],
            |row| {
                let ms: i64 = row.get(0)?;
                Ok(CandleRow {
                    exchange_id: exchange_id.to_string(),
                    base: base.to_string(),
                    quote: quote.to_string(),
                    asset: asset.to_string(),
                    interval_secs,
                    timestamp: DateTime::from_timestamp_millis(ms).unwrap_or_default(),
                    open: row.get(1)?,
                    high: row.get(2)?,
                    low: row.get(3)?,
                    close: row.get(4)?,
                    volume: row.get(5)?,
                })
            },
        )?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn resolve_exchange_id(&self, name: &str) -> Result<Option<String>> {
        let conn = self.lock()?;
        let id = conn
            .query_row("SELECT id FROM exchange WHERE name = ?1", [name], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(id)
    }
}
