use ::postgres::{Client, NoTls};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

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
    interval_secs BIGINT NOT NULL,
    timestamp TIMESTAMPTZ NOT NULL,
    open DOUBLE PRECISION NOT NULL,
    high DOUBLE PRECISION NOT NULL,
    low DOUBLE PRECISION NOT NULL,
    close DOUBLE PRECISION NOT NULL,
    volume DOUBLE PRECISION NOT NULL,
    PRIMARY KEY(exchange_id, base, quote, asset, interval_secs, timestamp)
);
"#;

/// Postgres-backed candle storage. Opens a fresh connection for every call so no
/// client or transaction outlives it.
///
/// A `load_from_database` call therefore connects twice: once to resolve the
/// exchange id and once to query the candles.
pub struct PostgresCandleStore {
    dsn: String,
}

impl PostgresCandleStore {
    pub fn new(dsn: impl Into<String>) -> Self {
        Self { dsn: dsn.into() }
    }

    pub fn ensure_schema(&self) -> Result<()> {
        self.connect()?
            .batch_execute(SCHEMA)
            .context("postgres schema setup failed")
    }

    /// Register an exchange name and return its id. Existing names keep their id.
    pub fn register_exchange(&self, name: &str) -> Result<String> {
        let mut client = self.connect()?;
        let mut tx = client.transaction()?;
        tx.execute(
            "INSERT INTO exchange (id, name) VALUES ($1, $2) ON CONFLICT (name) DO NOTHING",
            &[&uuid::Uuid::new_v4().to_string(), &name],
        )?;
        let id: String = tx
            .query_one("SELECT id FROM exchange WHERE name = $1", &[&name])?
            .try_get(0)?;
        tx.commit()?;
        Ok(id)
    }

    fn connect(&self) -> Result<Client> {
        Client::connect(&self.dsn, NoTls).context("postgres connect failed")
    }
}

impl CandleStore for PostgresCandleStore {
    fn insert_candles(&self, rows: &[CandleRow]) -> Result<usize> {
        let mut client = self.connect()?;
        let mut tx = client.transaction().context("db transaction failed")?;
        let stmt = tx.prepare(
            "INSERT INTO candle (exchange_id, base, quote, asset, interval_secs, timestamp, \
             open, high, low, close, volume) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             ON CONFLICT (exchange_id, base, quote, asset, interval_secs, timestamp) DO UPDATE SET \
             open = EXCLUDED.open, high = EXCLUDED.high, low = EXCLUDED.low, \
             close = EXCLUDED.close, volume = EXCLUDED.volume",
        )?;

        let mut written = 0;
        for r in rows {
            written += tx
                .execute(
                    &stmt,
                    &[
                        &r.exchange_id,
                        &r.base,
                        &r.quote,
                        &r.asset,
                        &r.interval_secs,
                        &r.timestamp,
                        &r.open,
                        &r.high,
                        &r.low,
                        &r.close,
                        &r.volume,
                    ],
                )
                .context("insert candle failed")? as usize;
        }
        tx.commit().context("db commit failed")?;
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
        let mut client = self.connect()?;
        let rows = client.query(
            "SELECT timestamp, open, high, low, close, volume FROM candle \
             WHERE exchange_id = $1 AND base = $2 AND quote = $3 AND asset = $4 \
             AND interval_secs = $5 AND timestamp BETWEEN $6 AND $7 \
             ORDER BY timestamp ASC",
            &[
                &exchange_id,
                &base,
                &quote,
                &asset,
                &interval_secs,
                &start,
                &end,
            ],
        )?;

        let mut candles = Vec::with_capacity(rows.len());
        for row in &rows {
            candles.push(CandleRow {
                exchange_id: exchange_id.to_string(),
                base: base.to_string(),
                quote: quote.to_string(),
                asset: asset.to_string(),
                interval_secs,
                timestamp: row.try_get(0).context("bad candle timestamp")?,
                open: row.try_get(1)?,
                high: row.try_get(2)?,
                low: row.try_get(3)?,
                close: row.try_get(4)?,
                volume: row.try_get(5)?,
            });
        }
        Ok(candles)
    }

    fn resolve_exchange_id(&self, name: &str) -> Result<Option<String>> {
        let mut client = self.connect()?;
        let row = client.query_opt("SELECT id FROM exchange WHERE name = $1", &[&name])?;
        match row {
            Some(r) => Ok(Some(r.try_get(0)?)),
            None => Ok(None),
        }
    }
}
