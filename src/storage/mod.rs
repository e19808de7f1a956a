//! Candle persistence behind a storage collaborator.
//!
//! [`CandleStore`] is the boundary to the database; [`store_in_database`] and
//! [`load_from_database`] translate between [`Item`]s and the collaborator's rows.

pub mod postgres;
pub mod sqlite;

use chrono::{DateTime, Utc};

use crate::error::{KlineError, Result};
use crate::kline::{Interval, Item};
use crate::model::{Asset, Candle, CurrencyPair};

pub use self::postgres::PostgresCandleStore;
pub use self::sqlite::SqliteCandleStore;

/// One persisted candle. Unique on
/// `(exchange_id, base, quote, asset, interval_secs, timestamp)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CandleRow {
    pub exchange_id: String,
    pub base: String,
    pub quote: String,
    pub asset: String,
    pub interval_secs: i64,
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Storage collaborator. Each call is an independent unit of work; implementations
/// commit or roll back their own transaction before returning.
pub trait CandleStore {
    /// Upsert all rows in one transaction and return how many were written.
    fn insert_candles(&self, rows: &[CandleRow]) -> anyhow::Result<usize>;

    /// Rows inside `[start, end]`, oldest first.
    #[allow(clippy::too_many_arguments)]
    fn query_candles(
        &self,
        exchange_id: &str,
        base: &str,
        quote: &str,
        asset: &str,
        interval_secs: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> anyhow::Result<Vec<CandleRow>>;

    /// Stored id for an exchange name, `None` when it is not registered.
    fn resolve_exchange_id(&self, name: &str) -> anyhow::Result<Option<String>>;
}

impl<S: CandleStore + ?Sized> CandleStore for Box<S> {
    fn insert_candles(&self, rows: &[CandleRow]) -> anyhow::Result<usize> {
        (**self).insert_candles(rows)
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
    ) -> anyhow::Result<Vec<CandleRow>> {
        (**self).query_candles(exchange_id, base, quote, asset, interval_secs, start, end)
    }

    fn resolve_exchange_id(&self, name: &str) -> anyhow::Result<Option<String>> {
        (**self).resolve_exchange_id(name)
    }
}

fn resolve_exchange<S: CandleStore + ?Sized>(store: &S, name: &str) -> Result<String> {
    store
        .resolve_exchange_id(name)
        .map_err(KlineError::Storage)?
        .ok_or_else(|| KlineError::UnresolvedExchange(name.to_string()))
}

/// Write every candle of `item` with a single batched upsert.
pub fn store_in_database<S: CandleStore + ?Sized>(store: &S, item: &Item) -> Result<usize> {
    let exchange_id = resolve_exchange(store, &item.exchange)?;
    if item.candles.is_empty() {
        return Ok(0);
    }

    let rows: Vec<CandleRow> = item
        .candles
        .iter()
        .map(|c| CandleRow {
            exchange_id: exchange_id.clone(),
            base: item.pair.base.clone(),
            quote: item.pair.quote.clone(),
            asset: item.asset.as_str().to_string(),
            interval_secs: item.interval.as_secs(),
            timestamp: c.time,
            open: c.open,
            high: c.high,
            low: c.low,
            close: c.close,
            volume: c.volume,
        })
        .collect();

    let written = store.insert_candles(&rows).map_err(KlineError::Storage)?;
    tracing::info!(
        exchange = %item.exchange,
        pair = %item.pair,
        interval = %item.interval,
        rows = written,
        "Stored klines"
    );
    Ok(written)
}

/// Load the candles stored for a series within `[start, end]`, ascending.
/// An empty result is not an error; an unknown exchange is.
pub fn load_from_database<S: CandleStore + ?Sized>(
    store: &S,
    exchange: &str,
    pair: &CurrencyPair,
    asset: Asset,
    interval: Interval,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Item> {
    let exchange_id = resolve_exchange(store, exchange)?;
    let rows = store
        .query_candles(
            &exchange_id,
            &pair.base,
            &pair.quote,
            asset.as_str(),
            interval.as_secs(),
            start,
            end,
        )
        .map_err(KlineError::Storage)?;

    let mut item = Item::new(exchange, pair.clone(), asset, interval);
    item.append_candles(rows.into_iter().map(|r| Candle {
        time: r.timestamp,
        open: r.open,
        high: r.high,
        low: r.low,
        close: r.close,
        volume: r.volume,
    }));
    item.sort_candles_by_timestamp(false);

    if item.candles.is_empty() {
        tracing::warn!(exchange, pair = %pair, interval = %interval, "No stored klines in range");
    } else {
        tracing::debug!(exchange, pair = %pair, rows = item.candles.len(), "Loaded klines");
    }
    Ok(item)
}
