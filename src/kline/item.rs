use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{KlineError, Result};
use crate::kline::Interval;
use crate::model::{Asset, Candle, CandleBuilder, CurrencyPair};

/// A candle series for one exchange, pair, asset class and interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub exchange: String,
    pub pair: CurrencyPair,
    pub asset: Asset,
    pub interval: Interval,
    pub candles: Vec<Candle>,
}

impl Item {
    pub fn new(
        exchange: impl Into<String>,
        pair: CurrencyPair,
        asset: Asset,
        interval: Interval,
    ) -> Self {
        Self {
            exchange: exchange.into(),
            pair,
            asset,
            interval,
            candles: Vec::new(),
        }
    }

    /// Stable in-place sort by candle time, ascending unless `descending`.
    pub fn sort_candles_by_timestamp(&mut self, descending: bool) {
        if descending {
            self.candles.sort_by(|a, b| b.time.cmp(&a.time));
        } else {
            self.candles.sort_by(|a, b| a.time.cmp(&b.time));
        }
    }

    /// Concatenate candles, e.g. from consecutive request windows. Duplicates are kept
    /// and ordering is left to the caller.
    pub fn append_candles(&mut self, candles: impl IntoIterator<Item = Candle>) {
        self.candles.extend(candles);
    }

    /// Earliest and latest candle time, or `None` when empty.
    pub fn time_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let first = self.candles.iter().map(|c| c.time).min()?;
        let last = self.candles.iter().map(|c| c.time).max()?;
        Some((first, last))
    }

    /// Resample into a coarser interval. `interval` must be a positive whole multiple
    /// of the current one. Candles are expected in ascending order.
    pub fn convert_to_interval(&self, interval: Interval) -> Result<Item> {
        let current = self.interval.as_millis();
        let target = interval.as_millis();
        if !self.interval.is_valid() || target < current || target % current != 0 {
            return Err(KlineError::InvalidInterval { interval }.in_series(
                &self.exchange,
                &self.pair,
                self.interval,
            ));
        }

        let mut candles = Vec::new();
        let mut current_bucket: Option<CandleBuilder> = None;
        for candle in &self.candles {
            let bucket = candle.time.timestamp_millis().div_euclid(target) * target;
            match current_bucket.as_mut() {
                Some(builder) if builder.open_time == bucket => {
                    builder.high = builder.high.max(candle.high);
                    builder.low = builder.low.min(candle.low);
                    builder.close = candle.close;
                    builder.volume += candle.volume;
                }
                _ => {
                    if let Some(done) = current_bucket.take() {
                        candles.push(done.finish());
                    }
                    let mut builder = CandleBuilder::new(candle.open, candle.volume, bucket);
                    builder.high = candle.high;
                    builder.low = candle.low;
                    builder.close = candle.close;
                    current_bucket = Some(builder);
                }
            }
        }
        if let Some(done) = current_bucket {
            candles.push(done.finish());
        }

        Ok(Item {
            exchange: self.exchange.clone(),
            pair: self.pair.clone(),
            asset: self.asset,
            interval,
            candles,
        })
    }
}
