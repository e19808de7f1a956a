use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLCV summary of the trades inside a bucket. `time` is the bucket start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Accumulates trades of a single bucket into a candle.
#[derive(Debug, Clone)]
pub struct CandleBuilder {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub open_time: i64,
}

impl CandleBuilder {
    /// Start a new candle from the first trade of the bucket starting at `open_time` (ms).
    pub fn new(price: f64, amount: f64, open_time: i64) -> Self {
        Self {
            open: price,
            high: price,
            low: price,
            close: price,
            volume: amount,
            open_time,
        }
    }

    /// Fold a later trade of the same bucket into the candle.
    pub fn update(&mut self, price: f64, amount: f64) {
        self.high = self.high.max(price);
        self.low = self.low.min(price);
        self.close = price;
        self.volume += amount;
    }

    /// Finalize into an immutable Candle.
    pub fn finish(&self) -> Candle {
        Candle {
            time: DateTime::from_timestamp_millis(self.open_time).unwrap_or_default(),
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
        }
    }
}
