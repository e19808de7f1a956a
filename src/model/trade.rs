use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single executed trade as reported by an exchange adapter.
///
/// A default `timestamp` (the Unix epoch) counts as "not set".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeHistory {
    pub timestamp: DateTime<Utc>,
    pub trade_id: String,
    pub amount: f64,
    pub price: f64,
}

impl TradeHistory {
    pub fn new(
        timestamp: DateTime<Utc>,
        trade_id: impl Into<String>,
        amount: f64,
        price: f64,
    ) -> Self {
        Self {
            timestamp,
            trade_id: trade_id.into(),
            amount,
            price,
        }
    }

    pub fn has_timestamp(&self) -> bool {
        self.timestamp != DateTime::<Utc>::default()
    }
}
