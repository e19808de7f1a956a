use thiserror::Error;

use crate::kline::Interval;
use crate::model::pair::CurrencyPair;

#[derive(Error, Debug)]
pub enum KlineError {
    #[error("no trade data supplied")]
    EmptyInput,

    #[error("invalid trade at index {index} (id {trade_id:?}): {reason}")]
    Validation {
        index: usize,
        trade_id: String,
        reason: &'static str,
    },

    #[error("invalid interval {interval}: duration must be > 0")]
    InvalidInterval { interval: Interval },

    #[error("request limit must be > 0")]
    InvalidLimit,

    #[error("invalid date range: start {start} is not before end {end}")]
    InvalidRange {
        start: chrono::DateTime<chrono::Utc>,
        end: chrono::DateTime<chrono::Utc>,
    },

    #[error("exchange {0:?} not found in storage")]
    UnresolvedExchange(String),

    #[error("storage error: {0:#}")]
    Storage(anyhow::Error),

    #[error("csv format error on line {line}: {reason}")]
    Format { line: u64, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{exchange} {pair} {interval}: {source}")]
    Series {
        exchange: String,
        pair: CurrencyPair,
        interval: Interval,
        #[source]
        source: Box<KlineError>,
    },
}

impl KlineError {
    /// Innermost cause, skipping any `Series` context wrappers.
    pub fn root(&self) -> &KlineError {
        match self {
            KlineError::Series { source, .. } => source.root(),
            other => other,
        }
    }

    pub(crate) fn in_series(
        self,
        exchange: &str,
        pair: &CurrencyPair,
        interval: Interval,
    ) -> KlineError {
        KlineError::Series {
            exchange: exchange.to_string(),
            pair: pair.clone(),
            interval,
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, KlineError>;
