use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Quote currencies recognised when splitting a concatenated symbol such as `BTCUSDT`.
/// Longer codes first so `USDT` wins over `USD`.
const KNOWN_QUOTES: &[&str] = &[
    "USDT", "USDC", "BUSD", "TUSD", "FDUSD", "USD", "EUR", "GBP", "AUD", "JPY", "KRW", "BTC",
    "ETH", "BNB",
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PairParseError {
    #[error("empty currency pair")]
    Empty,
    #[error("cannot split currency pair '{0}' into base and quote")]
    Unsplittable(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown asset type '{0}'")]
pub struct AssetParseError(pub String);

/// Base/quote symbol pair. Both symbols are stored upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    pub base: String,
    pub quote: String,
}

impl CurrencyPair {
    pub fn new(base: impl AsRef<str>, quote: impl AsRef<str>) -> Self {
        Self {
            base: base.as_ref().trim().to_ascii_uppercase(),
            quote: quote.as_ref().trim().to_ascii_uppercase(),
        }
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.base, self.quote)
    }
}

impl FromStr for CurrencyPair {
    type Err = PairParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PairParseError::Empty);
        }
        if let Some((base, quote)) = s.split_once(['-', '/', '_']) {
            if base.is_empty() || quote.is_empty() {
                return Err(PairParseError::Unsplittable(s.to_string()));
            }
            return Ok(Self::new(base, quote));
        }

        let upper = s.to_ascii_uppercase();
        KNOWN_QUOTES
            .iter()
            .find(|quote| upper.len() > quote.len() && upper.ends_with(*quote))
            .map(|quote| Self::new(&upper[..upper.len() - quote.len()], quote))
            .ok_or_else(|| PairParseError::Unsplittable(s.to_string()))
    }
}

/// Asset class a kline series belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Asset {
    Spot,
    Margin,
    Futures,
    PerpetualSwap,
    Options,
}

impl Asset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Asset::Spot => "spot",
            Asset::Margin => "margin",
            Asset::Futures => "futures",
            Asset::PerpetualSwap => "perpetualswap",
            Asset::Options => "options",
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Asset {
    type Err = AssetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spot" => Ok(Asset::Spot),
            "margin" => Ok(Asset::Margin),
            "futures" => Ok(Asset::Futures),
            "perpetualswap" => Ok(Asset::PerpetualSwap),
            "options" => Ok(Asset::Options),
            other => Err(AssetParseError(other.to_string())),
        }
    }
}
