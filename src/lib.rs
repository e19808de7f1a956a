//! Trade-to-candle aggregation for exchange adapters.
//!
//! Raw trades are validated and bucketed into [`kline::Item`]s, request windows for
//! paginated history fetches come from [`kline::calc_date_ranges`], and candle series
//! round-trip through a [`storage::CandleStore`].

pub mod config;
pub mod csv_import;
pub mod error;
pub mod kline;
pub mod logging;
pub mod model;
pub mod storage;

pub use error::{KlineError, Result};
