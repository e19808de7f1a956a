use crate::error::{KlineError, Result};
use crate::kline::{validate_trades, Interval, Item};
use crate::model::{Asset, CandleBuilder, CurrencyPair, TradeHistory};

/// Bucket a trade batch into OHLCV candles of width `interval`.
///
/// The batch is validated and sorted in place first (see [`validate_trades`]).
/// Buckets without trades produce no candle.
pub fn create_kline(
    trades: &mut [TradeHistory],
    interval: Interval,
    pair: CurrencyPair,
    asset: Asset,
    exchange: &str,
) -> Result<Item> {
    if !interval.is_valid() {
        return Err(KlineError::InvalidInterval { interval }.in_series(exchange, &pair, interval));
    }
    validate_trades(trades).map_err(|e| e.in_series(exchange, &pair, interval))?;

    let width = interval.as_millis();
    let mut candles = Vec::new();
    let mut current: Option<CandleBuilder> = None;

    for trade in trades.iter() {
        let bucket = trade.timestamp.timestamp_millis().div_euclid(width) * width;
        match current.as_mut() {
            Some(builder) if builder.open_time == bucket => {
                builder.update(trade.price, trade.amount);
            }
            _ => {
                if let Some(done) = current.take() {
                    candles.push(done.finish());
                }
                current = Some(CandleBuilder::new(trade.price, trade.amount, bucket));
            }
        }
    }
    if let Some(done) = current {
        candles.push(done.finish());
    }

    tracing::debug!(
        exchange,
        pair = %pair,
        interval = %interval,
        trades = trades.len(),
        candles = candles.len(),
        "Built klines from trades"
    );

    Ok(Item {
        exchange: exchange.to_string(),
        pair,
        asset,
        interval,
        candles,
    })
}
