use crate::error::{KlineError, Result};
use crate::model::TradeHistory;

/// Check a trade batch and sort it ascending by timestamp, in place.
///
/// Every trade needs a timestamp past the epoch and a finite, non-zero amount and price.
///
/// The batch is borrowed mutably for the whole call and comes back reordered; no copy
/// is made. Callers that share the source batch should use [`validated_copy`].
/// Trades with equal timestamps keep their original relative order.
pub fn validate_trades(trades: &mut [TradeHistory]) -> Result<()> {
    if trades.is_empty() {
        return Err(KlineError::EmptyInput);
    }

    for (index, trade) in trades.iter().enumerate() {
        let reason = if !trade.has_timestamp() {
            "timestamp not set"
        } else if trade.amount == 0.0 {
            "amount is zero"
        } else if !trade.amount.is_finite() {
            "amount is not finite"
        } else if trade.price == 0.0 {
            "price is zero"
        } else if !trade.price.is_finite() {
            "price is not finite"
        } else {
            continue;
        };
        return Err(KlineError::Validation {
            index,
            trade_id: trade.trade_id.clone(),
            reason,
        });
    }

    trades.sort_by_key(|t| t.timestamp);
    Ok(())
}

/// Copying variant of [`validate_trades`]; the input is left untouched.
pub fn validated_copy(trades: &[TradeHistory]) -> Result<Vec<TradeHistory>> {
    let mut owned = trades.to_vec();
    validate_trades(&mut owned)?;
    Ok(owned)
}
