use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{KlineError, Result};
use crate::kline::Interval;

/// One request window of a paginated historical fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn candle_count(&self, interval: Interval) -> u64 {
        total_candles_per_interval(self.start, self.end, interval)
    }

    /// Half-open membership test, `[start, end)`.
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        t >= self.start && t < self.end
    }
}

/// Number of candles needed to cover `[start, end)`, rounded up.
///
/// Returns 0 when `end <= start` or the interval is not positive. Computed in integer
/// milliseconds so year-long spans stay exact.
pub fn total_candles_per_interval(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    interval: Interval,
) -> u64 {
    let span = end.timestamp_millis() - start.timestamp_millis();
    let width = interval.as_millis();
    if span <= 0 || width <= 0 {
        return 0;
    }
    (span as u64).div_ceil(width as u64)
}

/// Split `[start, end]` into consecutive windows holding at most `limit` candles each.
///
/// Windows are contiguous: each starts where the previous one ended, and the last one
/// ends exactly at `end`.
pub fn calc_date_ranges(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    interval: Interval,
    limit: u32,
) -> Result<Vec<DateRange>> {
    if !interval.is_valid() {
        return Err(KlineError::InvalidInterval { interval });
    }
    if limit == 0 {
        return Err(KlineError::InvalidLimit);
    }
    if end <= start {
        return Err(KlineError::InvalidRange { start, end });
    }

    let total = total_candles_per_interval(start, end, interval);
    if total <= u64::from(limit) {
        return Ok(vec![DateRange::new(start, end)]);
    }

    let step = Duration::milliseconds(interval.as_millis().saturating_mul(i64::from(limit)));
    let mut ranges = Vec::with_capacity(total.div_ceil(u64::from(limit)) as usize);
    let mut window_start = start;
    while window_start < end {
        let window_end = window_start
            .checked_add_signed(step)
            .filter(|t| *t < end)
            .unwrap_or(end);
        ranges.push(DateRange::new(window_start, window_end));
        window_start = window_end;
    }

    tracing::debug!(
        interval = %interval,
        limit,
        total,
        windows = ranges.len(),
        "Calculated request windows"
    );
    Ok(ranges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_candle_rounds_up() {
        let start = DateTime::from_timestamp(0, 0).unwrap();
        let end = DateTime::from_timestamp(61, 0).unwrap();
        assert_eq!(total_candles_per_interval(start, end, Interval::ONE_MIN), 2);
        assert_eq!(total_candles_per_interval(end, start, Interval::ONE_MIN), 0);
        assert_eq!(
            total_candles_per_interval(start, start, Interval::ONE_MIN),
            0
        );
        assert_eq!(
            total_candles_per_interval(start, end, Interval::from_millis(0)),
            0
        );
    }

    #[test]
    fn date_range_helpers() {
        let start = DateTime::from_timestamp(0, 0).unwrap();
        let end = DateTime::from_timestamp(3_600, 0).unwrap();
        let range = DateRange::new(start, end);
        assert_eq!(range.duration(), Duration::hours(1));
        assert_eq!(range.candle_count(Interval::FIFTEEN_MIN), 4);
        assert!(range.contains(start));
        assert!(!range.contains(end));
    }

    #[test]
    fn rejects_bad_arguments() {
        let start = DateTime::from_timestamp(0, 0).unwrap();
        let end = DateTime::from_timestamp(3_600, 0).unwrap();
        assert!(matches!(
            calc_date_ranges(start, end, Interval::from_millis(-1), 10),
            Err(KlineError::InvalidInterval { .. })
        ));
        assert!(matches!(
            calc_date_ranges(start, end, Interval::ONE_MIN, 0),
            Err(KlineError::InvalidLimit)
        ));
        assert!(matches!(
            calc_date_ranges(end, start, Interval::ONE_MIN, 10),
            Err(KlineError::InvalidRange { .. })
        ));
    }
}
