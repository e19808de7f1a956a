pub mod aggregate;
pub mod interval;
pub mod item;
pub mod range;
pub mod validate;

pub use aggregate::create_kline;
pub use interval::{parse_interval, Interval, IntervalParseError};
pub use item::Item;
pub use range::{calc_date_ranges, total_candles_per_interval, DateRange};
pub use validate::{validate_trades, validated_copy};
