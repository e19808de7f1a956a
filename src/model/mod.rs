pub mod candle;
pub mod pair;
pub mod trade;

pub use candle::{Candle, CandleBuilder};
pub use pair::{Asset, CurrencyPair};
pub use trade::TradeHistory;
