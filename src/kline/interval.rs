use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

const SECOND_MS: i64 = 1_000;
const MINUTE_MS: i64 = 60 * SECOND_MS;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Width of one candle bucket, held as whole milliseconds.
///
/// `ONE_MONTH` and `ONE_YEAR` are fixed 30-day and 365-day buckets. They are not
/// calendar aware: leap days and real month lengths are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Interval(i64);

impl Interval {
    pub const FIFTEEN_SECOND: Interval = Interval(15 * SECOND_MS);
    pub const ONE_MIN: Interval = Interval(MINUTE_MS);
    pub const THREE_MIN: Interval = Interval(3 * MINUTE_MS);
    pub const FIVE_MIN: Interval = Interval(5 * MINUTE_MS);
    pub const TEN_MIN: Interval = Interval(10 * MINUTE_MS);
    pub const FIFTEEN_MIN: Interval = Interval(15 * MINUTE_MS);
    pub const THIRTY_MIN: Interval = Interval(30 * MINUTE_MS);
    pub const ONE_HOUR: Interval = Interval(HOUR_MS);
    pub const TWO_HOUR: Interval = Interval(2 * HOUR_MS);
    pub const FOUR_HOUR: Interval = Interval(4 * HOUR_MS);
    pub const SIX_HOUR: Interval = Interval(6 * HOUR_MS);
    pub const EIGHT_HOUR: Interval = Interval(8 * HOUR_MS);
    pub const TWELVE_HOUR: Interval = Interval(12 * HOUR_MS);
    pub const ONE_DAY: Interval = Interval(DAY_MS);
    pub const THREE_DAY: Interval = Interval(3 * DAY_MS);
    pub const FIFTEEN_DAY: Interval = Interval(15 * DAY_MS);
    pub const ONE_WEEK: Interval = Interval(7 * DAY_MS);
    pub const TWO_WEEK: Interval = Interval(14 * DAY_MS);
    pub const ONE_MONTH: Interval = Interval(30 * DAY_MS);
    pub const ONE_YEAR: Interval = Interval(365 * DAY_MS);

    pub const fn from_millis(ms: i64) -> Self {
        Interval(ms)
    }

    pub const fn from_secs(secs: i64) -> Self {
        Interval(secs * SECOND_MS)
    }

    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    /// Whole seconds, the unit intervals are persisted in.
    pub const fn as_secs(&self) -> i64 {
        self.0 / SECOND_MS
    }

    pub const fn is_valid(&self) -> bool {
        self.0 > 0
    }

    pub fn duration(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.0)
    }

    /// Canonical lower-case name, e.g. `oneday`. Intervals outside the canonical
    /// set return their full duration rendering instead.
    pub fn word(&self) -> String {
        CANONICAL
            .iter()
            .find(|(interval, _)| interval == self)
            .map(|(_, word)| (*word).to_string())
            .unwrap_or_else(|| format_duration(self.0))
    }

    /// Compact form with trailing zero units dropped, e.g. `24h`, `1m`, `15s`.
    pub fn short(&self) -> String {
        let mut s = format_duration(self.0);
        if s.ends_with("m0s") {
            s.truncate(s.len() - 2);
        }
        if s.ends_with("h0m") {
            s.truncate(s.len() - 2);
        }
        s
    }

    /// All canonical intervals, shortest first.
    pub fn canonical() -> impl Iterator<Item = Interval> {
        CANONICAL.iter().map(|(interval, _)| *interval)
    }
}

/// Ordered `(interval, word)` table. Lookups compare exact durations.
static CANONICAL: [(Interval, &str); 20] = [
    (Interval::FIFTEEN_SECOND, "fifteensecond"),
    (Interval::ONE_MIN, "onemin"),
    (Interval::THREE_MIN, "threemin"),
    (Interval::FIVE_MIN, "fivemin"),
    (Interval::TEN_MIN, "tenmin"),
    (Interval::FIFTEEN_MIN, "fifteenmin"),
    (Interval::THIRTY_MIN, "thirtymin"),
    (Interval::ONE_HOUR, "onehour"),
    (Interval::TWO_HOUR, "twohour"),
    (Interval::FOUR_HOUR, "fourhour"),
    (Interval::SIX_HOUR, "sixhour"),
    (Interval::EIGHT_HOUR, "eighthour"),
    (Interval::TWELVE_HOUR, "twelvehour"),
    (Interval::ONE_DAY, "oneday"),
    (Interval::THREE_DAY, "threeday"),
    (Interval::FIFTEEN_DAY, "fifteenday"),
    (Interval::ONE_WEEK, "oneweek"),
    (Interval::TWO_WEEK, "twoweek"),
    (Interval::ONE_MONTH, "onemonth"),
    (Interval::ONE_YEAR, "oneyear"),
];

/// Renders a millisecond count as `72h3m0.5s`, `1m0s`, `250ms` or `0s`.
fn format_duration(ms: i64) -> String {
    if ms == 0 {
        return "0s".to_string();
    }
    let sign = if ms < 0 { "-" } else { "" };
    let abs = ms.unsigned_abs();
    if abs < SECOND_MS as u64 {
        return format!("{sign}{abs}ms");
    }

    let hours = abs / HOUR_MS as u64;
    let minutes = (abs % HOUR_MS as u64) / MINUTE_MS as u64;
    let secs = (abs % MINUTE_MS as u64) / SECOND_MS as u64;
    let frac = abs % SECOND_MS as u64;

    let mut secs_str = secs.to_string();
    if frac > 0 {
        let digits = format!("{frac:03}");
        secs_str.push('.');
        secs_str.push_str(digits.trim_end_matches('0'));
    }

    if hours > 0 {
        format!("{sign}{hours}h{minutes}m{secs_str}s")
    } else if minutes > 0 {
        format!("{sign}{minutes}m{secs_str}s")
    } else {
        format!("{sign}{secs_str}s")
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntervalParseError {
    #[error("invalid interval '{0}': expected format like '1m'")]
    Format(String),
    #[error("invalid interval '{0}': quantity must be a positive integer")]
    Quantity(String),
    #[error("invalid interval '{0}': unsupported suffix '{1}', expected one of s/m/h/d/w/M")]
    Suffix(String, String),
    #[error("invalid interval '{0}': value is too large")]
    Overflow(String),
}

/// Parse an exchange interval code (e.g. "15s", "1m", "4h", "1d", "1w", "1M").
/// `M` is a 30-day month, matching `Interval::ONE_MONTH`.
pub fn parse_interval(s: &str) -> Result<Interval, IntervalParseError> {
    let s = s.trim();
    if s.len() < 2 || !s.is_char_boundary(s.len() - 1) {
        return Err(IntervalParseError::Format(s.to_string()));
    }

    let (num_str, suffix) = s.split_at(s.len() - 1);
    let n: i64 = num_str
        .parse()
        .map_err(|_| IntervalParseError::Quantity(s.to_string()))?;
    if n <= 0 {
        return Err(IntervalParseError::Quantity(s.to_string()));
    }

    let unit_ms = match suffix {
        "s" => SECOND_MS,
        "m" => MINUTE_MS,
        "h" => HOUR_MS,
        "d" => DAY_MS,
        "w" => 7 * DAY_MS,
        "M" => 30 * DAY_MS,
        _ => {
            return Err(IntervalParseError::Suffix(
                s.to_string(),
                suffix.to_string(),
            ))
        }
    };

    n.checked_mul(unit_ms)
        .map(Interval)
        .ok_or_else(|| IntervalParseError::Overflow(s.to_string()))
}

impl FromStr for Interval {
    type Err = IntervalParseError;

    /// Accepts the canonical word (`oneday`), the short form (`24h`, `720h`) and
    /// exchange codes (`1d`, `1M`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let lower = trimmed.to_ascii_lowercase();
        if let Some((interval, _)) = CANONICAL.iter().find(|(_, word)| *word == lower) {
            return Ok(*interval);
        }
        if let Some(interval) = Interval::canonical().find(|i| i.short() == trimmed) {
            return Ok(interval);
        }
        parse_interval(trimmed)
    }
}

impl Serialize for Interval {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.short())
    }
}

impl<'de> Deserialize<'de> for Interval {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
