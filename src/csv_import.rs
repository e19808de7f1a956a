use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::DateTime;
use csv::{ReaderBuilder, StringRecord};

use crate::error::{KlineError, Result};
use crate::model::Candle;

const COLUMNS: usize = 6;

/// Load pre-aggregated candles from a `unix_timestamp,open,high,low,close,volume` export.
/// The first row is a header and is skipped. Rows are returned in file order.
pub fn load_from_csv(path: impl AsRef<Path>) -> Result<Vec<Candle>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let candles = parse_csv(file)?;
    tracing::debug!(path = %path.display(), rows = candles.len(), "Loaded candles from csv");
    Ok(candles)
}

pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<Candle>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut candles = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|err| KlineError::Format {
            line: err.position().map(|p| p.line()).unwrap_or(0),
            reason: err.to_string(),
        })?;
        candles.push(parse_record(&record)?);
    }
    Ok(candles)
}

fn parse_record(record: &StringRecord) -> Result<Candle> {
    let line = record.position().map(|p| p.line()).unwrap_or(0);
    if record.len() != COLUMNS {
        return Err(KlineError::Format {
            line,
            reason: format!("expected {COLUMNS} columns, found {}", record.len()),
        });
    }

    let field = |idx: usize, name: &str| -> Result<f64> {
        record[idx].parse::<f64>().map_err(|_| KlineError::Format {
            line,
            reason: format!("{name} '{}' is not a number", &record[idx]),
        })
    };

    let secs: i64 = record[0].parse().map_err(|_| KlineError::Format {
        line,
        reason: format!("timestamp '{}' is not a unix timestamp", &record[0]),
    })?;
    let time = DateTime::from_timestamp(secs, 0).ok_or_else(|| KlineError::Format {
        line,
        reason: format!("timestamp {secs} out of range"),
    })?;

    Ok(Candle {
        time,
        open: field(1, "open")?,
        high: field(2, "high")?,
        low: field(3, "low")?,
        close: field(4, "close")?,
        volume: field(5, "volume")?,
    })
}
