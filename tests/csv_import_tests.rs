use std::path::PathBuf;

use chrono::{DateTime, Duration};

use kline_core::csv_import::{load_from_csv, parse_csv};
use kline_core::KlineError;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join("binance_BTCUSDT_24h_2019_01_01_2019_01_08.csv")
}

#[test]
fn load_daily_export() {
    let candles = load_from_csv(fixture()).expect("fixture should parse");
    assert_eq!(candles.len(), 7);
    assert_eq!(
        candles[0].time,
        DateTime::from_timestamp(1_546_300_800, 0).unwrap()
    );
    assert!((candles[0].low - 3642.0).abs() < f64::EPSILON);
    assert!((candles[5].close - 3987.6).abs() < f64::EPSILON);
    assert!((candles[6].open - 3987.62).abs() < f64::EPSILON);
    let day = Duration::days(1);
    assert!(candles.windows(2).all(|w| w[1].time - w[0].time == day));
}

#[test]
fn missing_file_is_an_io_error() {
    let missing = fixture().with_file_name("does_not_exist.csv");
    let err = load_from_csv(missing).unwrap_err();
    assert!(matches!(err, KlineError::Io(_)));
}

#[test]
fn extra_column_is_a_format_error() {
    let data = "timestamp,open,high,low,close,volume\n1546300800,1,2,0.5,1.5,10,99\n";
    assert!(matches!(
        parse_csv(data.as_bytes()),
        Err(KlineError::Format { line: 2, .. })
    ));
}
