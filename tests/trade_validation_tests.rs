use chrono::{DateTime, Duration, Utc};

use kline_core::kline::{validate_trades, validated_copy};
use kline_core::model::TradeHistory;
use kline_core::KlineError;

fn base_time() -> DateTime<Utc> {
    DateTime::from_timestamp(1_600_000_000, 0).unwrap()
}

#[test]
/// Empty batches are rejected before anything else is checked.
fn empty_batch_is_rejected() {
    let mut empty: Vec<TradeHistory> = Vec::new();
    assert!(matches!(
        validate_trades(&mut empty),
        Err(KlineError::EmptyInput)
    ));
    assert!(matches!(validated_copy(&[]), Err(KlineError::EmptyInput)));
}

#[test]
fn zero_amount_price_or_timestamp_is_rejected() {
    let tn = base_time();

    let mut missing_amount = vec![
        TradeHistory::new(tn + Duration::minutes(2), "2", 0.0, 0.0),
        TradeHistory::new(tn + Duration::minutes(1), "1", 0.0, 0.0),
    ];
    match validate_trades(&mut missing_amount) {
        Err(KlineError::Validation {
            index,
            trade_id,
            ..
        }) => {
            assert_eq!(index, 0);
            assert_eq!(trade_id, "2");
        }
        other => panic!("unexpected result: {other:?}"),
    }

    let mut zero_price = vec![
        TradeHistory::new(tn, "1", 1.0, 100.0),
        TradeHistory::new(tn + Duration::minutes(2), "2", 1.0, 0.0),
    ];
    match validate_trades(&mut zero_price) {
        Err(KlineError::Validation { index, reason, .. }) => {
            assert_eq!(index, 1);
            assert_eq!(reason, "price is zero");
        }
        other => panic!("unexpected result: {other:?}"),
    }

    let mut no_timestamp = vec![TradeHistory {
        trade_id: "2".to_string(),
        amount: 1.0,
        price: 10.0,
        ..Default::default()
    }];
    match validate_trades(&mut no_timestamp) {
        Err(KlineError::Validation { reason, .. }) => assert_eq!(reason, "timestamp not set"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn non_finite_amount_or_price_is_rejected() {
    let tn = base_time();

    let mut nan_price = vec![
        TradeHistory::new(tn, "1", 1.0, f64::NAN),
        TradeHistory::new(tn + Duration::seconds(1), "2", 1.0, 100.0),
    ];
    match validate_trades(&mut nan_price) {
        Err(KlineError::Validation { index, reason, .. }) => {
            assert_eq!(index, 0);
            assert_eq!(reason, "price is not finite");
        }
        other => panic!("unexpected result: {other:?}"),
    }

    let mut infinite_amount = vec![
        TradeHistory::new(tn, "1", 1.0, 100.0),
        TradeHistory::new(tn + Duration::seconds(1), "2", f64::INFINITY, 100.0),
    ];
    match validate_trades(&mut infinite_amount) {
        Err(KlineError::Validation { index, reason, .. }) => {
            assert_eq!(index, 1);
            assert_eq!(reason, "amount is not finite");
        }
        other => panic!("unexpected result: {other:?}"),
    }

    let negative_infinite_price = [TradeHistory::new(tn, "1", 1.0, f64::NEG_INFINITY)];
    assert!(matches!(
        validated_copy(&negative_infinite_price),
        Err(KlineError::Validation { .. })
    ));
}

#[test]
/// Only the exact epoch counts as a missing timestamp.
fn timestamp_just_after_epoch_is_set() {
    let just_after = DateTime::from_timestamp(0, 1_000).unwrap();
    let mut trades = vec![TradeHistory::new(just_after, "1", 1.0, 1.0)];
    assert!(trades[0].has_timestamp());
    assert!(!TradeHistory::default().has_timestamp());
    validate_trades(&mut trades).expect("timestamp past the epoch is valid");
}

#[test]
/// A valid batch comes back sorted ascending in the caller's own storage.
fn valid_batch_is_sorted_in_place() {
    let tn = base_time();
    let mut trades = vec![
        TradeHistory::new(tn + Duration::minutes(2), "2", 1.0, 1000.0),
        TradeHistory::new(tn + Duration::minutes(1), "1", 1.0, 1001.0),
        TradeHistory::new(tn + Duration::minutes(3), "3", 1.0, 1001.5),
    ];
    validate_trades(&mut trades).expect("valid trades");

    let ids: Vec<&str> = trades.iter().map(|t| t.trade_id.as_str()).collect();
    assert_eq!(ids, ["1", "2", "3"]);
    assert!(trades.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
}

#[test]
fn equal_timestamps_keep_arrival_order() {
    let tn = base_time();
    let mut trades = vec![
        TradeHistory::new(tn + Duration::seconds(5), "c", 1.0, 1.0),
        TradeHistory::new(tn, "a", 1.0, 1.0),
        TradeHistory::new(tn + Duration::seconds(5), "d", 1.0, 1.0),
        TradeHistory::new(tn, "b", 1.0, 1.0),
    ];
    validate_trades(&mut trades).unwrap();
    let ids: Vec<&str> = trades.iter().map(|t| t.trade_id.as_str()).collect();
    assert_eq!(ids, ["a", "b", "c", "d"]);
}

#[test]
/// The copying variant sorts its own buffer and leaves the shared input alone.
fn validated_copy_leaves_input_untouched() {
    let tn = base_time();
    let shared = vec![
        TradeHistory::new(tn + Duration::minutes(1), "2", 1.0, 5.0),
        TradeHistory::new(tn, "1", 1.0, 5.0),
    ];
    let sorted = validated_copy(&shared).unwrap();
    assert_eq!(sorted[0].trade_id, "1");
    assert_eq!(shared[0].trade_id, "2");
}
