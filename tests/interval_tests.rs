use kline_core::kline::Interval;

const TABLE: [(Interval, &str, &str); 20] = [
    (Interval::FIFTEEN_SECOND, "fifteensecond", "15s"),
    (Interval::ONE_MIN, "onemin", "1m"),
    (Interval::THREE_MIN, "threemin", "3m"),
    (Interval::FIVE_MIN, "fivemin", "5m"),
    (Interval::TEN_MIN, "tenmin", "10m"),
    (Interval::FIFTEEN_MIN, "fifteenmin", "15m"),
    (Interval::THIRTY_MIN, "thirtymin", "30m"),
    (Interval::ONE_HOUR, "onehour", "1h"),
    (Interval::TWO_HOUR, "twohour", "2h"),
    (Interval::FOUR_HOUR, "fourhour", "4h"),
    (Interval::SIX_HOUR, "sixhour", "6h"),
    (Interval::EIGHT_HOUR, "eighthour", "8h"),
    (Interval::TWELVE_HOUR, "twelvehour", "12h"),
    (Interval::ONE_DAY, "oneday", "24h"),
    (Interval::THREE_DAY, "threeday", "72h"),
    (Interval::FIFTEEN_DAY, "fifteenday", "360h"),
    (Interval::ONE_WEEK, "oneweek", "168h"),
    (Interval::TWO_WEEK, "twoweek", "336h"),
    (Interval::ONE_MONTH, "onemonth", "720h"),
    (Interval::ONE_YEAR, "oneyear", "8760h"),
];

#[test]
fn canonical_words_and_short_forms() {
    for (interval, word, short) in TABLE {
        assert_eq!(interval.word(), word, "word for {short}");
        assert_eq!(interval.short(), short, "short for {word}");
        assert_eq!(interval.to_string(), short);
    }
}

#[test]
fn eight_hours_built_from_hours_matches_table() {
    let eight = Interval::from_secs(8 * 3600);
    assert_eq!(eight, Interval::EIGHT_HOUR);
    assert_eq!(eight.word(), "eighthour");
}

#[test]
fn canonical_iterator_matches_table_order() {
    let listed: Vec<Interval> = Interval::canonical().collect();
    let expected: Vec<Interval> = TABLE.iter().map(|(i, _, _)| *i).collect();
    assert_eq!(listed, expected);
}

#[test]
/// Month and year are fixed-length buckets.
fn month_and_year_durations_are_fixed() {
    assert_eq!(Interval::ONE_MONTH.duration(), chrono::Duration::days(30));
    assert_eq!(Interval::ONE_YEAR.duration(), chrono::Duration::days(365));
}

#[test]
fn unrecognized_interval_uses_raw_duration() {
    let odd = Interval::from_secs(1337 * 3600);
    assert_eq!(odd.word(), "1337h0m0s");
    assert!(odd.is_valid());
}

#[test]
fn every_word_and_short_form_parses_back() {
    for (interval, word, short) in TABLE {
        assert_eq!(word.parse::<Interval>().unwrap(), interval);
        assert_eq!(short.parse::<Interval>().unwrap(), interval);
    }
}

#[test]
fn serde_uses_short_form() {
    let json = serde_json::to_string(&Interval::ONE_DAY).unwrap();
    assert_eq!(json, "\"24h\"");
    let back: Interval = serde_json::from_str("\"1w\"").unwrap();
    assert_eq!(back, Interval::ONE_WEEK);
    assert!(serde_json::from_str::<Interval>("\"fortnightly\"").is_err());
}
