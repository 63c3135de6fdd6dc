// File: crates/chart-core/tests/normalize_feed.rs
// Purpose: Normalize a recorded index feed and check row dropping, volumes, dividends and malformed shapes.

mod support;

use quotechart_core::{moving_average, normalize, volume_bars, ChartError, RawFeed, VolumeClass};
use support::fixture_feed;

#[test]
fn fixture_drops_null_row_and_keeps_order() {
    let feed = fixture_feed();
    let out = normalize(&feed).unwrap();
    let timestamps = feed.chart.as_ref().unwrap().result.as_ref().unwrap()[0]
        .timestamp
        .as_ref()
        .unwrap()
        .len();

    assert_eq!(timestamps, 12);
    assert_eq!(out.quotes.len(), 11);
    assert!(out.quotes.len() <= timestamps);
    assert!(out.quotes.iter().all(|p| p.is_complete()));
    assert!(out.quotes.is_date_ordered());
    assert_eq!(out.quotes[0].date.timestamp(), 1_546_304_400);
    assert_eq!(out.quotes.last().unwrap().close, 3188.5);
}

#[test]
fn missing_volume_is_kept_as_none() {
    let out = normalize(&fixture_feed()).unwrap();
    assert_eq!(out.quotes[3].volume, None);
    assert_eq!(out.quotes[3].close, 3067.42);
    assert_eq!(out.quotes.iter().filter(|p| p.volume.is_some()).count(), 10);
}

#[test]
fn dividends_come_out_sorted() {
    let out = normalize(&fixture_feed()).unwrap();
    let dates: Vec<i64> = out.dividends.iter().map(|d| d.date.timestamp()).collect();
    assert_eq!(dates, vec![1_546_477_200, 1_546_995_600]);
    assert_eq!(out.dividends[0].amount, 0.31);
    assert_eq!(out.dividends[1].amount, 0.25);
}

#[test]
fn derived_series_line_up_with_quotes() {
    let out = normalize(&fixture_feed()).unwrap();
    let ma = moving_average(&out.quotes, 20);
    assert_eq!(ma.len(), out.quotes.len());
    assert!(ma.iter().zip(out.quotes.iter()).all(|(m, q)| m.date == q.date));
    // window covers everything so far: first value is the first close
    assert_eq!(ma[0].average, out.quotes[0].close);

    let bars = volume_bars(&out.quotes);
    assert_eq!(bars.len(), 10);
    // 3068.76 -> 3039.53
    assert_eq!(bars[0].class, VolumeClass::Up);
    assert_eq!(bars[1].class, VolumeClass::Down);
}

#[test]
fn provider_error_is_malformed() {
    let feed = RawFeed::from_json_str(
        r#"{ "chart": { "result": null, "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" } } }"#,
    )
    .unwrap();
    let err = normalize(&feed).unwrap_err();
    assert!(matches!(err, ChartError::MalformedFeed(ref m) if m.contains("delisted")));
}

#[test]
fn mismatched_array_lengths_are_malformed() {
    let feed = RawFeed::from_json_str(
        r#"{ "chart": { "result": [ {
            "timestamp": [1, 2, 3],
            "indicators": { "quote": [ {
                "open": [1, 2, 3], "high": [1, 2, 3], "low": [1, 2], "close": [1, 2, 3], "volume": [1, 2, 3]
            } ] }
        } ] } }"#,
    )
    .unwrap();
    assert!(matches!(normalize(&feed), Err(ChartError::MalformedFeed(_))));
}

#[test]
fn missing_quote_block_is_malformed() {
    let feed = RawFeed::from_json_str(r#"{ "chart": { "result": [ { "timestamp": [1] } ] } }"#).unwrap();
    assert!(matches!(normalize(&feed), Err(ChartError::MalformedFeed(_))));
}

#[test]
fn invalid_json_is_a_json_error() {
    assert!(matches!(RawFeed::from_json_str("{ chart"), Err(ChartError::Json(_))));
}
