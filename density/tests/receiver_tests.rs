use std::fs;

use chrono::NaiveDate;

use density::{filter_range, load_daily_bars, parse_daily_bars, parse_date, DataError};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

#[test]
fn parses_provider_style_headers_and_sorts_by_date() {
    let text = "\
Date,Open,High,Low,Close,Volume,Change
2024-01-04,71800,72500,71300,72100,15000000.0,0.004
2024-01-02,70000,71500,69800,71000,12000000,0.01
2024-01-03,71000,72300,70500,71800,13500000,0.011
";
    let bars = parse_daily_bars(text).expect("csv should parse");
    assert_eq!(bars.len(), 3);
    assert_eq!(bars[0].date, date(2024, 1, 2));
    assert_eq!(bars[2].date, date(2024, 1, 4));
    assert_eq!(bars[2].volume, 15_000_000);
    assert_eq!(bars[1].high, 72_300.0);
}

#[test]
fn parses_lowercase_headers_from_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bars.csv");
    fs::write(
        &path,
        "date,open,high,low,close,volume\n2024-02-01 00:00:00,10,12,9,11,500\n",
    )
    .expect("write csv");
    let bars = load_daily_bars(&path).expect("csv should load");
    assert_eq!(bars.len(), 1);
    assert_eq!(bars[0].date, date(2024, 2, 1));
    assert_eq!(bars[0].volume, 500);
}

#[test]
fn rejects_inconsistent_bars() {
    let low_above_high = "date,open,high,low,close,volume\n2024-01-02,10,9,11,10,1\n";
    assert!(matches!(parse_daily_bars(low_above_high), Err(DataError::InvalidBar(_))));

    let close_outside = "date,open,high,low,close,volume\n2024-01-02,10,12,9,13,1\n";
    assert!(matches!(parse_daily_bars(close_outside), Err(DataError::InvalidBar(_))));

    let negative_volume = "date,open,high,low,close,volume\n2024-01-02,10,12,9,11,-5\n";
    assert!(matches!(parse_daily_bars(negative_volume), Err(DataError::InvalidBar(_))));

    let duplicate = "date,open,high,low,close,volume\n2024-01-02,10,12,9,11,1\n2024-01-02,10,12,9,11,1\n";
    assert!(matches!(parse_daily_bars(duplicate), Err(DataError::InvalidBar(_))));

    let bad_date = "date,open,high,low,close,volume\nyesterday,10,12,9,11,1\n";
    assert!(matches!(parse_daily_bars(bad_date), Err(DataError::InvalidDate(_))));
}

#[test]
fn missing_file_is_io_or_csv_error() {
    let err = load_daily_bars("/definitely/not/here.csv").expect_err("missing file should fail");
    assert!(matches!(err, DataError::Csv(_) | DataError::Io(_)));
}

#[test]
fn parse_date_accepts_common_layouts() {
    let expected = date(2024, 3, 15);
    for raw in [
        "2024-03-15",
        "2024/03/15",
        "20240315",
        "2024-03-15 09:00:00",
        "2024-03-15T00:00:00+09:00",
    ] {
        assert_eq!(parse_date(raw).expect(raw), expected, "layout {raw}");
    }
}

#[test]
fn filter_range_is_inclusive() {
    let text = "\
date,open,high,low,close,volume
2024-01-02,10,12,9,11,1
2024-01-03,10,12,9,11,1
2024-01-04,10,12,9,11,1
2024-01-05,10,12,9,11,1
";
    let bars = parse_daily_bars(text).expect("csv should parse");
    let kept = filter_range(bars, date(2024, 1, 3), date(2024, 1, 4));
    assert_eq!(kept.len(), 2);
    assert_eq!(kept[0].date, date(2024, 1, 3));
    assert_eq!(kept[1].date, date(2024, 1, 4));
}
