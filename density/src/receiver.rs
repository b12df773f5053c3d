use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use tracing::debug;

use crate::bar::DailyBar;
use crate::constant::DataError;

#[derive(Debug, Deserialize)]
struct CsvBarRow {
    #[serde(alias = "Date", alias = "datetime")]
    date: String,
    #[serde(alias = "Open")]
    open: f64,
    #[serde(alias = "High")]
    high: f64,
    #[serde(alias = "Low")]
    low: f64,
    #[serde(alias = "Close")]
    close: f64,
    #[serde(default, alias = "Volume")]
    volume: f64,
}

/// Loads daily bars from CSV, validated and sorted by date.
pub fn load_daily_bars(file_path: impl AsRef<Path>) -> Result<Vec<DailyBar>, DataError> {
    let file_path = file_path.as_ref();
    let mut reader = csv::Reader::from_path(file_path)?;
    read_daily_bars(&mut reader)
}

pub fn parse_daily_bars(text: &str) -> Result<Vec<DailyBar>, DataError> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    read_daily_bars(&mut reader)
}

fn read_daily_bars<R: std::io::Read>(
    reader: &mut csv::Reader<R>,
) -> Result<Vec<DailyBar>, DataError> {
    let mut out = Vec::new();
    for row in reader.deserialize::<CsvBarRow>() {
        let row = row?;
        let date = parse_date(&row.date)?;
        if !row.volume.is_finite() || row.volume < 0.0 {
            return Err(DataError::InvalidBar(format!(
                "{date}: volume must be non-negative, got {}",
                row.volume
            )));
        }
        let bar = DailyBar {
            date,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume.round() as u64,
        };
        bar.validate()?;
        out.push(bar);
    }

    out.sort_by_key(|bar| bar.date);
    let mut seen = HashSet::with_capacity(out.len());
    for bar in &out {
        if !seen.insert(bar.date) {
            return Err(DataError::InvalidBar(format!("duplicate date {}", bar.date)));
        }
    }
    debug!("loaded {} daily bars", out.len());
    Ok(out)
}

pub fn filter_range(bars: Vec<DailyBar>, start: NaiveDate, end: NaiveDate) -> Vec<DailyBar> {
    bars.into_iter()
        .filter(|bar| start <= bar.date && bar.date <= end)
        .collect()
}

pub fn parse_date(value: &str) -> Result<NaiveDate, DataError> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.date_naive());
    }

    for pattern in ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, pattern) {
            return Ok(date);
        }
    }

    for pattern in ["%Y-%m-%d %H:%M:%S%.f", "%Y/%m/%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, pattern) {
            return Ok(dt.date());
        }
    }

    Err(DataError::InvalidDate(value.to_string()))
}
