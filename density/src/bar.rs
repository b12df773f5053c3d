use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constant::DataError;

/// One trading day of OHLCV data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl DailyBar {
    /// Inclusive interval overlap between `[low, high]` and `[start, end]`.
    pub fn overlaps(&self, start: f64, end: f64) -> bool {
        self.low <= end && self.high >= start
    }

    pub fn covers(&self, price: f64) -> bool {
        self.low <= price && price <= self.high
    }

    pub fn validate(&self) -> Result<(), DataError> {
        let prices = [self.open, self.high, self.low, self.close];
        if prices.iter().any(|p| !p.is_finite() || *p <= 0.0) {
            return Err(DataError::InvalidBar(format!(
                "{}: prices must be positive and finite",
                self.date
            )));
        }
        if self.low > self.high {
            return Err(DataError::InvalidBar(format!(
                "{}: low {} above high {}",
                self.date, self.low, self.high
            )));
        }
        if !self.covers(self.open) || !self.covers(self.close) {
            return Err(DataError::InvalidBar(format!(
                "{}: open/close outside [{}, {}]",
                self.date, self.low, self.high
            )));
        }
        Ok(())
    }
}

pub(crate) fn period_low(bars: &[DailyBar]) -> f64 {
    bars.iter().map(|bar| bar.low).fold(f64::MAX, f64::min)
}

pub(crate) fn period_high(bars: &[DailyBar]) -> f64 {
    bars.iter().map(|bar| bar.high).fold(f64::MIN, f64::max)
}

pub(crate) fn mean_volume(bars: &[DailyBar]) -> f64 {
    if bars.is_empty() {
        return 0.0;
    }
    bars.iter().map(|bar| bar.volume as f64).sum::<f64>() / bars.len() as f64
}
