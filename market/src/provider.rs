//! Ingestion boundary.
//!
//! A provider turns `(symbol, start, end)` into an ascending daily bar
//! sequence. Calls are synchronous and never retried here; an empty result
//! is reported as `DataError::NoData`.

use chrono::NaiveDate;
use density::{DailyBar, DataError};

pub trait BarProvider {
	/// Short provider label used in logs.
	fn name(&self) -> &str;

	/// Daily bars for `symbol` with `start <= date <= end`, ascending by date.
	fn fetch(
		&self,
		symbol: &str,
		start: NaiveDate,
		end: NaiveDate,
	) -> Result<Vec<DailyBar>, DataError>;
}

pub(crate) fn check_range(start: NaiveDate, end: NaiveDate) -> Result<(), DataError> {
	if start > end {
		return Err(DataError::InvalidArgument(format!(
			"start {start} is after end {end}"
		)));
	}
	Ok(())
}

pub(crate) fn no_data(symbol: &str, start: NaiveDate, end: NaiveDate) -> DataError {
	DataError::NoData {
		symbol: symbol.to_string(),
		start,
		end,
	}
}
