use std::path::PathBuf;

use chrono::NaiveDate;
use density::{filter_range, load_daily_bars, DailyBar, DataError};
use tracing::{debug, warn};

use crate::provider::{check_range, no_data, BarProvider};

/// Reads `<dir>/<symbol>.csv` files exported from a market data vendor.
#[derive(Debug, Clone)]
pub struct CsvBarProvider {
	dir: PathBuf,
}

impl CsvBarProvider {
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self { dir: dir.into() }
	}

	/// Path of the CSV file backing `symbol`. The symbol must be a plain
	/// file stem so the lookup stays inside the data directory.
	pub fn path_for(&self, symbol: &str) -> Result<PathBuf, DataError> {
		let stem = symbol.trim();
		if stem.is_empty() || stem == "." || stem == ".." || stem.contains(['/', '\\']) {
			return Err(DataError::InvalidArgument(format!(
				"symbol {symbol:?} is not a valid file name"
			)));
		}
		Ok(self.dir.join(format!("{stem}.csv")))
	}
}

impl BarProvider for CsvBarProvider {
	fn name(&self) -> &str {
		"csv"
	}

	fn fetch(
		&self,
		symbol: &str,
		start: NaiveDate,
		end: NaiveDate,
	) -> Result<Vec<DailyBar>, DataError> {
		check_range(start, end)?;
		let path = self.path_for(symbol)?;
		if !path.is_file() {
			warn!("no bar file for {} at {}", symbol, path.display());
			return Err(no_data(symbol, start, end));
		}

		let bars = filter_range(load_daily_bars(&path)?, start, end);
		if bars.is_empty() {
			return Err(no_data(symbol, start, end));
		}
		debug!("csv provider loaded {} bars for {}", bars.len(), symbol);
		Ok(bars)
	}
}
