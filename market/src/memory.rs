use std::collections::HashMap;

use chrono::NaiveDate;
use density::{DailyBar, DataError};

use crate::provider::{check_range, no_data, BarProvider};

/// Serves bars held in memory; handy for demos and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryBarProvider {
	series: HashMap<String, Vec<DailyBar>>,
}

impl MemoryBarProvider {
	pub fn new() -> Self {
		Self::default()
	}

	/// Stores `bars` for `symbol`, sorted by date. Replaces any earlier series.
	pub fn insert(&mut self, symbol: impl Into<String>, mut bars: Vec<DailyBar>) {
		bars.sort_by_key(|bar| bar.date);
		self.series.insert(symbol.into(), bars);
	}

	pub fn symbols(&self) -> Vec<&str> {
		let mut out = self.series.keys().map(String::as_str).collect::<Vec<_>>();
		out.sort_unstable();
		out
	}
}

impl BarProvider for MemoryBarProvider {
	fn name(&self) -> &str {
		"memory"
	}

	fn fetch(
		&self,
		symbol: &str,
		start: NaiveDate,
		end: NaiveDate,
	) -> Result<Vec<DailyBar>, DataError> {
		check_range(start, end)?;
		let bars = self
			.series
			.get(symbol)
			.map(|rows| {
				rows.iter()
					.filter(|bar| start <= bar.date && bar.date <= end)
					.cloned()
					.collect::<Vec<_>>()
			})
			.unwrap_or_default();
		if bars.is_empty() {
			return Err(no_data(symbol, start, end));
		}
		Ok(bars)
	}
}
