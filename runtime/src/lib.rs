//! Run orchestration: fetch -> analyze -> write artifacts.
//!
//! Each security is an independent pipeline run with its own bars and
//! result. A batch keeps going when one security fails; that security's
//! report and exports are simply skipped.

use std::fs;
use std::path::PathBuf;

use chrono::{Months, NaiveDate};
use density::{
	analyze, format_thousands, write_buckets_csv, write_buckets_parquet, AnalysisConfig,
	AnalysisProfileConfig, AnalysisResult, DataError, Watchlist,
};
use market::BarProvider;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
	pub symbol: String,
	pub name: Option<String>,
	pub start: NaiveDate,
	pub end: NaiveDate,
}

impl RunRequest {
	pub fn new(symbol: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
		Self {
			symbol: symbol.into(),
			name: None,
			start,
			end,
		}
	}

	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	fn file_stem(&self, kind: &str) -> String {
		sanitize(&format!("{}_{}_{}_{}", self.symbol, kind, self.start, self.end))
	}
}

#[derive(Debug, Clone)]
pub struct OutputOptions {
	pub dir: Option<PathBuf>,
	pub write_report: bool,
	pub write_csv: bool,
	pub write_parquet: bool,
}

impl Default for OutputOptions {
	fn default() -> Self {
		Self {
			dir: None,
			write_report: true,
			write_csv: true,
			write_parquet: false,
		}
	}
}

impl OutputOptions {
	/// Nothing is written to disk.
	pub fn in_memory() -> Self {
		Self {
			dir: None,
			write_report: false,
			write_csv: false,
			write_parquet: false,
		}
	}

	pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
		Self {
			dir: Some(dir.into()),
			..Self::default()
		}
	}

	fn path(&self, file_name: String) -> PathBuf {
		match &self.dir {
			Some(dir) => dir.join(file_name),
			None => PathBuf::from(file_name),
		}
	}
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
	pub request: RunRequest,
	pub result: AnalysisResult,
	pub report: String,
	pub report_path: Option<PathBuf>,
	pub csv_path: Option<PathBuf>,
	pub parquet_path: Option<PathBuf>,
}

pub fn run_single(
	provider: &dyn BarProvider,
	request: &RunRequest,
	config: &AnalysisConfig,
	output: &OutputOptions,
) -> Result<RunOutcome, DataError> {
	config.validate()?;
	info!(
		"fetching {} from {} ({} ~ {})",
		request.symbol,
		provider.name(),
		request.start,
		request.end
	);
	let bars = provider.fetch(&request.symbol, request.start, request.end)?;
	let result = analyze(request.symbol.clone(), bars, config)?;
	let report = result.report(request.name.as_deref());

	if let Some(dir) = &output.dir {
		if output.write_report || output.write_csv || output.write_parquet {
			fs::create_dir_all(dir)?;
		}
	}

	let report_path = if output.write_report {
		let path = output.path(format!("{}.txt", request.file_stem("density_analysis")));
		fs::write(&path, &report)?;
		info!("report written to {}", path.display());
		Some(path)
	} else {
		None
	};

	let csv_path = if output.write_csv {
		let path = output.path(format!("{}.csv", request.file_stem("price_ranges")));
		write_buckets_csv(&path, result.buckets())?;
		info!("price ranges written to {}", path.display());
		Some(path)
	} else {
		None
	};

	let parquet_path = if output.write_parquet {
		let path = output.path(format!("{}.parquet", request.file_stem("price_ranges")));
		write_buckets_parquet(&path, result.buckets())?;
		info!("price ranges written to {}", path.display());
		Some(path)
	} else {
		None
	};

	Ok(RunOutcome {
		request: request.clone(),
		result,
		report,
		report_path,
		csv_path,
		parquet_path,
	})
}

#[derive(Debug)]
pub struct BatchEntry {
	pub request: RunRequest,
	pub outcome: Result<RunOutcome, DataError>,
}

/// Runs every request independently; entries come back in request order.
pub fn run_batch(
	provider: &(dyn BarProvider + Sync),
	requests: &[RunRequest],
	profile: &AnalysisProfileConfig,
	output: &OutputOptions,
	parallel: bool,
) -> Vec<BatchEntry> {
	let run = |request: &RunRequest| {
		let config = profile.resolve_for(&request.symbol);
		let outcome = run_single(provider, request, &config, output);
		if let Err(error) = &outcome {
			warn!("analysis of {} failed: {}", request.symbol, error);
		}
		BatchEntry {
			request: request.clone(),
			outcome,
		}
	};

	if !parallel || requests.len() < 2 {
		return requests.iter().map(run).collect();
	}

	let joined = crossbeam::scope(|scope| {
		let handles = requests
			.iter()
			.map(|request| {
				let run = &run;
				scope.spawn(move |_| run(request))
			})
			.collect::<Vec<_>>();
		handles
			.into_iter()
			.zip(requests)
			.map(|(handle, request)| {
				handle.join().unwrap_or_else(|_| BatchEntry {
					request: request.clone(),
					outcome: Err(DataError::Worker(format!(
						"analysis of {} panicked",
						request.symbol
					))),
				})
			})
			.collect::<Vec<_>>()
	});

	match joined {
		Ok(entries) => entries,
		Err(_) => requests
			.iter()
			.map(|request| BatchEntry {
				request: request.clone(),
				outcome: Err(DataError::Worker(format!(
					"batch scope panicked before {} finished",
					request.symbol
				))),
			})
			.collect(),
	}
}

pub fn requests_for_watchlist(
	watchlist: &Watchlist,
	start: NaiveDate,
	end: NaiveDate,
) -> Vec<RunRequest> {
	watchlist
		.securities
		.iter()
		.map(|security| {
			let request = RunRequest::new(security.code.clone(), start, end);
			if security.name.trim().is_empty() {
				request
			} else {
				request.with_name(security.name.clone())
			}
		})
		.collect()
}

/// First day of a period covering the last `months` calendar months up to `end`.
pub fn start_for_months(end: NaiveDate, months: u32) -> Result<NaiveDate, DataError> {
	if months == 0 {
		return Err(DataError::InvalidArgument("months must be positive".to_string()));
	}
	end.checked_sub_months(Months::new(months))
		.ok_or_else(|| DataError::InvalidArgument(format!("{months} months before {end}")))
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummaryRow {
	pub code: String,
	pub name: String,
	pub current_price: f64,
	pub top_range: Option<(f64, f64)>,
	pub top_volume: u64,
}

impl BatchSummaryRow {
	pub fn from_outcome(outcome: &RunOutcome) -> Self {
		let top = outcome.result.top_buckets().first();
		Self {
			code: outcome.request.symbol.clone(),
			name: outcome
				.request
				.name
				.clone()
				.unwrap_or_else(|| outcome.request.symbol.clone()),
			current_price: outcome.result.current_price(),
			top_range: top.map(|x| (x.range_start, x.range_end)),
			top_volume: top.map(|x| x.total_volume).unwrap_or_default(),
		}
	}
}

pub fn render_batch_summary(entries: &[BatchEntry]) -> String {
	let mut out = String::from("=== Batch Summary ===\n");
	for entry in entries {
		match &entry.outcome {
			Ok(outcome) => {
				let row = BatchSummaryRow::from_outcome(outcome);
				out.push_str(&format!("{}({})\n", row.name, row.code));
				out.push_str(&format!(
					"  Current price: {}\n",
					format_thousands(row.current_price)
				));
				match row.top_range {
					Some((start, end)) => out.push_str(&format!(
						"  Top volume zone: {} ~ {}\n",
						format_thousands(start),
						format_thousands(end)
					)),
					None => out.push_str("  Top volume zone: n/a\n"),
				}
				out.push_str(&format!(
					"  Zone volume: {}\n",
					format_thousands(row.top_volume as f64)
				));
			}
			Err(error) => {
				let label = entry.request.name.as_deref().unwrap_or(&entry.request.symbol);
				out.push_str(&format!(
					"{}({})\n  FAILED: {}\n",
					label, entry.request.symbol, error
				));
			}
		}
	}
	out
}

fn sanitize(value: &str) -> String {
	value
		.chars()
		.map(|c| match c {
			' ' | '/' | '\\' => '_',
			_ => c,
		})
		.collect()
}
