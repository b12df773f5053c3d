use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use density::{
	format_thousands, parse_date, AnalysisConfigPatch, AnalysisProfileConfig, DataError,
	Watchlist,
};
use market::CsvBarProvider;
use runtime::{
	render_batch_summary, requests_for_watchlist, run_batch, run_single, start_for_months,
	OutputOptions, RunOutcome, RunRequest,
};
use tracing::{error, info, Level};

#[derive(Parser)]
#[command(author, version, about = "Price-range volume density and support/resistance analysis")]
struct Cli {
	/// Log at debug level
	#[arg(short, long, global = true)]
	verbose: bool,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Args)]
struct SourceArgs {
	/// Directory holding one `<symbol>.csv` daily bar file per security
	#[arg(long)]
	data_dir: PathBuf,

	/// First day of the period (e.g. 2024-01-02)
	#[arg(
		long,
		value_parser = parse_day,
		required_unless_present = "months",
		conflicts_with = "months"
	)]
	start: Option<NaiveDate>,

	/// Last day of the period, inclusive; defaults to today
	#[arg(long, value_parser = parse_day)]
	end: Option<NaiveDate>,

	/// Analyze the last N calendar months up to the end day (1, 3, 6 or 12 are typical)
	#[arg(long)]
	months: Option<u32>,

	/// YAML analysis config (`default` / `symbol` profile or a flat patch)
	#[arg(long)]
	config: Option<PathBuf>,

	/// Output directory for reports and exports
	#[arg(long, default_value = ".")]
	out: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
	/// Analyze one security and write its report and price-range table
	Analyze {
		#[command(flatten)]
		source: SourceArgs,

		/// Security code, also the CSV file stem
		#[arg(long)]
		symbol: String,

		/// Display name shown in the report title
		#[arg(long)]
		name: Option<String>,

		/// Watchlist used to look up the display name when `--name` is absent
		#[arg(long)]
		watchlist: Option<PathBuf>,

		#[arg(long)]
		buckets: Option<usize>,

		#[arg(long)]
		top: Option<usize>,

		/// Trailing window for support/resistance, in trading days
		#[arg(long)]
		window: Option<usize>,

		#[arg(long)]
		min_touches: Option<u32>,

		#[arg(long)]
		max_levels: Option<usize>,

		/// Also write the price-range table as parquet
		#[arg(long)]
		parquet: bool,

		#[arg(long)]
		no_csv: bool,
	},

	/// Analyze every security of a watchlist and print a summary
	Batch {
		#[command(flatten)]
		source: SourceArgs,

		/// Watchlist file (.json, .yaml or .yml)
		#[arg(long)]
		watchlist: PathBuf,

		/// Run securities on worker threads
		#[arg(long)]
		parallel: bool,
	},
}

fn parse_day(value: &str) -> Result<NaiveDate, String> {
	parse_date(value).map_err(|e| e.to_string())
}

impl SourceArgs {
	fn period(&self) -> Result<(NaiveDate, NaiveDate), DataError> {
		let end = self.end.unwrap_or_else(|| Local::now().date_naive());
		let start = match (self.start, self.months) {
			(Some(start), _) => start,
			(None, Some(months)) => start_for_months(end, months)?,
			(None, None) => {
				return Err(DataError::InvalidArgument(
					"either --start or --months is required".to_string(),
				));
			}
		};
		Ok((start, end))
	}
}

fn load_profile(path: Option<&PathBuf>) -> Result<AnalysisProfileConfig, DataError> {
	match path {
		Some(path) => AnalysisProfileConfig::from_yaml_file(path),
		None => Ok(AnalysisProfileConfig::default()),
	}
}

fn print_zones(outcome: &RunOutcome) {
	let result = &outcome.result;
	let current = result.current_price();
	println!("[Ranked Zones]");
	for (rank, bucket) in result.top_buckets().iter().enumerate() {
		let distance = if current.abs() < f64::EPSILON {
			0.0
		} else {
			(bucket.range_center - current) / current * 100.0
		};
		println!(
			"{:>2}. {} ~ {}  volume {}  days {}  center {:+.2}% from current",
			rank + 1,
			format_thousands(bucket.range_start),
			format_thousands(bucket.range_end),
			format_thousands(bucket.total_volume as f64),
			bucket.days_count,
			distance
		);
	}
	for (kind, level) in result.levels().levels() {
		println!(
			"{} {} ({} touches, {:+.2}%)",
			kind.as_str(),
			format_thousands(level.price),
			level.touches,
			level.distance_pct(current)
		);
	}
}

fn run(cli: Cli) -> Result<(), DataError> {
	match cli.command {
		Commands::Analyze {
			source,
			symbol,
			name,
			watchlist,
			buckets,
			top,
			window,
			min_touches,
			max_levels,
			parquet,
			no_csv,
		} => {
			let profile = load_profile(source.config.as_ref())?;
			let config = profile.resolve_for(&symbol).apply_patch(AnalysisConfigPatch {
				num_buckets: buckets,
				top_n: top,
				window_days: window,
				min_touches,
				max_levels,
				..Default::default()
			});
			let name = match (name, watchlist) {
				(Some(name), _) => Some(name),
				(None, Some(path)) => Watchlist::load(&path)?.name_of(&symbol).map(str::to_string),
				(None, None) => None,
			};
			let (start, end) = source.period()?;
			let provider = CsvBarProvider::new(&source.data_dir);
			let mut request = RunRequest::new(symbol, start, end);
			if let Some(name) = name {
				request = request.with_name(name);
			}
			let output = OutputOptions {
				dir: Some(source.out),
				write_report: true,
				write_csv: !no_csv,
				write_parquet: parquet,
			};
			let outcome = run_single(&provider, &request, &config, &output)?;
			println!("{}", outcome.report);
			print_zones(&outcome);
			Ok(())
		}
		Commands::Batch {
			source,
			watchlist,
			parallel,
		} => {
			let profile = load_profile(source.config.as_ref())?;
			let watchlist = Watchlist::load(&watchlist)?;
			info!("batch over {} securities", watchlist.len());
			let (start, end) = source.period()?;
			let provider = CsvBarProvider::new(&source.data_dir);
			let requests = requests_for_watchlist(&watchlist, start, end);
			let entries = run_batch(
				&provider,
				&requests,
				&profile,
				&OutputOptions::in_dir(source.out),
				parallel,
			);
			println!("{}", render_batch_summary(&entries));
			Ok(())
		}
	}
}

fn main() -> ExitCode {
	let cli = Cli::parse();
	if cli.verbose {
		density::init_logging_with_level(Level::DEBUG);
	} else {
		density::init_logging();
	}
	match run(cli) {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			error!("{e}");
			ExitCode::from(1)
		}
	}
}
