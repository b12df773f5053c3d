pub mod bar;
pub mod config;
pub mod constant;
pub mod engine;
pub mod export;
pub mod levels;
pub mod logging;
pub mod profile;
pub mod receiver;
pub mod report;
pub mod symbol;
pub mod utils;

pub use bar::DailyBar;
pub use config::{AnalysisConfig, AnalysisConfigPatch, AnalysisProfileConfig};
pub use constant::{ConcentrationLevel, Const, DataError, LevelKind};
pub use engine::{analyze, AnalysisResult};
pub use export::{
    buckets_csv_string, buckets_dataframe, levels_dataframe, write_buckets_csv,
    write_buckets_parquet, BucketRow, BUCKET_COLUMNS,
};
pub use levels::{detect_levels, LevelConfig, PriceLevel, SupportResistance};
pub use logging::{init_logging, init_logging_with_level};
pub use profile::{bin_price_ranges, concentration_ratio, top_density, PriceBucket};
pub use receiver::{filter_range, load_daily_bars, parse_daily_bars, parse_date};
pub use report::{compose_report, ReportContext};
pub use symbol::{Security, Watchlist};
pub use utils::format_thousands;
