use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("no data for {symbol} between {start} and {end}")]
    NoData {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },
    #[error("{0}: empty bar sequence")]
    EmptyInput(&'static str),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("invalid date: {0}")]
    InvalidDate(String),
    #[error("invalid bar: {0}")]
    InvalidBar(String),
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),
    #[error("worker failed: {0}")]
    Worker(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub struct Const;

impl Const {
    pub const DEFAULT_NUM_BUCKETS: usize = 20;
    pub const DEFAULT_TOP_N: usize = 10;
    pub const DEFAULT_WINDOW_DAYS: usize = 60;
    pub const DEFAULT_MIN_TOUCHES: u32 = 3;
    pub const DEFAULT_MAX_LEVELS: usize = 3;
    /// Levels are counted on a grid of this many currency units.
    pub const DEFAULT_GRID_STEP: f64 = 1000.0;
    /// Only the most-touched grid prices are ever considered as levels.
    pub const DEFAULT_CANDIDATE_LIMIT: usize = 20;
    pub const DEFAULT_REPORT_ZONES: usize = 5;
    /// Upper bound on distinct grid prices a level window may span.
    pub const MAX_GRID_CELLS: usize = 100_000;
    /// Grid indices stay well inside the exactly representable f64 range.
    pub const MAX_GRID_INDEX: f64 = 1e15;
    pub const CONCENTRATION_TOP_COUNT: usize = 3;
    pub const CONCENTRATION_HIGH_PCT: f64 = 30.0;
    pub const CONCENTRATION_MODERATE_PCT: f64 = 20.0;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConcentrationLevel {
    High,
    Moderate,
    Low,
}

impl ConcentrationLevel {
    pub fn classify(ratio_pct: f64) -> Self {
        if ratio_pct > Const::CONCENTRATION_HIGH_PCT {
            Self::High
        } else if ratio_pct > Const::CONCENTRATION_MODERATE_PCT {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Moderate => "moderate",
            Self::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LevelKind {
    Support,
    Resistance,
}

impl LevelKind {
    pub fn classify(price: f64, current_price: f64) -> Self {
        if price < current_price {
            Self::Support
        } else {
            Self::Resistance
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Support => "support",
            Self::Resistance => "resistance",
        }
    }
}
