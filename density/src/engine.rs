use chrono::NaiveDate;
use tracing::info;

use crate::bar::DailyBar;
use crate::config::AnalysisConfig;
use crate::constant::{ConcentrationLevel, Const, DataError};
use crate::levels::{detect_levels, SupportResistance};
use crate::profile::{bin_price_ranges, concentration_ratio, top_density, PriceBucket};
use crate::report::{compose_report, ReportContext};

/// Read-only outcome of one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    symbol: String,
    report_zones: usize,
    bars: Vec<DailyBar>,
    buckets: Vec<PriceBucket>,
    top_buckets: Vec<PriceBucket>,
    levels: SupportResistance,
    concentration: f64,
}

pub fn analyze(
    symbol: impl Into<String>,
    bars: Vec<DailyBar>,
    config: &AnalysisConfig,
) -> Result<AnalysisResult, DataError> {
    let symbol = symbol.into();
    config.validate()?;
    if bars.is_empty() {
        return Err(DataError::EmptyInput("analyze"));
    }

    let buckets = bin_price_ranges(&bars, config.num_buckets)?;
    let top_buckets = top_density(&buckets, config.top_n)?;
    let levels = detect_levels(&bars, &config.levels)?;
    let concentration = concentration_ratio(&buckets, Const::CONCENTRATION_TOP_COUNT);

    info!(
        "analyzed {}: {} bars, {} buckets, {} support, {} resistance, concentration {:.1}%",
        symbol,
        bars.len(),
        buckets.len(),
        levels.support.len(),
        levels.resistance.len(),
        concentration
    );

    Ok(AnalysisResult {
        symbol,
        report_zones: config.report_zones,
        bars,
        buckets,
        top_buckets,
        levels,
        concentration,
    })
}

impl AnalysisResult {
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[DailyBar] {
        &self.bars
    }

    pub fn buckets(&self) -> &[PriceBucket] {
        &self.buckets
    }

    pub fn top_buckets(&self) -> &[PriceBucket] {
        &self.top_buckets
    }

    pub fn levels(&self) -> &SupportResistance {
        &self.levels
    }

    pub fn current_price(&self) -> f64 {
        self.levels.current_price
    }

    pub fn concentration(&self) -> f64 {
        self.concentration
    }

    pub fn concentration_level(&self) -> ConcentrationLevel {
        ConcentrationLevel::classify(self.concentration)
    }

    /// First and last bar dates.
    pub fn period(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.bars.first()?.date, self.bars.last()?.date))
    }

    pub fn report(&self, name: Option<&str>) -> String {
        compose_report(&ReportContext {
            symbol: &self.symbol,
            name,
            bars: &self.bars,
            buckets: &self.buckets,
            top_buckets: &self.top_buckets,
            levels: &self.levels,
            zone_limit: self.report_zones,
        })
    }
}
