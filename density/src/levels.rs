use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bar::{period_high, period_low, DailyBar};
use crate::constant::{Const, DataError, LevelKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Trailing number of bars scanned for touches.
    pub window_days: usize,
    pub min_touches: u32,
    /// Cap applied to support and resistance independently.
    pub max_levels: usize,
    /// Grid spacing in currency units; bar ranges are floored onto this grid.
    pub grid_step: f64,
    /// Only this many most-touched grid prices are candidates. Raising it
    /// can surface levels that are otherwise never reported.
    pub candidate_limit: usize,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            window_days: Const::DEFAULT_WINDOW_DAYS,
            min_touches: Const::DEFAULT_MIN_TOUCHES,
            max_levels: Const::DEFAULT_MAX_LEVELS,
            grid_step: Const::DEFAULT_GRID_STEP,
            candidate_limit: Const::DEFAULT_CANDIDATE_LIMIT,
        }
    }
}

impl LevelConfig {
    pub fn validate(&self) -> Result<(), DataError> {
        if self.window_days == 0 {
            return Err(DataError::InvalidArgument("window_days must be positive".to_string()));
        }
        if self.min_touches == 0 {
            return Err(DataError::InvalidArgument("min_touches must be at least 1".to_string()));
        }
        if self.max_levels == 0 {
            return Err(DataError::InvalidArgument("max_levels must be positive".to_string()));
        }
        if self.candidate_limit == 0 {
            return Err(DataError::InvalidArgument("candidate_limit must be positive".to_string()));
        }
        if !(self.grid_step.is_finite() && self.grid_step > 0.0) {
            return Err(DataError::InvalidArgument(format!(
                "grid_step must be positive, got {}",
                self.grid_step
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceLevel {
    pub price: f64,
    pub touches: u32,
}

impl PriceLevel {
    /// Signed distance from `current_price`, in percent of it.
    pub fn distance_pct(&self, current_price: f64) -> f64 {
        if current_price.abs() < f64::EPSILON {
            return 0.0;
        }
        (self.price - current_price) / current_price * 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupportResistance {
    pub support: Vec<PriceLevel>,
    pub resistance: Vec<PriceLevel>,
    pub current_price: f64,
    pub window_days_requested: usize,
    pub window_days_used: usize,
    pub min_touches: u32,
}

impl SupportResistance {
    pub fn is_empty(&self) -> bool {
        self.support.is_empty() && self.resistance.is_empty()
    }

    pub fn levels(&self) -> impl Iterator<Item = (LevelKind, &PriceLevel)> {
        self.support
            .iter()
            .map(|x| (LevelKind::Support, x))
            .chain(self.resistance.iter().map(|x| (LevelKind::Resistance, x)))
    }
}

pub fn detect_levels(
    bars: &[DailyBar],
    config: &LevelConfig,
) -> Result<SupportResistance, DataError> {
    config.validate()?;
    let Some(last) = bars.last() else {
        return Err(DataError::EmptyInput("detect_levels"));
    };
    let current_price = last.close;

    let used = config.window_days.min(bars.len());
    let window = &bars[bars.len() - used..];
    check_grid_span(window, config.grid_step)?;
    let touches = count_touches(window, config.grid_step);

    let mut support = Vec::new();
    let mut resistance = Vec::new();
    for (grid, count) in touches.into_iter().take(config.candidate_limit) {
        if count < config.min_touches {
            continue;
        }
        let level = PriceLevel {
            price: grid as f64 * config.grid_step,
            touches: count,
        };
        let bucket = match LevelKind::classify(level.price, current_price) {
            LevelKind::Support => &mut support,
            LevelKind::Resistance => &mut resistance,
        };
        if bucket.len() < config.max_levels {
            bucket.push(level);
        }
    }

    debug!(
        "levels over {} bars: {} support, {} resistance around {}",
        used,
        support.len(),
        resistance.len(),
        current_price
    );

    Ok(SupportResistance {
        support,
        resistance,
        current_price,
        window_days_requested: config.window_days,
        window_days_used: used,
        min_touches: config.min_touches,
    })
}

/// The window's price span must fit in `Const::MAX_GRID_CELLS` grid prices.
fn check_grid_span(window: &[DailyBar], grid_step: f64) -> Result<(), DataError> {
    let low_grid = (period_low(window) / grid_step).floor();
    let high_grid = (period_high(window) / grid_step).floor();
    let cells = high_grid - low_grid + 1.0;
    if !high_grid.is_finite()
        || high_grid.abs() > Const::MAX_GRID_INDEX
        || cells > Const::MAX_GRID_CELLS as f64
    {
        return Err(DataError::InvalidArgument(format!(
            "grid_step {} spans {} grid prices over the window, limit is {}",
            grid_step,
            cells,
            Const::MAX_GRID_CELLS
        )));
    }
    Ok(())
}

/// Touch counts per grid index, most touched first. Equal counts keep the
/// order in which the window first reached the grid price.
fn count_touches(window: &[DailyBar], grid_step: f64) -> Vec<(i64, u32)> {
    let mut rows: Vec<(i64, u32)> = Vec::new();
    let mut slot: HashMap<i64, usize> = HashMap::new();
    for bar in window {
        let low_grid = (bar.low / grid_step).floor() as i64;
        let high_grid = (bar.high / grid_step).floor() as i64;
        for grid in low_grid..=high_grid {
            match slot.get(&grid) {
                Some(&idx) => rows[idx].1 += 1,
                None => {
                    slot.insert(grid, rows.len());
                    rows.push((grid, 1));
                }
            }
        }
    }
    rows.sort_by(|a, b| b.1.cmp(&a.1));
    rows
}
