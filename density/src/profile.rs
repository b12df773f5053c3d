//! Price-range volume profile.
//!
//! Splits the observed `[min(low), max(high)]` span into equal-width buckets
//! and attributes each day's volume to every bucket its intraday range
//! overlaps. A day straddling a boundary is counted in both neighbours, so
//! summed bucket volume can exceed the period's real volume.

use serde::Serialize;
use tracing::debug;

use crate::bar::{period_high, period_low, DailyBar};
use crate::constant::DataError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceBucket {
    pub index: usize,
    pub range_start: f64,
    pub range_end: f64,
    pub range_center: f64,
    pub total_volume: u64,
    pub days_count: u64,
    pub avg_volume: f64,
    pub volume_density: f64,
}

pub fn bin_price_ranges(
    bars: &[DailyBar],
    num_buckets: usize,
) -> Result<Vec<PriceBucket>, DataError> {
    if num_buckets == 0 {
        return Err(DataError::InvalidArgument(
            "bucket count must be positive".to_string(),
        ));
    }
    if bars.is_empty() {
        return Err(DataError::EmptyInput("bin_price_ranges"));
    }

    let lo = period_low(bars);
    let hi = period_high(bars);
    let edges = bucket_edges(lo, hi, num_buckets);

    let buckets = edges
        .windows(2)
        .enumerate()
        .map(|(index, edge)| build_bucket(index, edge[0], edge[1], bars))
        .collect::<Vec<_>>();

    debug!(
        "binned {} bars into {} buckets over [{}, {}]",
        bars.len(),
        buckets.len(),
        lo,
        hi
    );
    Ok(buckets)
}

fn bucket_edges(lo: f64, hi: f64, num_buckets: usize) -> Vec<f64> {
    let step = (hi - lo) / num_buckets as f64;
    let mut edges = (0..num_buckets)
        .map(|i| lo + i as f64 * step)
        .collect::<Vec<_>>();
    edges.push(hi);
    edges
}

fn build_bucket(index: usize, start: f64, end: f64, bars: &[DailyBar]) -> PriceBucket {
    let mut total_volume = 0u64;
    let mut days_count = 0u64;
    for bar in bars.iter().filter(|bar| bar.overlaps(start, end)) {
        total_volume += bar.volume;
        days_count += 1;
    }

    let avg_volume = if days_count == 0 {
        0.0
    } else {
        total_volume as f64 / days_count as f64
    };
    let width = end - start;
    let volume_density = if width > 0.0 {
        total_volume as f64 / width
    } else {
        0.0
    };

    PriceBucket {
        index,
        range_start: start,
        range_end: end,
        range_center: (start + end) / 2.0,
        total_volume,
        days_count,
        avg_volume,
        volume_density,
    }
}

/// Highest-volume buckets first; equal volumes keep their bucket order.
pub fn top_density(
    buckets: &[PriceBucket],
    top_n: usize,
) -> Result<Vec<PriceBucket>, DataError> {
    if top_n == 0 {
        return Err(DataError::InvalidArgument(
            "top-N must be positive".to_string(),
        ));
    }
    let mut ranked = buckets.to_vec();
    ranked.sort_by(|a, b| b.total_volume.cmp(&a.total_volume));
    ranked.truncate(top_n);
    Ok(ranked)
}

/// Share of all bucket volume held by the `top_count` highest-volume
/// buckets, in percent. Ranks the whole sequence, so it does not depend on
/// how many zones were kept for display.
pub fn concentration_ratio(buckets: &[PriceBucket], top_count: usize) -> f64 {
    let total: u64 = buckets.iter().map(|x| x.total_volume).sum();
    if total == 0 {
        return 0.0;
    }
    let mut volumes = buckets.iter().map(|x| x.total_volume).collect::<Vec<_>>();
    volumes.sort_unstable_by(|a, b| b.cmp(a));
    let top: u64 = volumes.iter().take(top_count).sum();
    (top as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
}
