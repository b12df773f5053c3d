//! Plain-text analysis report.
//!
//! The layout is fixed and human-oriented; it is not meant to be parsed back.

use std::fmt::Write;

use crate::bar::{mean_volume, period_high, period_low, DailyBar};
use crate::constant::{ConcentrationLevel, Const};
use crate::levels::{PriceLevel, SupportResistance};
use crate::profile::{concentration_ratio, PriceBucket};
use crate::utils::format_thousands;

const NOTES: [&str; 3] = [
    "Zones where volume concentrated tend to act as future support or resistance.",
    "Compare the zones above and below the current price when planning entries and exits.",
    "Higher concentration means the price band saw heavier two-sided trading.",
];

pub struct ReportContext<'a> {
    pub symbol: &'a str,
    pub name: Option<&'a str>,
    pub bars: &'a [DailyBar],
    pub buckets: &'a [PriceBucket],
    pub top_buckets: &'a [PriceBucket],
    pub levels: &'a SupportResistance,
    /// How many ranked zones are listed.
    pub zone_limit: usize,
}

pub fn compose_report(ctx: &ReportContext<'_>) -> String {
    let mut out = String::new();
    write_header(&mut out, ctx);
    write_summary(&mut out, ctx);
    write_zones(&mut out, ctx);
    write_levels(&mut out, ctx.levels);
    write_concentration(&mut out, ctx);
    write_notes(&mut out);
    out
}

fn write_header(out: &mut String, ctx: &ReportContext<'_>) {
    let title = match ctx.name {
        Some(name) if !name.trim().is_empty() => format!("{} ({})", ctx.symbol, name.trim()),
        _ => ctx.symbol.to_string(),
    };
    let _ = writeln!(out, "=== {title} Volume Density Report ===");
    match (ctx.bars.first(), ctx.bars.last()) {
        (Some(first), Some(last)) => {
            let _ = writeln!(out, "Period: {} ~ {}", first.date, last.date);
        }
        _ => {
            let _ = writeln!(out, "Period: n/a");
        }
    }
    let _ = writeln!(out, "Trading days: {}", ctx.bars.len());
}

fn write_summary(out: &mut String, ctx: &ReportContext<'_>) {
    let (high, low) = if ctx.bars.is_empty() {
        (0.0, 0.0)
    } else {
        (period_high(ctx.bars), period_low(ctx.bars))
    };
    let _ = writeln!(out);
    let _ = writeln!(out, "[Summary]");
    let _ = writeln!(out, "- Current price: {}", format_thousands(ctx.levels.current_price));
    let _ = writeln!(out, "- Period high: {}", format_thousands(high));
    let _ = writeln!(out, "- Period low: {}", format_thousands(low));
    let _ = writeln!(out, "- Mean volume: {}", format_thousands(mean_volume(ctx.bars)));
}

fn write_zones(out: &mut String, ctx: &ReportContext<'_>) {
    let shown = ctx.top_buckets.len().min(ctx.zone_limit);
    let _ = writeln!(out);
    let _ = writeln!(out, "[Top Volume Zones]");
    if shown == 0 {
        let _ = writeln!(out, "- none");
        return;
    }
    for (rank, zone) in ctx.top_buckets.iter().take(shown).enumerate() {
        let _ = writeln!(
            out,
            "{}. {} ~ {}",
            rank + 1,
            format_thousands(zone.range_start),
            format_thousands(zone.range_end)
        );
        let _ = writeln!(out, "   Total volume: {}", format_thousands(zone.total_volume as f64));
        let _ = writeln!(out, "   Days: {}", zone.days_count);
        let _ = writeln!(out, "   Avg volume: {}", format_thousands(zone.avg_volume));
    }
}

fn write_levels(out: &mut String, levels: &SupportResistance) {
    let _ = writeln!(out);
    let _ = writeln!(out, "[Support / Resistance]");
    let _ = writeln!(
        out,
        "Window: last {} days, min touches {}",
        levels.window_days_used, levels.min_touches
    );
    if levels.is_empty() {
        let _ = writeln!(out, "- none found");
        return;
    }
    write_level_block(out, "<Support>", &levels.support);
    write_level_block(out, "<Resistance>", &levels.resistance);
}

fn write_level_block(out: &mut String, title: &str, rows: &[PriceLevel]) {
    if rows.is_empty() {
        return;
    }
    let _ = writeln!(out, "{title}");
    for level in rows {
        let _ = writeln!(
            out,
            "- {} ({} touches)",
            format_thousands(level.price),
            level.touches
        );
    }
}

fn write_concentration(out: &mut String, ctx: &ReportContext<'_>) {
    let ratio = concentration_ratio(ctx.buckets, Const::CONCENTRATION_TOP_COUNT);
    let _ = writeln!(out);
    let _ = writeln!(out, "[Volume Concentration]");
    let _ = writeln!(
        out,
        "- Top {} zones share: {:.1}%",
        Const::CONCENTRATION_TOP_COUNT,
        ratio
    );
    let _ = writeln!(out, "- Concentration: {}", ConcentrationLevel::classify(ratio).as_str());
}

fn write_notes(out: &mut String) {
    let _ = writeln!(out);
    let _ = writeln!(out, "[Notes]");
    for note in NOTES {
        let _ = writeln!(out, "- {note}");
    }
}
