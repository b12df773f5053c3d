use chrono::NaiveDate;

use density::{
    analyze, compose_report, AnalysisConfig, ConcentrationLevel, DailyBar, DataError,
    LevelConfig, ReportContext, SupportResistance,
};

fn bar(day: u32, open: f64, high: f64, low: f64, close: f64, volume: u64) -> DailyBar {
    DailyBar {
        date: NaiveDate::from_ymd_opt(2024, 1, day).expect("valid date"),
        open,
        high,
        low,
        close,
        volume,
    }
}

fn sample_bars() -> Vec<DailyBar> {
    vec![
        bar(2, 50_000.0, 51_500.0, 49_800.0, 51_000.0, 1_000),
        bar(3, 51_000.0, 52_300.0, 50_500.0, 52_000.0, 2_000),
        bar(4, 52_000.0, 52_800.0, 51_200.0, 51_500.0, 1_500),
        bar(5, 51_500.0, 52_100.0, 50_900.0, 51_800.0, 3_000),
    ]
}

fn sample_config() -> AnalysisConfig {
    AnalysisConfig {
        num_buckets: 4,
        top_n: 3,
        levels: LevelConfig {
            min_touches: 2,
            ..LevelConfig::default()
        },
        ..AnalysisConfig::default()
    }
}

#[test]
fn pipeline_produces_expected_profile_and_levels() {
    let result = analyze("TEST", sample_bars(), &sample_config()).expect("analysis should succeed");

    let volumes = result
        .buckets()
        .iter()
        .map(|x| x.total_volume)
        .collect::<Vec<_>>();
    assert_eq!(volumes, vec![3_000, 7_500, 7_500, 6_500]);

    let ranked = result
        .top_buckets()
        .iter()
        .map(|x| x.index)
        .collect::<Vec<_>>();
    assert_eq!(ranked, vec![1, 2, 3]);

    let levels = result.levels();
    assert_eq!(result.current_price(), 51_800.0);
    assert_eq!(
        levels.support.iter().map(|x| (x.price, x.touches)).collect::<Vec<_>>(),
        vec![(51_000.0, 4), (50_000.0, 3)]
    );
    assert_eq!(
        levels.resistance.iter().map(|x| (x.price, x.touches)).collect::<Vec<_>>(),
        vec![(52_000.0, 3)]
    );
    assert!((result.concentration() - 21_500.0 / 24_500.0 * 100.0).abs() < 1e-9);
    assert_eq!(result.concentration_level(), ConcentrationLevel::High);
    assert_eq!(
        result.period(),
        Some((
            NaiveDate::from_ymd_opt(2024, 1, 2).expect("date"),
            NaiveDate::from_ymd_opt(2024, 1, 5).expect("date")
        ))
    );
}

#[test]
fn concentration_ignores_displayed_zone_count() {
    let config = AnalysisConfig {
        top_n: 1,
        ..sample_config()
    };
    let result = analyze("TEST", sample_bars(), &config).expect("analysis should succeed");

    assert_eq!(result.top_buckets().len(), 1);
    assert!(
        (result.concentration() - 21_500.0 / 24_500.0 * 100.0).abs() < 1e-9,
        "share is taken over the three largest buckets, got {}",
        result.concentration()
    );
    assert!(result.report(None).contains("- Top 3 zones share: 87.8%\n"));
}

#[test]
fn report_lists_sections_in_order() {
    let result = analyze("TEST", sample_bars(), &sample_config()).expect("analysis should succeed");
    let report = result.report(None);

    assert!(report.starts_with("=== TEST Volume Density Report ===\n"));
    assert!(report.contains("Period: 2024-01-02 ~ 2024-01-05\n"));
    assert!(report.contains("Trading days: 4\n"));
    assert!(report.contains(
        "[Summary]\n- Current price: 51,800\n- Period high: 52,800\n- Period low: 49,800\n- Mean volume: 1,875\n"
    ));
    assert!(report.contains(
        "1. 50,550 ~ 51,300\n   Total volume: 7,500\n   Days: 4\n   Avg volume: 1,875\n"
    ));
    assert!(report.contains(
        "3. 52,050 ~ 52,800\n   Total volume: 6,500\n   Days: 3\n   Avg volume: 2,167\n"
    ));
    assert!(report.contains(
        "Window: last 4 days, min touches 2\n<Support>\n- 51,000 (4 touches)\n- 50,000 (3 touches)\n<Resistance>\n- 52,000 (3 touches)\n"
    ));
    assert!(report.contains("- Top 3 zones share: 87.8%\n- Concentration: high\n"));

    let order = [
        "[Summary]",
        "[Top Volume Zones]",
        "[Support / Resistance]",
        "[Volume Concentration]",
        "[Notes]",
    ]
    .iter()
    .map(|x| report.find(x).expect("section present"))
    .collect::<Vec<_>>();
    assert!(order.windows(2).all(|w| w[0] < w[1]), "sections out of order");
}

#[test]
fn report_is_byte_identical_across_runs() {
    let first = analyze("TEST", sample_bars(), &sample_config())
        .expect("analysis should succeed")
        .report(Some("Test Corp"));
    let second = analyze("TEST", sample_bars(), &sample_config())
        .expect("analysis should succeed")
        .report(Some("Test Corp"));
    assert_eq!(first, second);
    assert!(first.starts_with("=== TEST (Test Corp) Volume Density Report ==="));
}

#[test]
fn report_zone_limit_caps_enumeration() {
    let config = AnalysisConfig {
        report_zones: 1,
        ..sample_config()
    };
    let report = analyze("TEST", sample_bars(), &config)
        .expect("analysis should succeed")
        .report(None);
    assert!(report.contains("1. 50,550 ~ 51,300"));
    assert!(!report.contains("2. 51,300 ~ 52,050"));
}

#[test]
fn report_without_volume_or_levels_falls_back_to_low() {
    let bars = vec![bar(2, 100.0, 100.0, 100.0, 100.0, 0)];
    let levels = SupportResistance {
        support: Vec::new(),
        resistance: Vec::new(),
        current_price: 100.0,
        window_days_requested: 60,
        window_days_used: 1,
        min_touches: 3,
    };
    let report = compose_report(&ReportContext {
        symbol: "FLAT",
        name: None,
        bars: &bars,
        buckets: &[],
        top_buckets: &[],
        levels: &levels,
        zone_limit: 5,
    });
    assert!(report.contains("[Top Volume Zones]\n- none\n"));
    assert!(report.contains("- none found\n"));
    assert!(report.contains("- Top 3 zones share: 0.0%\n- Concentration: low\n"));
}

#[test]
fn analyze_surfaces_errors() {
    assert!(matches!(
        analyze("EMPTY", Vec::new(), &AnalysisConfig::default()),
        Err(DataError::EmptyInput(_))
    ));
    let config = AnalysisConfig {
        top_n: 0,
        ..AnalysisConfig::default()
    };
    assert!(matches!(
        analyze("TEST", sample_bars(), &config),
        Err(DataError::InvalidArgument(_))
    ));
}
