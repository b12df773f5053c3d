use chrono::NaiveDate;

use density::{
    bin_price_ranges, concentration_ratio, top_density, DailyBar, DataError, PriceBucket,
};

fn bar(day: u32, low: f64, high: f64, volume: u64) -> DailyBar {
    DailyBar {
        date: NaiveDate::from_ymd_opt(2024, 3, day).expect("valid date"),
        open: low,
        high,
        low,
        close: high,
        volume,
    }
}

fn three_day_sample() -> Vec<DailyBar> {
    vec![
        bar(1, 100.0, 110.0, 1000),
        bar(4, 105.0, 115.0, 2000),
        bar(5, 100.0, 108.0, 1500),
    ]
}

fn bucket(index: usize, total_volume: u64) -> PriceBucket {
    PriceBucket {
        index,
        range_start: index as f64,
        range_end: index as f64 + 1.0,
        range_center: index as f64 + 0.5,
        total_volume,
        days_count: 1,
        avg_volume: total_volume as f64,
        volume_density: total_volume as f64,
    }
}

#[test]
fn two_buckets_split_range_at_midpoint() {
    let buckets = bin_price_ranges(&three_day_sample(), 2).expect("binning should succeed");
    assert_eq!(buckets.len(), 2);
    assert_eq!(buckets[0].range_start, 100.0);
    assert_eq!(buckets[0].range_end, 107.5);
    assert_eq!(buckets[1].range_start, 107.5);
    assert_eq!(buckets[1].range_end, 115.0);
    assert_eq!(buckets[0].range_center, 103.75);
}

#[test]
fn days_overlapping_a_bucket_all_contribute_volume() {
    let buckets = bin_price_ranges(&three_day_sample(), 2).expect("binning should succeed");

    // every day reaches into [100, 107.5]
    assert_eq!(buckets[0].total_volume, 4500);
    assert_eq!(buckets[0].days_count, 3);
    assert_eq!(buckets[0].avg_volume, 1500.0);
    assert_eq!(buckets[0].volume_density, 4500.0 / 7.5);

    // highs of 110, 115 and 108 all reach 107.5
    assert_eq!(buckets[1].total_volume, 4500);
    assert_eq!(buckets[1].days_count, 3);
}

#[test]
fn boundary_straddling_days_are_counted_in_each_bucket() {
    let bars = vec![
        bar(1, 100.0, 101.0, 10),
        bar(4, 109.0, 110.0, 20),
        bar(5, 104.0, 106.0, 30),
    ];
    let buckets = bin_price_ranges(&bars, 2).expect("binning should succeed");
    let total_days: u64 = buckets.iter().map(|x| x.days_count).sum();
    assert_eq!(total_days, 4, "the straddling day must appear in both buckets");
    assert_eq!(buckets[0].total_volume, 40);
    assert_eq!(buckets[1].total_volume, 50);
}

#[test]
fn buckets_span_exact_range_and_are_monotonic() {
    let bars = vec![
        bar(1, 101.3, 107.9, 500),
        bar(4, 99.7, 103.1, 700),
        bar(5, 102.2, 111.4, 900),
        bar(6, 104.0, 108.8, 300),
    ];
    for count in [1usize, 3, 7, 20] {
        let buckets = bin_price_ranges(&bars, count).expect("binning should succeed");
        assert_eq!(buckets.len(), count);
        assert_eq!(buckets.first().map(|x| x.range_start), Some(99.7));
        assert_eq!(buckets.last().map(|x| x.range_end), Some(111.4));
        for pair in buckets.windows(2) {
            assert!(pair[0].range_start <= pair[0].range_end);
            assert_eq!(pair[0].range_end, pair[1].range_start, "buckets must be contiguous");
        }
        let total_days: u64 = buckets.iter().map(|x| x.days_count).sum();
        assert!(total_days >= bars.len() as u64);
    }
}

#[test]
fn flat_price_range_yields_zero_density() {
    let bars = vec![bar(1, 50.0, 50.0, 100), bar(4, 50.0, 50.0, 300)];
    let buckets = bin_price_ranges(&bars, 4).expect("binning should succeed");
    assert_eq!(buckets.len(), 4);
    for bucket in &buckets {
        assert_eq!(bucket.volume_density, 0.0);
        assert!(bucket.volume_density.is_finite());
        assert_eq!(bucket.total_volume, 400);
        assert_eq!(bucket.avg_volume, 200.0);
    }
}

#[test]
fn empty_bucket_has_zero_average() {
    let bars = vec![bar(1, 100.0, 101.0, 10), bar(4, 109.0, 110.0, 20)];
    let buckets = bin_price_ranges(&bars, 5).expect("binning should succeed");
    let middle = &buckets[2];
    assert_eq!(middle.days_count, 0);
    assert_eq!(middle.total_volume, 0);
    assert_eq!(middle.avg_volume, 0.0);
}

#[test]
fn binning_rejects_empty_input_and_zero_buckets() {
    assert!(matches!(bin_price_ranges(&[], 5), Err(DataError::EmptyInput(_))));
    assert!(matches!(
        bin_price_ranges(&three_day_sample(), 0),
        Err(DataError::InvalidArgument(_))
    ));
}

#[test]
fn top_density_sorts_descending_and_keeps_tie_order() {
    let buckets = vec![
        bucket(0, 300),
        bucket(1, 900),
        bucket(2, 300),
        bucket(3, 900),
        bucket(4, 100),
    ];
    let top = top_density(&buckets, 4).expect("ranking should succeed");
    let order = top.iter().map(|x| x.index).collect::<Vec<_>>();
    assert_eq!(order, vec![1, 3, 0, 2]);
    for pair in top.windows(2) {
        assert!(pair[0].total_volume >= pair[1].total_volume);
    }
}

#[test]
fn top_density_length_is_bounded_by_bucket_count() {
    let buckets = vec![bucket(0, 5), bucket(1, 7)];
    assert_eq!(top_density(&buckets, 10).expect("ranking").len(), 2);
    assert_eq!(top_density(&buckets, 1).expect("ranking")[0].index, 1);
    assert!(matches!(top_density(&buckets, 0), Err(DataError::InvalidArgument(_))));
}

#[test]
fn concentration_ratio_is_bounded_and_guards_zero_volume() {
    let buckets = vec![bucket(0, 0), bucket(1, 0)];
    assert_eq!(concentration_ratio(&buckets, 3), 0.0);
    assert_eq!(concentration_ratio(&[], 3), 0.0);

    let buckets = vec![bucket(0, 10), bucket(1, 20), bucket(2, 30), bucket(3, 40)];
    let ratio = concentration_ratio(&buckets, 3);
    assert!((ratio - 90.0).abs() < 1e-9, "top three of 100 hold 90, got {ratio}");
    assert!((0.0..=100.0).contains(&ratio));
    assert_eq!(concentration_ratio(&buckets, 10), 100.0);
}
