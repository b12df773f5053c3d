//! Tabular export of bucket and level rows.
//!
//! Bucket columns and their order are an external contract for downstream
//! consumers: `range_start, range_end, range_center, total_volume,
//! days_count, avg_volume, volume_density`.

use std::fs::File;
use std::path::Path;

use polars::df;
use polars::prelude::{DataFrame, ParquetWriter};
use serde::Serialize;

use crate::constant::DataError;
use crate::levels::SupportResistance;
use crate::profile::PriceBucket;

pub const BUCKET_COLUMNS: [&str; 7] = [
    "range_start",
    "range_end",
    "range_center",
    "total_volume",
    "days_count",
    "avg_volume",
    "volume_density",
];

#[derive(Debug, Clone, Serialize)]
pub struct BucketRow {
    pub range_start: f64,
    pub range_end: f64,
    pub range_center: f64,
    pub total_volume: u64,
    pub days_count: u64,
    pub avg_volume: f64,
    pub volume_density: f64,
}

impl From<&PriceBucket> for BucketRow {
    fn from(value: &PriceBucket) -> Self {
        Self {
            range_start: value.range_start,
            range_end: value.range_end,
            range_center: value.range_center,
            total_volume: value.total_volume,
            days_count: value.days_count,
            avg_volume: value.avg_volume,
            volume_density: value.volume_density,
        }
    }
}

pub fn write_buckets_csv(
    path: impl AsRef<Path>,
    buckets: &[PriceBucket],
) -> Result<(), DataError> {
    let mut writer = csv::Writer::from_path(path)?;
    write_bucket_rows(&mut writer, buckets)?;
    writer.flush()?;
    Ok(())
}

pub fn buckets_csv_string(buckets: &[PriceBucket]) -> Result<String, DataError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    write_bucket_rows(&mut writer, buckets)?;
    let bytes = writer
        .into_inner()
        .map_err(|e| DataError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| DataError::InvalidArgument(e.to_string()))
}

fn write_bucket_rows<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    buckets: &[PriceBucket],
) -> Result<(), DataError> {
    if buckets.is_empty() {
        writer.write_record(BUCKET_COLUMNS)?;
        return Ok(());
    }
    for bucket in buckets {
        writer.serialize(BucketRow::from(bucket))?;
    }
    Ok(())
}

pub fn buckets_dataframe(buckets: &[PriceBucket]) -> Result<DataFrame, DataError> {
    let frame = df!(
        "range_start" => buckets.iter().map(|x| x.range_start).collect::<Vec<_>>(),
        "range_end" => buckets.iter().map(|x| x.range_end).collect::<Vec<_>>(),
        "range_center" => buckets.iter().map(|x| x.range_center).collect::<Vec<_>>(),
        "total_volume" => buckets.iter().map(|x| x.total_volume).collect::<Vec<_>>(),
        "days_count" => buckets.iter().map(|x| x.days_count).collect::<Vec<_>>(),
        "avg_volume" => buckets.iter().map(|x| x.avg_volume).collect::<Vec<_>>(),
        "volume_density" => buckets.iter().map(|x| x.volume_density).collect::<Vec<_>>()
    )?;
    Ok(frame)
}

pub fn write_buckets_parquet(
    path: impl AsRef<Path>,
    buckets: &[PriceBucket],
) -> Result<(), DataError> {
    let mut frame = buckets_dataframe(buckets)?;
    let mut file = File::create(path)?;
    ParquetWriter::new(&mut file).finish(&mut frame)?;
    Ok(())
}

pub fn levels_dataframe(levels: &SupportResistance) -> Result<DataFrame, DataError> {
    let rows = levels.levels().collect::<Vec<_>>();
    let frame = df!(
        "kind" => rows.iter().map(|(kind, _)| kind.as_str()).collect::<Vec<_>>(),
        "price" => rows.iter().map(|(_, x)| x.price).collect::<Vec<_>>(),
        "touches" => rows.iter().map(|(_, x)| x.touches).collect::<Vec<_>>()
    )?;
    Ok(frame)
}
