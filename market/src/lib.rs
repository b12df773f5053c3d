//! `market` crate entry.
//!
//! Ingestion adapters that feed daily bars into the `density` pipeline.
//! - `provider`: the `BarProvider` trait.
//! - `csv_dir`: one CSV file per symbol in a directory.
//! - `memory`: in-memory series.
//!
//! ```rust
//! use chrono::NaiveDate;
//! use density::DailyBar;
//! use market::{BarProvider, MemoryBarProvider};
//!
//! let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
//! let mut provider = MemoryBarProvider::new();
//! provider.insert("005930", vec![DailyBar {
//!     date: day,
//!     open: 70_000.0,
//!     high: 71_000.0,
//!     low: 69_500.0,
//!     close: 70_500.0,
//!     volume: 1_000_000,
//! }]);
//! let bars = provider.fetch("005930", day, day).unwrap();
//! assert_eq!(bars.len(), 1);
//! ```

mod csv_dir;
mod memory;
mod provider;

pub use csv_dir::CsvBarProvider;
pub use memory::MemoryBarProvider;
pub use provider::BarProvider;
