//! # Market Data Files
//!
//! Everything that touches the CSV files on disk: per-instrument price files,
//! the merged spot/future files, the spread series and the signal interval
//! output. Pure file I/O plus the spread formula; no strategy logic lives here.

pub mod error;
pub mod files;
pub mod merge;
pub mod signals;
pub mod spreads;
pub mod timestamp;

pub use error::DataError;
pub use files::{discover_merged_files, merged_file_name, price_file_name, signal_file_name, spread_file_name};
pub use merge::{MergedRow, MonthlyMerge, PriceRow, merge_prices, read_price_csv, write_merged_csv};
pub use signals::{read_signal_intervals, write_signal_intervals};
pub use spreads::{calculate_spreads, read_merged_csv, read_spread_csv, spread_of, write_spread_csv};
pub use timestamp::{format_timestamp, parse_timestamp};
