//! File naming conventions of the data directories.

use crate::error::DataError;
use std::path::{Path, PathBuf};

/// `processed_{instrument}-aggTrades-{YYYY}-{MM}.csv`
pub fn price_file_name(instrument: &str, year: i32, month: u32) -> String {
    format!("processed_{instrument}-aggTrades-{year}-{month:02}.csv")
}

/// `{spot}-{future}-{YYYY}-{MM}.csv`
pub fn merged_file_name(spot: &str, future: &str, year: i32, month: u32) -> String {
    format!("{spot}-{future}-{year}-{month:02}.csv")
}

/// `spreads_{spot}_{future}.csv`
pub fn spread_file_name(spot: &str, future: &str) -> String {
    format!("spreads_{spot}_{future}.csv")
}

/// `signal_durations_{window}.csv`
pub fn signal_file_name(rolling_mean_window: usize) -> String {
    format!("signal_durations_{rolling_mean_window}.csv")
}

/// Lists the merged monthly files of one spot/future pair, sorted by name
/// (and therefore by year and month).
pub fn discover_merged_files(dir: &Path, spot: &str, future: &str) -> Result<Vec<PathBuf>, DataError> {
    if !dir.is_dir() {
        return Err(DataError::MissingFile(dir.to_path_buf()));
    }

    let prefix = format!("{spot}-{future}-");
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.strip_prefix(prefix.as_str()))
            .is_some_and(is_year_month_csv);
        if matches && path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(DataError::NoInputFiles {
            dir: dir.to_path_buf(),
            pattern: format!("{prefix}YYYY-MM.csv"),
        });
    }
    Ok(files)
}

/// `YYYY-MM.csv`
fn is_year_month_csv(rest: &str) -> bool {
    let bytes = rest.as_bytes();
    bytes.len() == 11
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[4] == b'-'
        && bytes[5..7].iter().all(u8::is_ascii_digit)
        && &rest[7..] == ".csv"
}
