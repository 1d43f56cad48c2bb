use crate::error::DataError;
use crate::files::{merged_file_name, price_file_name};
use crate::spreads::{malformed, open_reader};
use crate::timestamp::{format_timestamp, parse_timestamp};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One row of a per-instrument price file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRow {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

/// Spot and future prices aligned on one timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergedRow {
    pub timestamp: DateTime<Utc>,
    pub spot: f64,
    pub future: f64,
}

#[derive(Debug, Deserialize)]
struct PriceRecord {
    timestamp: String,
    weighted_avg_price: f64,
}

#[derive(Debug, Serialize)]
struct MergedCsvRow {
    timestamp: String,
    weighted_avg_price_spot: f64,
    weighted_avg_price_future: f64,
}

/// Reads a `timestamp, weighted_avg_price, ...` file.
pub fn read_price_csv(path: impl AsRef<Path>) -> Result<Vec<PriceRow>, DataError> {
    let path = path.as_ref();
    let mut reader = open_reader(path)?;

    let mut rows = Vec::new();
    for (index, record) in reader.deserialize::<PriceRecord>().enumerate() {
        let record = record.map_err(|e| malformed(path, index, e))?;
        let timestamp = parse_timestamp(&record.timestamp).map_err(|e| malformed(path, index, e))?;
        if !record.weighted_avg_price.is_finite() {
            return Err(DataError::InvalidPrice {
                path: path.to_path_buf(),
                index,
                price: record.weighted_avg_price,
            });
        }
        rows.push(PriceRow {
            timestamp,
            price: record.weighted_avg_price,
        });
    }
    Ok(rows)
}

/// Outer-joins spot and future prices on timestamp.
///
/// The result is sorted by timestamp. A side missing at some timestamp takes
/// its most recent earlier price (forward fill); leading gaps take the first
/// price of that side (backward fill). When one side has several rows with
/// the same timestamp, the last one wins.
pub fn merge_prices(spot: &[PriceRow], future: &[PriceRow]) -> Result<Vec<MergedRow>, DataError> {
    let mut joined: BTreeMap<DateTime<Utc>, (Option<f64>, Option<f64>)> = BTreeMap::new();
    for row in spot {
        joined.entry(row.timestamp).or_default().0 = Some(row.price);
    }
    for row in future {
        joined.entry(row.timestamp).or_default().1 = Some(row.price);
    }

    let first_spot = joined.values().find_map(|(s, _)| *s);
    let first_future = joined.values().find_map(|(_, f)| *f);
    let (Some(mut last_spot), Some(mut last_future)) = (first_spot, first_future) else {
        return Err(DataError::EmptyInput(format!(
            "{} spot rows and {} future rows",
            spot.len(),
            future.len()
        )));
    };

    let merged = joined
        .into_iter()
        .map(|(timestamp, (s, f))| {
            last_spot = s.unwrap_or(last_spot);
            last_future = f.unwrap_or(last_future);
            MergedRow {
                timestamp,
                spot: last_spot,
                future: last_future,
            }
        })
        .collect();
    Ok(merged)
}

/// Writes merged rows with the column names the spread calculation expects.
pub fn write_merged_csv(path: impl AsRef<Path>, rows: &[MergedRow]) -> Result<(), DataError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(MergedCsvRow {
            timestamp: format_timestamp(&row.timestamp),
            weighted_avg_price_spot: row.spot,
            weighted_avg_price_future: row.future,
        })?;
    }
    writer.flush()?;
    Ok(())
}

/// Merges the monthly spot and future price files of one pair into the
/// merged-file layout.
#[derive(Debug, Clone)]
pub struct MonthlyMerge {
    pub spot_dir: PathBuf,
    pub future_dir: PathBuf,
    pub merged_dir: PathBuf,
    pub spot: String,
    pub future: String,
}

impl MonthlyMerge {
    /// Merges one month and returns the path of the written file.
    ///
    /// Fails with `DataError::MissingFile` when either price file is absent.
    pub fn merge(&self, year: i32, month: u32) -> Result<PathBuf, DataError> {
        let spot_path = self.spot_dir.join(price_file_name(&self.spot, year, month));
        let future_path = self.future_dir.join(price_file_name(&self.future, year, month));
        for path in [&spot_path, &future_path] {
            if !path.is_file() {
                return Err(DataError::MissingFile(path.clone()));
            }
        }

        let spot_rows = read_price_csv(&spot_path)?;
        let future_rows = read_price_csv(&future_path)?;
        tracing::info!(spot = %spot_path.display(), future = %future_path.display(), "price files read");

        let merged = merge_prices(&spot_rows, &future_rows)?;
        drop((spot_rows, future_rows));

        let output = self
            .merged_dir
            .join(merged_file_name(&self.spot, &self.future, year, month));
        write_merged_csv(&output, &merged)?;
        tracing::info!(path = %output.display(), rows = merged.len(), "merged file saved");
        Ok(output)
    }
}
