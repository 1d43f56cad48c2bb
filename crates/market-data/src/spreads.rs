use crate::error::DataError;
use crate::files::discover_merged_files;
use crate::timestamp::{format_timestamp, parse_timestamp};
use core_types::{PricePoint, SpreadSeries};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Deserialize)]
struct SpreadRecord {
    timestamp: String,
    spread: f64,
}

#[derive(Debug, Serialize)]
struct SpreadRow {
    timestamp: String,
    spread: f64,
}

/// A merged row; any further columns in the file are ignored.
#[derive(Debug, Deserialize)]
struct MergedRecord {
    timestamp: String,
    weighted_avg_price_spot: f64,
    weighted_avg_price_future: f64,
}

/// Relative basis of a future over its spot: `(future - spot) / spot`.
///
/// `None` when the spot price is not a positive finite number or the future
/// price is not finite.
pub fn spread_of(spot: f64, future: f64) -> Option<f64> {
    if !spot.is_finite() || spot <= 0.0 || !future.is_finite() {
        return None;
    }
    Some((future - spot) / spot)
}

pub(crate) fn open_reader(path: &Path) -> Result<csv::Reader<std::fs::File>, DataError> {
    if !path.is_file() {
        return Err(DataError::MissingFile(path.to_path_buf()));
    }
    Ok(csv::Reader::from_path(path)?)
}

pub(crate) fn malformed(path: &Path, index: usize, reason: impl ToString) -> DataError {
    DataError::MalformedRecord {
        path: path.to_path_buf(),
        index,
        reason: reason.to_string(),
    }
}

/// Reads a `timestamp, spread` file into a validated series.
///
/// The file must already be time-ordered; an out-of-order or non-finite row
/// aborts the load with its record index.
pub fn read_spread_csv(path: impl AsRef<Path>) -> Result<SpreadSeries, DataError> {
    let path = path.as_ref();
    let mut reader = open_reader(path)?;

    let mut points = Vec::new();
    for (index, record) in reader.deserialize::<SpreadRecord>().enumerate() {
        let record = record.map_err(|e| malformed(path, index, e))?;
        let timestamp = parse_timestamp(&record.timestamp).map_err(|e| malformed(path, index, e))?;
        points.push(PricePoint::new(timestamp, record.spread));
    }

    tracing::info!(path = %path.display(), records = points.len(), "spread file loaded");
    SpreadSeries::new(points).map_err(|source| DataError::InvalidSeries {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes a series as a `timestamp, spread` file, creating parent directories.
pub fn write_spread_csv(path: impl AsRef<Path>, series: &SpreadSeries) -> Result<(), DataError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    for point in series.points() {
        writer.serialize(SpreadRow {
            timestamp: format_timestamp(&point.timestamp),
            spread: point.spread,
        })?;
    }
    writer.flush()?;

    tracing::info!(path = %path.display(), records = series.len(), "spread file saved");
    Ok(())
}

/// Reads one merged spot/future file and computes the spread of every row.
///
/// Rows keep their file order; they are not validated for ordering here
/// because several monthly files are concatenated and sorted afterwards.
pub fn read_merged_csv(path: impl AsRef<Path>) -> Result<Vec<PricePoint>, DataError> {
    let path = path.as_ref();
    let mut reader = open_reader(path)?;

    let mut points = Vec::new();
    for (index, record) in reader.deserialize::<MergedRecord>().enumerate() {
        let record = record.map_err(|e| malformed(path, index, e))?;
        let timestamp = parse_timestamp(&record.timestamp).map_err(|e| malformed(path, index, e))?;
        let (spot, future) = (record.weighted_avg_price_spot, record.weighted_avg_price_future);
        let spread = spread_of(spot, future).ok_or_else(|| DataError::InvalidPrice {
            path: path.to_path_buf(),
            index,
            price: if spot.is_finite() && spot > 0.0 { future } else { spot },
        })?;
        points.push(PricePoint::new(timestamp, spread));
    }
    Ok(points)
}

/// Computes the spread series of one spot/future pair from all of its merged
/// monthly files in `merged_dir`, sorted by timestamp.
pub fn calculate_spreads(merged_dir: impl AsRef<Path>, spot: &str, future: &str) -> Result<SpreadSeries, DataError> {
    let merged_dir = merged_dir.as_ref();
    let files = discover_merged_files(merged_dir, spot, future)?;

    let mut points = Vec::new();
    for file in &files {
        tracing::info!(file = %file.display(), "processing merged file");
        points.extend(read_merged_csv(file)?);
    }

    let series = SpreadSeries::from_unsorted(points).map_err(|source| DataError::InvalidSeries {
        path: merged_dir.to_path_buf(),
        source,
    })?;
    tracing::info!(spot, future, files = files.len(), records = series.len(), "spreads calculated");
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn spread_is_relative_to_spot() {
        assert_relative_eq!(spread_of(100.0, 101.0).unwrap(), 0.01);
        assert_relative_eq!(spread_of(200.0, 199.0).unwrap(), -0.005);
        assert_eq!(spread_of(0.0, 1.0), None);
        assert_eq!(spread_of(-1.0, 1.0), None);
        assert_eq!(spread_of(1.0, f64::NAN), None);
    }

    #[test]
    fn missing_spread_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_spread_csv(dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, DataError::MissingFile(_)));
    }

    #[test]
    fn non_numeric_spread_names_the_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spreads.csv");
        std::fs::write(
            &path,
            "timestamp,spread\n2024-01-01 00:00:00,0.1\n2024-01-01 00:00:01,abc\n",
        )
        .unwrap();

        let err = read_spread_csv(&path).unwrap_err();
        assert!(matches!(err, DataError::MalformedRecord { index: 1, .. }));
    }

    #[test]
    fn malformed_timestamp_names_the_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spreads.csv");
        std::fs::write(
            &path,
            "timestamp,spread\n2024-01-01 00:00:00,0.1\n2024-01-01 00:00:01,0.2\nlater,0.3\n",
        )
        .unwrap();

        let err = read_spread_csv(&path).unwrap_err();
        assert!(matches!(err, DataError::MalformedRecord { index: 2, .. }));
    }

    #[test]
    fn out_of_order_rows_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spreads.csv");
        std::fs::write(
            &path,
            "timestamp,spread\n2024-01-01 00:00:05,0.1\n2024-01-01 00:00:01,0.2\n",
        )
        .unwrap();

        let err = read_spread_csv(&path).unwrap_err();
        assert!(matches!(
            err,
            DataError::InvalidSeries {
                source: core_types::CoreError::OutOfOrder { index: 1, .. },
                ..
            }
        ));
    }

    #[test]
    fn zero_spot_price_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("BTC-PERP-2024-01.csv");
        std::fs::write(
            &path,
            "timestamp,weighted_avg_price_spot,weighted_avg_price_future\n2024-01-01 00:00:00,0,1\n",
        )
        .unwrap();

        let err = read_merged_csv(&path).unwrap_err();
        assert!(matches!(err, DataError::InvalidPrice { index: 0, .. }));
    }

    #[test]
    fn unusable_future_price_is_the_one_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("BTC-PERP-2024-01.csv");
        std::fs::write(
            &path,
            "timestamp,weighted_avg_price_spot,weighted_avg_price_future\n\
             2024-01-01 00:00:00,100,101\n\
             2024-01-01 00:00:01,100,inf\n",
        )
        .unwrap();

        match read_merged_csv(&path).unwrap_err() {
            DataError::InvalidPrice { index, price, .. } => {
                assert_eq!(index, 1);
                assert!(price.is_infinite());
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
