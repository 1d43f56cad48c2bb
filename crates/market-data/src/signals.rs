use crate::error::DataError;
use crate::files::signal_file_name;
use crate::spreads::{malformed, open_reader};
use crate::timestamp::{format_timestamp, parse_timestamp};
use core_types::SignalInterval;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize)]
struct SignalRow {
    #[serde(rename = "Start")]
    start: String,
    #[serde(rename = "End")]
    end: String,
    #[serde(rename = "Duration")]
    duration: f64,
}

/// Writes `signal_durations_{window}.csv` into `dir` with `Start, End, Duration` columns.
///
/// Returns the path written. The header is written even when there are no intervals.
pub fn write_signal_intervals(
    dir: impl AsRef<Path>,
    rolling_mean_window: usize,
    intervals: &[SignalInterval],
) -> Result<PathBuf, DataError> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;
    let path = dir.join(signal_file_name(rolling_mean_window));

    let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(&path)?;
    writer.write_record(["Start", "End", "Duration"])?;
    for interval in intervals {
        writer.serialize(SignalRow {
            start: format_timestamp(&interval.start),
            end: format_timestamp(&interval.end),
            duration: interval.duration_seconds,
        })?;
    }
    writer.flush()?;

    tracing::info!(path = %path.display(), intervals = intervals.len(), "signal intervals saved");
    Ok(path)
}

/// Reads back a file written by [`write_signal_intervals`].
pub fn read_signal_intervals(path: impl AsRef<Path>) -> Result<Vec<SignalInterval>, DataError> {
    let path = path.as_ref();
    let mut reader = open_reader(path)?;

    let mut intervals = Vec::new();
    for (index, record) in reader.deserialize::<SignalRow>().enumerate() {
        let record = record.map_err(|e| malformed(path, index, e))?;
        let start = parse_timestamp(&record.start).map_err(|e| malformed(path, index, e))?;
        let end = parse_timestamp(&record.end).map_err(|e| malformed(path, index, e))?;
        if end < start {
            return Err(malformed(path, index, "interval ends before it starts"));
        }
        intervals.push(SignalInterval {
            start,
            end,
            duration_seconds: record.duration,
        });
    }
    Ok(intervals)
}
