use crate::enums::PositionSide;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Duration recorded for an interval that opens and closes within the same second.
pub const SUB_SECOND_DURATION: f64 = 0.5;

/// Floor applied to an interval that is still open when the series ends.
pub const MIN_FORCED_CLOSE_SECONDS: i64 = 1;

/// One observation of the spot/future spread, `(future - spot) / spot`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub spread: f64,
}

impl PricePoint {
    pub fn new(timestamp: DateTime<Utc>, spread: f64) -> Self {
        Self { timestamp, spread }
    }
}

/// One contiguous excursion of the spread outside its threshold band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_seconds: f64,
}

impl SignalInterval {
    /// An interval closed while the series is still running.
    ///
    /// The duration is counted in whole elapsed seconds; anything shorter than
    /// one second is recorded as [`SUB_SECOND_DURATION`].
    pub fn closed(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        let whole_seconds = (end - start).num_seconds() as f64;
        let duration_seconds = if whole_seconds < 1.0 {
            SUB_SECOND_DURATION
        } else {
            whole_seconds
        };
        Self {
            start,
            end,
            duration_seconds,
        }
    }

    /// An interval force-closed at the last observation of the series.
    ///
    /// Unlike [`SignalInterval::closed`], the floor here is one full second.
    pub fn closed_at_end(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        let whole_seconds = (end - start).num_seconds().max(MIN_FORCED_CLOSE_SECONDS);
        Self {
            start,
            end,
            duration_seconds: whole_seconds as f64,
        }
    }
}

/// A completed round trip: a position entered at `entry_time` and closed at `exit_time`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub entry_time: DateTime<Utc>,
    pub exit_time: DateTime<Utc>,
    pub side_entered: PositionSide,
}

impl Trade {
    /// Holding time in fractional seconds.
    pub fn duration_seconds(&self) -> f64 {
        let held = self.exit_time - self.entry_time;
        match held.num_microseconds() {
            Some(micros) => micros as f64 / 1_000_000.0,
            None => held.num_milliseconds() as f64 / 1_000.0,
        }
    }
}
