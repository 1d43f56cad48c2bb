use serde::Serialize;

/// Distribution of a sample of durations, in seconds.
///
/// Every field is `NaN` for an empty sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DurationStatistics {
    #[serde(skip)]
    pub count: usize,
    #[serde(rename = "Mean Duration (seconds)")]
    pub mean: f64,
    #[serde(rename = "Median Duration (seconds)")]
    pub median: f64,
    /// Population standard deviation (divides by `n`).
    #[serde(rename = "Standard Deviation")]
    pub std_dev: f64,
    #[serde(rename = "Max Duration (seconds)")]
    pub max: f64,
    #[serde(rename = "Min Duration (seconds)")]
    pub min: f64,
}

/// Interval counts by duration range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DurationBuckets {
    /// Intervals opened and closed within the same second (recorded as 0.5 s).
    #[serde(rename = "Trades within 1 sec")]
    pub within_1_sec: usize,
    /// Intervals of exactly one second.
    #[serde(rename = "Trades in 1 sec")]
    pub in_1_sec: usize,
    /// Intervals between 2 and 5 seconds, both ends included.
    #[serde(rename = "Trades in 2-5 secs")]
    pub in_2_to_5_secs: usize,
    /// Intervals of at most 10 seconds, sub-second ones included.
    #[serde(rename = "Trades within 10 secs")]
    pub within_10_secs: usize,
}

/// Summary of one signal-detection run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SignalMetrics {
    #[serde(rename = "Rolling Mean Window")]
    pub rolling_mean_window: usize,
    #[serde(rename = "Spread Threshold")]
    pub threshold: f64,
    #[serde(rename = "Trade Count")]
    pub interval_count: usize,
    #[serde(flatten)]
    pub durations: DurationStatistics,
    #[serde(flatten)]
    pub buckets: DurationBuckets,
}

/// Summary of a set of intervals without the run parameters that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IntervalSummary {
    #[serde(rename = "Trade Count")]
    pub interval_count: usize,
    #[serde(flatten)]
    pub durations: DurationStatistics,
    #[serde(flatten)]
    pub buckets: DurationBuckets,
}

/// Summary of one trade-simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TradeMetrics {
    #[serde(rename = "Rolling Mean Window")]
    pub rolling_mean_window: usize,
    #[serde(rename = "Spread Threshold")]
    pub threshold: f64,
    #[serde(rename = "Trade Count")]
    pub trade_count: usize,
    /// `0` when no trade completed, unlike the `NaN` statistics below.
    #[serde(rename = "Average Trade Duration (seconds)")]
    pub average_duration: f64,
    #[serde(flatten)]
    pub durations: DurationStatistics,
}

/// Descriptive statistics of the raw spread column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpreadSummary {
    pub mean_spread: f64,
    pub median_spread: f64,
    pub std_spread: f64,
    pub min_spread: f64,
    pub max_spread: f64,
    /// `mean ± 2 * std`.
    pub two_sigma_range: (f64, f64),
    pub total_count: usize,
}
