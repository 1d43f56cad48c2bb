use crate::error::AnalyticsError;
use crate::report::{
    DurationBuckets, DurationStatistics, IntervalSummary, SignalMetrics, SpreadSummary, TradeMetrics,
};
use core_types::{SignalInterval, Trade};
use statrs::statistics::{Data, Median, Statistics};

/// A stateless calculator for deriving summary metrics from strategy output.
#[derive(Debug, Default)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Describes a sample of durations in seconds.
    ///
    /// # Returns
    ///
    /// `NaN` statistics for an empty sample, or an `AnalyticsError` naming the
    /// first duration that is negative or not finite.
    pub fn duration_statistics(&self, durations: &[f64]) -> Result<DurationStatistics, AnalyticsError> {
        if let Some((index, &value)) = durations
            .iter()
            .enumerate()
            .find(|(_, d)| !d.is_finite() || **d < 0.0)
        {
            return Err(AnalyticsError::InvalidDuration { index, value });
        }

        Ok(DurationStatistics {
            count: durations.len(),
            mean: durations.iter().mean(),
            median: median(durations),
            std_dev: durations.iter().population_std_dev(),
            max: Statistics::max(durations.iter()),
            min: Statistics::min(durations.iter()),
        })
    }

    /// Summarises the intervals of one detection run.
    pub fn signal_metrics(
        &self,
        rolling_mean_window: usize,
        threshold: f64,
        intervals: &[SignalInterval],
    ) -> Result<SignalMetrics, AnalyticsError> {
        let durations: Vec<f64> = intervals.iter().map(|i| i.duration_seconds).collect();
        let statistics = self.duration_statistics(&durations)?;

        let metrics = SignalMetrics {
            rolling_mean_window,
            threshold,
            interval_count: durations.len(),
            durations: statistics,
            buckets: self.duration_buckets(&durations),
        };
        tracing::debug!(
            rolling_mean_window,
            threshold,
            intervals = metrics.interval_count,
            mean = metrics.durations.mean,
            median = metrics.durations.median,
            "signal metrics calculated"
        );
        Ok(metrics)
    }

    /// Summarises the completed trades of one simulation run.
    pub fn trade_metrics(
        &self,
        rolling_mean_window: usize,
        threshold: f64,
        trades: &[Trade],
    ) -> Result<TradeMetrics, AnalyticsError> {
        let durations: Vec<f64> = trades.iter().map(Trade::duration_seconds).collect();
        let statistics = self.duration_statistics(&durations)?;

        let average_duration = if durations.is_empty() {
            0.0
        } else {
            durations.iter().sum::<f64>() / durations.len() as f64
        };

        let metrics = TradeMetrics {
            rolling_mean_window,
            threshold,
            trade_count: trades.len(),
            average_duration,
            durations: statistics,
        };
        tracing::debug!(
            rolling_mean_window,
            threshold,
            trades = metrics.trade_count,
            average_duration,
            std_dev = metrics.durations.std_dev,
            "trade metrics calculated"
        );
        Ok(metrics)
    }

    /// Describes the spread column itself.
    pub fn spread_summary(&self, spreads: &[f64]) -> Result<SpreadSummary, AnalyticsError> {
        if let Some((index, &value)) = spreads.iter().enumerate().find(|(_, s)| !s.is_finite()) {
            return Err(AnalyticsError::InvalidSpread { index, value });
        }

        let mean = spreads.iter().mean();
        let std = spreads.iter().population_std_dev();
        Ok(SpreadSummary {
            mean_spread: mean,
            median_spread: median(spreads),
            std_spread: std,
            min_spread: Statistics::min(spreads.iter()),
            max_spread: Statistics::max(spreads.iter()),
            two_sigma_range: (mean - 2.0 * std, mean + 2.0 * std),
            total_count: spreads.len(),
        })
    }

    /// Counts interval durations by range. The ranges overlap: a 0.5 s interval
    /// also counts towards `within_10_secs`.
    pub fn duration_buckets(&self, durations: &[f64]) -> DurationBuckets {
        let mut buckets = DurationBuckets::default();
        for &d in durations {
            if d == 0.5 {
                buckets.within_1_sec += 1;
            }
            if d == 1.0 {
                buckets.in_1_sec += 1;
            }
            if (2.0..=5.0).contains(&d) {
                buckets.in_2_to_5_secs += 1;
            }
            if d <= 10.0 {
                buckets.within_10_secs += 1;
            }
        }
        buckets
    }

    /// Summarises intervals read back from a file, whose window and threshold
    /// are not known.
    pub fn interval_summary(&self, intervals: &[SignalInterval]) -> Result<IntervalSummary, AnalyticsError> {
        let durations: Vec<f64> = intervals.iter().map(|i| i.duration_seconds).collect();
        Ok(IntervalSummary {
            interval_count: durations.len(),
            durations: self.duration_statistics(&durations)?,
            buckets: self.duration_buckets(&durations),
        })
    }
}

fn median(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return f64::NAN;
    }
    Data::new(samples.to_vec()).median()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use core_types::PositionSide;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()
    }

    fn interval(duration_seconds: f64) -> SignalInterval {
        SignalInterval {
            start: t0(),
            end: t0() + Duration::milliseconds((duration_seconds * 1000.0) as i64),
            duration_seconds,
        }
    }

    fn trade(entry: i64, exit: i64) -> Trade {
        Trade {
            entry_time: t0() + Duration::seconds(entry),
            exit_time: t0() + Duration::seconds(exit),
            side_entered: PositionSide::Long,
        }
    }

    #[test]
    fn empty_durations_give_nan_not_error() {
        let stats = AnalyticsEngine::new().duration_statistics(&[]).unwrap();
        assert_eq!(stats.count, 0);
        assert!(stats.mean.is_nan());
        assert!(stats.median.is_nan());
        assert!(stats.std_dev.is_nan());
        assert!(stats.min.is_nan());
        assert!(stats.max.is_nan());
    }

    #[test]
    fn statistics_match_population_definitions() {
        let stats = AnalyticsEngine::new()
            .duration_statistics(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0])
            .unwrap();
        assert_relative_eq!(stats.mean, 5.0);
        assert_relative_eq!(stats.median, 4.5);
        assert_relative_eq!(stats.std_dev, 2.0);
        assert_relative_eq!(stats.min, 2.0);
        assert_relative_eq!(stats.max, 9.0);
    }

    #[test]
    fn odd_sample_median_is_middle_value() {
        let stats = AnalyticsEngine::new().duration_statistics(&[9.0, 0.5, 3.0]).unwrap();
        assert_relative_eq!(stats.median, 3.0);
    }

    #[test]
    fn negative_duration_is_rejected_with_index() {
        let err = AnalyticsEngine::new()
            .duration_statistics(&[1.0, -3.0])
            .unwrap_err();
        assert_eq!(err, AnalyticsError::InvalidDuration { index: 1, value: -3.0 });
    }

    #[test]
    fn signal_buckets() {
        let intervals: Vec<_> = [0.5, 0.5, 1.0, 2.0, 5.0, 6.0, 10.0, 11.0]
            .into_iter()
            .map(interval)
            .collect();
        let metrics = AnalyticsEngine::new().signal_metrics(60, 0.001, &intervals).unwrap();

        assert_eq!(metrics.interval_count, 8);
        assert_eq!(metrics.rolling_mean_window, 60);
        assert_eq!(metrics.buckets.within_1_sec, 2);
        assert_eq!(metrics.buckets.in_1_sec, 1);
        assert_eq!(metrics.buckets.in_2_to_5_secs, 2);
        assert_eq!(metrics.buckets.within_10_secs, 7);
    }

    #[test]
    fn interval_file_summary_carries_buckets() {
        let intervals: Vec<_> = [0.5, 1.0, 3.0, 12.0].into_iter().map(interval).collect();
        let summary = AnalyticsEngine::new().interval_summary(&intervals).unwrap();

        assert_eq!(summary.interval_count, 4);
        assert_relative_eq!(summary.durations.max, 12.0);
        assert_eq!(summary.buckets.within_1_sec, 1);
        assert_eq!(summary.buckets.in_1_sec, 1);
        assert_eq!(summary.buckets.in_2_to_5_secs, 1);
        assert_eq!(summary.buckets.within_10_secs, 3);

        let json = serde_json::to_value(summary).unwrap();
        assert_eq!(json["Trades within 1 sec"], 1);
        assert_eq!(json["Trade Count"], 4);
    }

    #[test]
    fn trade_average_is_zero_without_trades() {
        let metrics = AnalyticsEngine::new().trade_metrics(180, 0.001, &[]).unwrap();
        assert_eq!(metrics.trade_count, 0);
        assert_eq!(metrics.average_duration, 0.0);
        assert!(metrics.durations.mean.is_nan());
    }

    #[test]
    fn trade_average_duration() {
        let trades = vec![trade(0, 10), trade(10, 40)];
        let metrics = AnalyticsEngine::new().trade_metrics(180, 0.001, &trades).unwrap();
        assert_eq!(metrics.trade_count, 2);
        assert_relative_eq!(metrics.average_duration, 20.0);
        assert_relative_eq!(metrics.durations.max, 30.0);
    }

    #[test]
    fn spread_summary_two_sigma_band() {
        let summary = AnalyticsEngine::new()
            .spread_summary(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0])
            .unwrap();
        assert_eq!(summary.total_count, 8);
        assert_relative_eq!(summary.two_sigma_range.0, 1.0);
        assert_relative_eq!(summary.two_sigma_range.1, 9.0);
    }

    #[test]
    fn metrics_serialize_with_fixed_keys() {
        let metrics = AnalyticsEngine::new()
            .signal_metrics(30, 0.5, &[interval(1.0)])
            .unwrap();
        let json = serde_json::to_value(metrics).unwrap();
        assert_eq!(json["Rolling Mean Window"], 30);
        assert_eq!(json["Trade Count"], 1);
        assert_eq!(json["Trades in 1 sec"], 1);
        assert_eq!(json["Mean Duration (seconds)"], 1.0);
    }

    #[test]
    fn empty_metrics_serialize_nan_as_null() {
        let metrics = AnalyticsEngine::new().signal_metrics(30, 0.5, &[]).unwrap();
        let json = serde_json::to_value(metrics).unwrap();
        assert!(json["Mean Duration (seconds)"].is_null());
        assert_eq!(json["Trade Count"], 0);
    }
}
