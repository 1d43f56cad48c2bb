use crate::error::BacktestError;
use crate::{ProgressSink, drive};
use analytics::{AnalyticsEngine, SignalMetrics};
use configuration::{BaselineRule, DetectorParams};
use core_types::{SignalInterval, SpreadSeries};
use indicators::{rolling_mean, trailing_mean};
use strategies::SignalDetector;

/// Intervals found by one detection run, with their metrics.
#[derive(Debug, Clone)]
pub struct SignalRun {
    pub intervals: Vec<SignalInterval>,
    pub metrics: SignalMetrics,
}

/// Detects signal intervals for one `(window, threshold)` pair.
#[derive(Debug)]
pub struct SignalBacktest {
    params: DetectorParams,
    report_every: usize,
    analytics_engine: AnalyticsEngine,
}

impl SignalBacktest {
    pub fn new(params: DetectorParams, report_every: usize) -> Result<Self, BacktestError> {
        params.validate()?;
        Ok(Self {
            params,
            report_every: report_every.max(1),
            analytics_engine: AnalyticsEngine::new(),
        })
    }

    pub fn run(
        &self,
        series: &SpreadSeries,
        progress: Option<&mut dyn ProgressSink>,
    ) -> Result<SignalRun, BacktestError> {
        let window = self.params.rolling_mean_window;
        let mut detector = SignalDetector::new(&self.params)?;

        let spreads = series.spreads();
        let baseline = match self.params.baseline {
            BaselineRule::Rolling => rolling_mean(&spreads, window)?,
            BaselineRule::Trailing => trailing_mean(&spreads, window)?,
        };
        drop(spreads);
        if window > series.len() {
            tracing::warn!(window, len = series.len(), "window longer than series; no baseline");
        }

        let intervals = drive(&mut detector, series, &baseline, self.report_every, progress);
        drop(baseline);

        let metrics = self
            .analytics_engine
            .signal_metrics(window, self.params.threshold, &intervals)?;
        tracing::info!(
            window,
            threshold = self.params.threshold,
            intervals = intervals.len(),
            "signal detection finished"
        );
        Ok(SignalRun { intervals, metrics })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use configuration::CloseMode;
    use core_types::PricePoint;

    fn series(spreads: &[f64]) -> SpreadSeries {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let points = spreads
            .iter()
            .enumerate()
            .map(|(i, &s)| PricePoint::new(t0 + Duration::seconds(i as i64), s))
            .collect();
        SpreadSeries::new(points).unwrap()
    }

    #[test]
    fn zero_window_is_rejected() {
        let params = DetectorParams {
            rolling_mean_window: 0,
            ..DetectorParams::default()
        };
        assert!(matches!(
            SignalBacktest::new(params, 10),
            Err(BacktestError::Config(_))
        ));
    }

    #[test]
    fn window_longer_than_series_finds_nothing() {
        let backtest = SignalBacktest::new(
            DetectorParams {
                rolling_mean_window: 10,
                threshold: 0.0,
                close_mode: CloseMode::EveryStep,
                baseline: BaselineRule::Rolling,
            },
            1,
        )
        .unwrap();
        let run = backtest.run(&series(&[1.0, -1.0, 1.0]), None).unwrap();
        assert!(run.intervals.is_empty());
        assert_eq!(run.metrics.interval_count, 0);
        assert!(run.metrics.durations.mean.is_nan());
    }
}
