use crate::error::BacktestError;
use crate::{ProgressSink, drive};
use analytics::{AnalyticsEngine, TradeMetrics};
use configuration::SimulatorParams;
use core_types::{SpreadSeries, Trade};
use indicators::trailing_mean;
use strategies::TradeSimulator;

/// Trades completed by one simulation run, with their metrics.
#[derive(Debug, Clone)]
pub struct TradeRun {
    pub trades: Vec<Trade>,
    /// Positions opened, including one left open at the end.
    pub entries: usize,
    pub metrics: TradeMetrics,
}

/// Simulates the long/short reversal strategy for one parameter set.
///
/// The band centre is the mean of the `mean_n` spreads before each observation.
#[derive(Debug)]
pub struct TradeBacktest {
    params: SimulatorParams,
    report_every: usize,
    analytics_engine: AnalyticsEngine,
}

impl TradeBacktest {
    pub fn new(params: SimulatorParams, report_every: usize) -> Result<Self, BacktestError> {
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
    ) -> Result<TradeRun, BacktestError> {
        let mut simulator = TradeSimulator::new(&self.params)?;
        if series.len() <= self.params.warmup_ticks.saturating_add(1) {
            tracing::warn!(
                warmup_ticks = self.params.warmup_ticks,
                len = series.len(),
                "series ends inside the warm-up period; no trades possible"
            );
        }

        let baseline = trailing_mean(&series.spreads(), self.params.mean_n)?;
        let trades = drive(&mut simulator, series, &baseline, self.report_every, progress);
        drop(baseline);

        let metrics = self.analytics_engine.trade_metrics(
            self.params.rolling_mean_window,
            self.params.threshold,
            &trades,
        )?;
        tracing::info!(
            mean_n = self.params.mean_n,
            threshold = self.params.threshold,
            entries = simulator.entries(),
            trades = trades.len(),
            "trade simulation finished"
        );
        Ok(TradeRun {
            trades,
            entries: simulator.entries(),
            metrics,
        })
    }
}
