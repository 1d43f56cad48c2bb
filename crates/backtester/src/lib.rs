//! # Backtester
//!
//! Runs one parameter set over one spread series: baseline, state machine,
//! then metrics. Parallel fan-out over many parameter sets is the caller's job;
//! every run here is single-threaded and owns its outputs.

use core_types::SpreadSeries;
use strategies::SpreadStrategy;

pub mod error;
pub mod signal_backtest;
pub mod trade_backtest;

pub use error::BacktestError;
pub use signal_backtest::{SignalBacktest, SignalRun};
pub use trade_backtest::{TradeBacktest, TradeRun};

/// Receives `(processed, total)` while a run walks its series.
///
/// Any `FnMut(usize, usize)` closure is a sink, which is how the CLI wires in
/// its progress bars.
pub trait ProgressSink {
    fn on_progress(&mut self, processed: usize, total: usize);
}

impl<F> ProgressSink for F
where
    F: FnMut(usize, usize),
{
    fn on_progress(&mut self, processed: usize, total: usize) {
        self(processed, total)
    }
}

/// Feeds every observation with its baseline to `strategy`, then lets it close
/// whatever the end of the series closes.
///
/// Progress fires once per `report_every` observations and once at the last
/// one. An empty series reports nothing.
fn drive<S: SpreadStrategy>(
    strategy: &mut S,
    series: &SpreadSeries,
    baseline: &[Option<f64>],
    report_every: usize,
    mut progress: Option<&mut dyn ProgressSink>,
) -> Vec<S::Output> {
    let points = series.points();
    let total = points.len();
    let mut outputs = Vec::new();

    for (index, (point, mean)) in points.iter().zip(baseline).enumerate() {
        outputs.extend(strategy.evaluate(index, point, *mean));

        let processed = index + 1;
        if processed % report_every == 0 || processed == total {
            if let Some(sink) = progress.as_deref_mut() {
                sink.on_progress(processed, total);
            }
        }
    }

    if let Some(last) = series.last() {
        outputs.extend(strategy.finish(last));
    }
    outputs
}
