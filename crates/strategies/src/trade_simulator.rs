use crate::SpreadStrategy;
use crate::error::StrategyError;
use chrono::{DateTime, Utc};
use configuration::SimulatorParams;
use core_types::{PositionSide, PricePoint, Trade};

#[derive(Debug, Clone, Copy, PartialEq)]
struct OpenPosition {
    side: PositionSide,
    entry_time: DateTime<Utc>,
}

/// Simulates an always-in-the-market spread arbitrage after a warm-up period.
///
/// From flat, a spread above `baseline + threshold` opens a short future /
/// long spot position and a spread below `baseline - threshold` opens the
/// opposite. An open position is only ever closed by the opposite signal,
/// which simultaneously opens the reverse position, so the book is never
/// flat again once the first entry happened. A position still open at the end
/// of the series is not reported.
#[derive(Debug, Clone)]
pub struct TradeSimulator {
    threshold: f64,
    warmup_ticks: usize,
    position: Option<OpenPosition>,
    entries: usize,
}

impl TradeSimulator {
    pub fn new(params: &SimulatorParams) -> Result<Self, StrategyError> {
        if !params.threshold.is_finite() || params.threshold < 0.0 {
            return Err(StrategyError::InvalidParameters(format!(
                "Simulator threshold must be finite and non-negative (got {})",
                params.threshold
            )));
        }
        if params.mean_n == 0 {
            return Err(StrategyError::InvalidParameters(
                "Simulator mean_n must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            threshold: params.threshold,
            warmup_ticks: params.warmup_ticks,
            position: None,
            entries: 0,
        })
    }

    /// Number of positions opened so far, including one that may still be open.
    pub fn entries(&self) -> usize {
        self.entries
    }

    fn open(&mut self, side: PositionSide, at: DateTime<Utc>) {
        self.position = Some(OpenPosition {
            side,
            entry_time: at,
        });
        self.entries += 1;
    }
}

impl SpreadStrategy for TradeSimulator {
    type Output = Trade;

    fn evaluate(&mut self, index: usize, point: &PricePoint, baseline: Option<f64>) -> Option<Trade> {
        if index <= self.warmup_ticks {
            return None;
        }
        let mean = baseline?;
        let spread = point.spread;
        let above = spread > self.threshold + mean;
        let below = spread < -self.threshold + mean;

        match self.position {
            None => {
                if above {
                    self.open(PositionSide::Short, point.timestamp);
                } else if below {
                    self.open(PositionSide::Long, point.timestamp);
                }
                None
            }
            Some(position) => {
                let reverses = match position.side {
                    PositionSide::Short => below,
                    PositionSide::Long => above,
                };
                if !reverses {
                    return None;
                }

                let trade = Trade {
                    entry_time: position.entry_time,
                    exit_time: point.timestamp,
                    side_entered: position.side,
                };
                self.open(position.side.opposite(), point.timestamp);
                tracing::trace!(index, side = ?trade.side_entered, "position reversed");
                Some(trade)
            }
        }
    }

    fn finish(&mut self, _last: &PricePoint) -> Option<Trade> {
        if let Some(position) = self.position.take() {
            tracing::debug!(
                side = ?position.side,
                entry_time = %position.entry_time,
                "discarding position still open at end of series"
            );
        }
        None
    }
}
