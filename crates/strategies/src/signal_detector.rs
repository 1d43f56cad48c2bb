use crate::SpreadStrategy;
use crate::error::StrategyError;
use chrono::{DateTime, Utc};
use configuration::{CloseMode, DetectorParams};
use core_types::{PricePoint, SignalInterval};

#[derive(Debug, Clone, Copy, PartialEq)]
enum DetectorState {
    /// Spread inside `[baseline - threshold, baseline + threshold]`.
    Outside,
    /// Spread left the band at `start`.
    InSignal { start: DateTime<Utc> },
}

/// Detects contiguous excursions of the spread outside `baseline ± threshold`.
///
/// With [`CloseMode::EveryStep`] an open interval is closed on the very next
/// observation with a baseline, whatever that observation looks like, and a new
/// one is opened at that same observation if it is also outside the band. A
/// spread that stays outside for several bars therefore produces a chain of
/// one-step intervals. [`CloseMode::BackInside`] closes only when the spread
/// returns inside the band, giving one interval per excursion.
#[derive(Debug, Clone)]
pub struct SignalDetector {
    threshold: f64,
    close_mode: CloseMode,
    state: DetectorState,
}

impl SignalDetector {
    pub fn new(params: &DetectorParams) -> Result<Self, StrategyError> {
        if !params.threshold.is_finite() || params.threshold < 0.0 {
            return Err(StrategyError::InvalidParameters(format!(
                "Detector threshold must be finite and non-negative (got {})",
                params.threshold
            )));
        }

        Ok(Self {
            threshold: params.threshold,
            close_mode: params.close_mode,
            state: DetectorState::Outside,
        })
    }

    /// `true` when the spread is strictly above or below the band.
    fn is_outside_band(&self, spread: f64, baseline: f64) -> bool {
        spread > baseline + self.threshold || spread < baseline - self.threshold
    }
}

impl SpreadStrategy for SignalDetector {
    type Output = SignalInterval;

    fn evaluate(
        &mut self,
        index: usize,
        point: &PricePoint,
        baseline: Option<f64>,
    ) -> Option<SignalInterval> {
        let baseline = baseline?;
        let outside = self.is_outside_band(point.spread, baseline);

        match self.state {
            DetectorState::Outside => {
                if outside {
                    tracing::trace!(index, spread = point.spread, baseline, "signal opened");
                    self.state = DetectorState::InSignal {
                        start: point.timestamp,
                    };
                }
                None
            }
            DetectorState::InSignal { start } => {
                let closes = match self.close_mode {
                    CloseMode::EveryStep => true,
                    CloseMode::BackInside => !outside,
                };
                if !closes {
                    return None;
                }

                let interval = SignalInterval::closed(start, point.timestamp);
                // The closing observation may itself be a fresh excursion.
                self.state = if outside {
                    DetectorState::InSignal {
                        start: point.timestamp,
                    }
                } else {
                    DetectorState::Outside
                };
                tracing::trace!(index, duration = interval.duration_seconds, "signal closed");
                Some(interval)
            }
        }
    }

    fn finish(&mut self, last: &PricePoint) -> Option<SignalInterval> {
        match std::mem::replace(&mut self.state, DetectorState::Outside) {
            DetectorState::InSignal { start } => {
                Some(SignalInterval::closed_at_end(start, last.timestamp))
            }
            DetectorState::Outside => None,
        }
    }
}
