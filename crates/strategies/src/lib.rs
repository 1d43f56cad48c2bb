//! # Spread Strategies
//!
//! The two state machines that walk a spread series against its baseline.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It knows nothing about files or
//!   progress reporting. It depends only on `core-types` and `configuration`.
//! - **Driver Agnostic:** Both machines implement [`SpreadStrategy`], so the
//!   backtester feeds them observations one at a time without knowing their
//!   internal states.
//!
//! ## Public API
//!
//! - `SpreadStrategy`: The trait both machines implement.
//! - `SignalDetector`: Emits a `SignalInterval` for each excursion outside the band.
//! - `TradeSimulator`: Emits a `Trade` for each completed long/short round trip.

// Declare all the modules that constitute this crate.
pub mod error;
pub mod signal_detector;
pub mod trade_simulator;

// Re-export the key components to create a clean, public-facing API.
pub use error::StrategyError;
pub use signal_detector::SignalDetector;
pub use trade_simulator::TradeSimulator;

use core_types::PricePoint;

/// The core trait both spread state machines implement.
///
/// `Send + Sync` lets independent runs execute on separate worker threads.
pub trait SpreadStrategy: Send + Sync {
    /// What one completed episode looks like (an interval, a trade).
    type Output;

    /// Processes observation `index` of the series.
    ///
    /// # Arguments
    ///
    /// * `index` - Position of `point` in the series, starting at 0.
    /// * `point` - The observation itself.
    /// * `baseline` - The band centre at `index`, or `None` while it is undefined.
    ///   Observations without a baseline never change state.
    ///
    /// # Returns
    ///
    /// The episode closed by this observation, if any.
    fn evaluate(&mut self, index: usize, point: &PricePoint, baseline: Option<f64>)
        -> Option<Self::Output>;

    /// Called once after the last observation. Returns an episode that the
    /// end of the series closes, if the strategy reports those.
    fn finish(&mut self, last: &PricePoint) -> Option<Self::Output>;
}
