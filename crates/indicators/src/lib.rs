//! # Spread Baselines
//!
//! Moving averages of the spread that serve as the centre of the threshold
//! bands. Two distinct rules are provided and are never interchangeable:
//!
//! - [`rolling_mean`]: window ending at, and including, the current observation.
//!   Used by the signal-interval detector.
//! - [`trailing_mean`]: window ending just before the current observation.
//!   Used by the trade simulator.
//!
//! Both return a vector aligned with the input where `None` marks an index
//! whose window is not yet full.

pub mod error;
pub mod rolling;

pub use error::IndicatorError;
pub use rolling::{rolling_mean, trailing_mean};
