//! # Duration Analytics
//!
//! Summary statistics over the episodes produced by the spread strategies.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It depends only on `core-types`.
//! - **Stateless Calculation:** The `AnalyticsEngine` takes a slice of intervals,
//!   trades, or raw spreads and returns a report. Nothing is retained between calls.
//! - **NaN, not errors, for empty input:** every statistic of an empty sample is
//!   `NaN`, which downstream reporting already tolerates.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: The calculator.
//! - `DurationStatistics`, `SignalMetrics`, `IntervalSummary`, `TradeMetrics`, `SpreadSummary`: its reports.
//! - `AnalyticsError`: Rejection of non-finite input values, by index.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use report::{
    DurationBuckets, DurationStatistics, IntervalSummary, SignalMetrics, SpreadSummary, TradeMetrics,
};
