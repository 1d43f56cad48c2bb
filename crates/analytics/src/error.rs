use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Duration at index {index} is not a finite, non-negative number of seconds: {value}")]
    InvalidDuration { index: usize, value: f64 },

    #[error("Spread at index {index} is not finite: {value}")]
    InvalidSpread { index: usize, value: f64 },
}
