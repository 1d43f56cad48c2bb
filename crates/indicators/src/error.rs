use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("Moving average window must be at least 1 (got {0})")]
    InvalidWindow(usize),

    #[error("Failed to initialize moving average: {0}")]
    Initialization(String),
}
