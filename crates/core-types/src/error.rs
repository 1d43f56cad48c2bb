use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Record {index} is out of order: {current} precedes {previous}")]
    OutOfOrder {
        index: usize,
        previous: DateTime<Utc>,
        current: DateTime<Utc>,
    },

    #[error("Record {index} has a non-finite spread: {value}")]
    NonFiniteSpread { index: usize, value: f64 },
}
