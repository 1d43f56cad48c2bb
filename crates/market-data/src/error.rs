use core_types::CoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("Input file does not exist: {0}")]
    MissingFile(PathBuf),

    #[error("No files matching '{pattern}' in {dir}")]
    NoInputFiles { dir: PathBuf, pattern: String },

    #[error("Malformed record {index} in {path}: {reason}")]
    MalformedRecord {
        path: PathBuf,
        index: usize,
        reason: String,
    },

    #[error("Record {index} in {path} has an unusable price: {price}")]
    InvalidPrice {
        path: PathBuf,
        index: usize,
        price: f64,
    },

    #[error("Cannot merge prices: {0}")]
    EmptyInput(String),

    #[error("Invalid series loaded from {path}: {source}")]
    InvalidSeries {
        path: PathBuf,
        #[source]
        source: CoreError,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
