pub mod enums;
pub mod error;
pub mod series;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::PositionSide;
pub use error::CoreError;
pub use series::SpreadSeries;
pub use structs::{PricePoint, SignalInterval, Trade};
