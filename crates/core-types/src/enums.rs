use serde::{Deserialize, Serialize};

/// The future leg of an arbitrage position. The spot leg is always the opposite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionSide {
    /// Long future, short spot. Entered when the spread falls below the band.
    Long,
    /// Short future, long spot. Entered when the spread rises above the band.
    Short,
}

impl PositionSide {
    /// Returns the opposite side of the position
    pub fn opposite(&self) -> Self {
        match self {
            PositionSide::Long => PositionSide::Short,
            PositionSide::Short => PositionSide::Long,
        }
    }
}
