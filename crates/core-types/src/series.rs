use crate::error::CoreError;
use crate::structs::PricePoint;
use chrono::{DateTime, Utc};

/// A validated, time-ordered spread series.
///
/// Timestamps are non-decreasing (ties allowed) and every spread is finite.
/// The series is read-only once built; backtest runs borrow it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpreadSeries {
    points: Vec<PricePoint>,
}

impl SpreadSeries {
    pub fn new(points: Vec<PricePoint>) -> Result<Self, CoreError> {
        for (index, point) in points.iter().enumerate() {
            if !point.spread.is_finite() {
                return Err(CoreError::NonFiniteSpread {
                    index,
                    value: point.spread,
                });
            }
            if index > 0 {
                let previous = points[index - 1].timestamp;
                if point.timestamp < previous {
                    return Err(CoreError::OutOfOrder {
                        index,
                        previous,
                        current: point.timestamp,
                    });
                }
            }
        }
        Ok(Self { points })
    }

    /// Sorts the points by timestamp (stable, so ties keep their input order) before validating.
    pub fn from_unsorted(mut points: Vec<PricePoint>) -> Result<Self, CoreError> {
        points.sort_by_key(|p| p.timestamp);
        Self::new(points)
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn spreads(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.spread).collect()
    }

    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.points.iter().map(|p| p.timestamp).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }
}
