use serde::Serialize;

use crate::{
    error::{DegreeError, Result},
    parser::DegreeMap,
};

/// Degree summary of one graph. `avg_degree` uses floating-point division.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DegreeStats {
    pub max_degree: u64,
    pub min_degree: u64,
    pub avg_degree: f64,
}

impl DegreeStats {
    /// Reduces a degree map in one pass. An empty map has no defined
    /// degrees and is reported as [`DegreeError::EmptyGraph`].
    pub fn from_degrees(degrees: &DegreeMap) -> Result<Self> {
        let (max, min, sum, count) = degrees.values().fold(
            (u64::MIN, u64::MAX, 0u64, 0u64),
            |(max, min, sum, count), &d| (max.max(d), min.min(d), sum + d, count + 1),
        );

        if count == 0 {
            return Err(DegreeError::EmptyGraph);
        }

        Ok(Self {
            max_degree: max,
            min_degree: min,
            avg_degree: sum as f64 / count as f64,
        })
    }
}
