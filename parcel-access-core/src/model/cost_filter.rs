//! post-solve selection of lines by accumulated cost.

use crate::model::{ModelError, OdLine};

/// an inclusive upper bound on line cost, in impedance units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CostCutoff(f64);

impl CostCutoff {
    pub fn new(value: f64) -> Result<Self, ModelError> {
        if value.is_finite() && value >= 0.0 {
            Ok(Self(value))
        } else {
            Err(ModelError::InvalidCutoff(value))
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// true when a cost is at or under the cutoff
    pub fn accepts(&self, cost: f64) -> bool {
        cost <= self.0
    }

    /// the lines whose total cost is at or under the cutoff, in their original order.
    pub fn select(&self, lines: &[OdLine]) -> Vec<OdLine> {
        lines
            .iter()
            .filter(|line| self.accepts(line.total_cost))
            .cloned()
            .collect()
    }
}

impl std::fmt::Display for CostCutoff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<= {}", self.0)
    }
}
