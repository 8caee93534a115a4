//! Tuning parameters controlling candidate admission across phases.

use serde::{Deserialize, Serialize};

use crate::error::{TuneError, TuneResult};

/// Knobs of the predictive candidate filter.
///
/// Both values are validated at controller construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TunerParams {
    /// Relative optimum range: a configuration whose projected cost is
    /// within this factor of the projected minimum stays in the active
    /// set.
    pub relative_optimum_range: f64,
    /// Number of phases a configuration may go unmeasured before it is
    /// forced back into the active set.
    pub max_phases_without_test: u64,
}

impl Default for TunerParams {
    fn default() -> Self {
        Self {
            relative_optimum_range: 1.2,
            max_phases_without_test: 5,
        }
    }
}

impl TunerParams {
    pub fn validate(&self) -> TuneResult<()> {
        if !self.relative_optimum_range.is_finite() || self.relative_optimum_range < 1.0 {
            return Err(TuneError::InvalidParameter {
                name: "relative_optimum_range",
                detail: format!(
                    "must be finite and at least 1.0, got {}",
                    self.relative_optimum_range
                ),
            });
        }
        if self.max_phases_without_test == 0 {
            return Err(TuneError::InvalidParameter {
                name: "max_phases_without_test",
                detail: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
