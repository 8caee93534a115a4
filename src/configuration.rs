//! The configuration value the tuner searches over: one point in the
//! (container, cell-size factor, traversal, data layout, newton3) space.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::{TuneError, TuneResult};
use crate::options::{ContainerKind, DataLayout, Newton3, TraversalKind};

/// Validated cell-size factor.
///
/// Wraps `f64` so configurations can serve as keys in ordered sets and
/// hash maps: ordering uses `f64::total_cmp` and hashing uses the bit
/// pattern. Both are consistent with equality because the constructor
/// rejects NaN, infinities, and non-positive values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct CellSizeFactor(f64);

impl CellSizeFactor {
    /// Create a factor; the value must be positive and finite.
    pub fn new(value: f64) -> TuneResult<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(TuneError::InvalidParameter {
                name: "cell_size_factor",
                detail: format!("must be positive and finite, got {value}"),
            });
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for CellSizeFactor {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for CellSizeFactor {}

impl PartialOrd for CellSizeFactor {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellSizeFactor {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for CellSizeFactor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl TryFrom<f64> for CellSizeFactor {
    type Error = TuneError;

    fn try_from(value: f64) -> TuneResult<Self> {
        Self::new(value)
    }
}

impl From<CellSizeFactor> for f64 {
    fn from(factor: CellSizeFactor) -> f64 {
        factor.0
    }
}

impl fmt::Display for CellSizeFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single executable combination of tuning options.
///
/// Field order is comparison order: the derived `Ord` is the lexicographic
/// tuple order (container, cell_size_factor, traversal, data_layout,
/// newton3) that the controller uses to yield configurations and break
/// selection ties deterministically.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Configuration {
    pub container: ContainerKind,
    pub cell_size_factor: CellSizeFactor,
    pub traversal: TraversalKind,
    pub data_layout: DataLayout,
    pub newton3: Newton3,
}

impl Configuration {
    pub fn new(
        container: ContainerKind,
        cell_size_factor: CellSizeFactor,
        traversal: TraversalKind,
        data_layout: DataLayout,
        newton3: Newton3,
    ) -> Self {
        Self {
            container,
            cell_size_factor,
            traversal,
            data_layout,
            newton3,
        }
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{container: {}, cell_size_factor: {}, traversal: {}, data_layout: {}, newton3: {}}}",
            self.container, self.cell_size_factor, self.traversal, self.data_layout, self.newton3
        )
    }
}
