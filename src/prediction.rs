//! Cost projection and active-set derivation.
//!
//! The predictor is a stateless strategy over the evidence store; the
//! controller asks it for a projected cost per configuration at each
//! phase start and derives the subset worth measuring from the
//! projections.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::configuration::Configuration;
use crate::error::{TuneError, TuneResult};
use crate::evidence::{Evidence, EvidenceStore};
use crate::params::TunerParams;
use crate::search_space::SearchSpace;

/// Strategy for projecting a configuration's cost at an upcoming phase.
pub trait CostPredictor: fmt::Debug {
    /// Projected cost at `phase`, or `None` when the history cannot
    /// support a projection yet.
    fn predict(&self, history: &[Evidence], phase: u64) -> Option<u64>;
}

/// Linear extrapolation through the two most recent evidences.
///
/// Needs at least two measurements; projections are clamped at zero since
/// a negative cost is nonsensical.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearExtrapolation;

impl CostPredictor for LinearExtrapolation {
    fn predict(&self, history: &[Evidence], phase: u64) -> Option<u64> {
        if history.len() < 2 {
            return None;
        }
        let newest = &history[history.len() - 1];
        let previous = &history[history.len() - 2];
        let t2 = newest.cost as i128;
        let t1 = previous.cost as i128;
        let p2 = newest.phase as i128;
        let p1 = previous.phase as i128;
        // p2 > p1 by the history invariant, so the division is safe.
        let projected = t2 + (t2 - t1) * (phase as i128 - p2) / (p2 - p1);
        Some(projected.max(0) as u64)
    }
}

/// Projections plus the candidates to measure in one phase.
#[derive(Debug, Clone)]
pub struct PhasePlan {
    pub active: BTreeSet<Configuration>,
    pub predictions: HashMap<Configuration, u64>,
}

/// Derive the active candidate set for `phase`.
///
/// Cold rule: a trivial space, or a phase without a prior comparison
/// (0 or 1), measures everything. Otherwise a configuration is admitted
/// when any of the following holds:
/// 1. its projected cost is within `relative_optimum_range` of the
///    projected minimum,
/// 2. it was last measured `max_phases_without_test` or more phases ago,
/// 3. it has fewer than two evidences (unknown is not pruned).
pub fn derive_active_set(
    space: &SearchSpace,
    store: &EvidenceStore,
    predictor: &dyn CostPredictor,
    params: &TunerParams,
    phase: u64,
) -> TuneResult<PhasePlan> {
    if space.is_trivial() || phase <= 1 {
        return Ok(PhasePlan {
            active: space.iter().collect(),
            predictions: HashMap::new(),
        });
    }

    let mut predictions = HashMap::new();
    for configuration in space.iter() {
        if let Some(cost) = predictor.predict(store.history_of(&configuration), phase) {
            predictions.insert(configuration, cost);
        }
    }
    let projected_minimum = predictions.values().copied().min();

    let mut active = BTreeSet::new();
    for configuration in space.iter() {
        let history = store.history_of(&configuration);
        if history.len() < 2 {
            active.insert(configuration);
            continue;
        }
        let last_tested = history[history.len() - 1].phase;
        if phase.saturating_sub(last_tested) >= params.max_phases_without_test {
            active.insert(configuration);
            continue;
        }
        if let (Some(&projected), Some(minimum)) =
            (predictions.get(&configuration), projected_minimum)
        {
            if projected as f64 <= params.relative_optimum_range * minimum as f64 {
                active.insert(configuration);
            }
        }
    }

    if active.is_empty() {
        return Err(TuneError::NoCandidates { phase });
    }
    Ok(PhasePlan {
        active,
        predictions,
    })
}
