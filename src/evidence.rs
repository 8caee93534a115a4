//! Measurement bookkeeping: the current-phase view and the cross-phase
//! history, two views of the same facts.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::configuration::Configuration;
use crate::error::{TuneError, TuneResult};

/// One measured cost for one configuration in one phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evidence {
    /// Tuning phase the measurement was taken in.
    pub phase: u64,
    /// Measured cost in nanoseconds (any monotone time unit works).
    pub cost: u64,
    /// Wall-clock stamp, diagnostic only; never consulted by prediction.
    pub recorded_at: DateTime<Utc>,
}

/// Per-configuration measurement store.
///
/// `latest` holds the costs of the phase currently being probed and is
/// cleared at every phase boundary; `history` is append-only across
/// phases and stays sorted by phase with each phase present at most once.
///
/// The store is seeded with every configuration of the search space, so
/// recording against anything else is a programmer error surfaced as
/// [`TuneError::UnknownConfiguration`].
#[derive(Debug, Clone, Default)]
pub struct EvidenceStore {
    latest: HashMap<Configuration, u64>,
    history: HashMap<Configuration, Vec<Evidence>>,
}

impl EvidenceStore {
    /// Seed the store with the configurations it may record against.
    pub fn for_configurations(configurations: impl IntoIterator<Item = Configuration>) -> Self {
        let history = configurations
            .into_iter()
            .map(|configuration| (configuration, Vec::new()))
            .collect();
        Self {
            latest: HashMap::new(),
            history,
        }
    }

    /// Record a measurement for `configuration` at `phase`.
    ///
    /// A second record in the same phase replaces the first, keeping the
    /// one-evidence-per-phase invariant without a new error class.
    pub fn record(
        &mut self,
        configuration: Configuration,
        phase: u64,
        cost: u64,
    ) -> TuneResult<()> {
        let Some(entries) = self.history.get_mut(&configuration) else {
            return Err(TuneError::UnknownConfiguration { configuration });
        };
        match entries.last_mut() {
            Some(last) if last.phase == phase => {
                last.cost = cost;
                last.recorded_at = Utc::now();
            }
            _ => entries.push(Evidence {
                phase,
                cost,
                recorded_at: Utc::now(),
            }),
        }
        self.latest.insert(configuration, cost);
        Ok(())
    }

    /// Cost measured for `configuration` in the current phase.
    pub fn latest_cost(&self, configuration: &Configuration) -> Option<u64> {
        self.latest.get(configuration).copied()
    }

    pub fn has_measurements(&self) -> bool {
        !self.latest.is_empty()
    }

    /// Full measurement history of `configuration` across phases.
    pub fn history_of(&self, configuration: &Configuration) -> &[Evidence] {
        self.history
            .get(configuration)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Drop the current-phase view; history is preserved.
    pub fn clear_current_phase(&mut self) {
        self.latest.clear();
    }

    /// Drop history as well; the set of known configurations is kept.
    pub fn clear_all(&mut self) {
        self.latest.clear();
        for entries in self.history.values_mut() {
            entries.clear();
        }
    }

    /// Forget a configuration entirely (newton3 invalidation).
    pub fn remove(&mut self, configuration: &Configuration) {
        self.latest.remove(configuration);
        self.history.remove(configuration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::CellSizeFactor;
    use crate::options::{ContainerKind, DataLayout, Newton3, TraversalKind};

    fn config(traversal: TraversalKind) -> Configuration {
        Configuration::new(
            ContainerKind::LinkedCells,
            CellSizeFactor::new(1.0).unwrap(),
            traversal,
            DataLayout::Aos,
            Newton3::Enabled,
        )
    }

    fn store_with(configs: &[Configuration]) -> EvidenceStore {
        EvidenceStore::for_configurations(configs.iter().copied())
    }

    #[test]
    fn test_record_updates_both_views() {
        let a = config(TraversalKind::C01);
        let mut store = store_with(&[a]);
        store.record(a, 1, 500).unwrap();
        assert_eq!(store.latest_cost(&a), Some(500));
        assert_eq!(store.history_of(&a).len(), 1);
        assert_eq!(store.history_of(&a)[0].phase, 1);
        assert_eq!(store.history_of(&a)[0].cost, 500);
    }

    #[test]
    fn test_record_unknown_configuration_is_fatal() {
        let a = config(TraversalKind::C01);
        let stranger = config(TraversalKind::C08);
        let mut store = store_with(&[a]);
        let err = store.record(stranger, 1, 500).unwrap_err();
        assert_eq!(
            err,
            TuneError::UnknownConfiguration {
                configuration: stranger
            }
        );
    }

    #[test]
    fn test_same_phase_record_replaces() {
        let a = config(TraversalKind::C01);
        let mut store = store_with(&[a]);
        store.record(a, 1, 500).unwrap();
        store.record(a, 1, 300).unwrap();
        assert_eq!(store.latest_cost(&a), Some(300));
        assert_eq!(store.history_of(&a).len(), 1);
        assert_eq!(store.history_of(&a)[0].cost, 300);
    }

    #[test]
    fn test_history_is_strictly_increasing_in_phase() {
        let a = config(TraversalKind::C01);
        let mut store = store_with(&[a]);
        store.record(a, 1, 500).unwrap();
        store.record(a, 2, 400).unwrap();
        store.record(a, 5, 600).unwrap();
        let phases: Vec<u64> = store.history_of(&a).iter().map(|e| e.phase).collect();
        assert_eq!(phases, vec![1, 2, 5]);
    }

    #[test]
    fn test_clear_current_phase_preserves_history() {
        let a = config(TraversalKind::C01);
        let mut store = store_with(&[a]);
        store.record(a, 1, 500).unwrap();
        store.clear_current_phase();
        assert_eq!(store.latest_cost(&a), None);
        assert!(!store.has_measurements());
        assert_eq!(store.history_of(&a).len(), 1);
    }

    #[test]
    fn test_clear_all_keeps_known_configurations() {
        let a = config(TraversalKind::C01);
        let mut store = store_with(&[a]);
        store.record(a, 1, 500).unwrap();
        store.clear_all();
        assert!(store.history_of(&a).is_empty());
        // still known: recording works again
        store.record(a, 2, 400).unwrap();
        assert_eq!(store.history_of(&a).len(), 1);
    }

    #[test]
    fn test_remove_forgets_configuration() {
        let a = config(TraversalKind::C01);
        let mut store = store_with(&[a]);
        store.record(a, 1, 500).unwrap();
        store.remove(&a);
        assert!(store.history_of(&a).is_empty());
        assert!(store.record(a, 2, 400).is_err());
    }
}
