//! The tuning controller: a per-phase state machine over the search
//! space.
//!
//! The host loop asks for [`PredictiveTuner::current_configuration`],
//! executes one traversal with it, reports the elapsed cost through
//! [`PredictiveTuner::add_evidence`], then calls
//! [`PredictiveTuner::tune`]. `tune` walks the search space filtered by
//! the phase's active candidate set; once the set is exhausted it selects
//! the phase optimum, advances the phase, and re-enters with a freshly
//! predicted candidate set.

use std::collections::{BTreeSet, HashMap};
use std::ops::Bound;

use crate::configuration::Configuration;
use crate::error::{TuneError, TuneResult};
use crate::evidence::{Evidence, EvidenceStore};
use crate::options::{ContainerKind, Newton3};
use crate::params::TunerParams;
use crate::prediction::{derive_active_set, CostPredictor, LinearExtrapolation};
use crate::search_space::{AllowedOptions, SearchSpace};

/// Position of the probe within the current phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    /// Phase entered, nothing yielded yet; the next `tune` yields the
    /// first active configuration.
    PhaseStart,
    /// Probing the contained configuration.
    At(Configuration),
    /// Active set exhausted; the next `tune` finalizes the phase.
    End,
}

/// Online auto-tuner over traversal configurations.
///
/// Owns the search space, the evidence store, the per-phase predictions
/// and active set, and the probe cursor for the lifetime of the tuning
/// session. Single-threaded; every operation runs to completion
/// synchronously.
#[derive(Debug)]
pub struct PredictiveTuner {
    params: TunerParams,
    search_space: SearchSpace,
    evidence: EvidenceStore,
    predictions: HashMap<Configuration, u64>,
    active_set: BTreeSet<Configuration>,
    cursor: Cursor,
    selected: Option<Configuration>,
    phase: u64,
    predictor: Box<dyn CostPredictor>,
}

impl PredictiveTuner {
    /// Build the tuner from the host's allowed option sets.
    ///
    /// Validates the parameters, constructs the search space, and enters
    /// the first evidence-collecting phase (phase 1), in which every
    /// configuration is a candidate.
    pub fn new(allowed: &AllowedOptions, params: TunerParams) -> TuneResult<Self> {
        params.validate()?;
        let search_space = SearchSpace::from_options(allowed)?;
        Self::with_space(search_space, params)
    }

    /// Build the tuner from explicit configurations.
    ///
    /// Assumes only valid configurations are passed; mainly for unit
    /// testing and hosts that precompute their spaces.
    pub fn from_configurations(
        configurations: impl IntoIterator<Item = Configuration>,
        params: TunerParams,
    ) -> TuneResult<Self> {
        params.validate()?;
        let search_space = SearchSpace::from_configurations(configurations)?;
        Self::with_space(search_space, params)
    }

    fn with_space(search_space: SearchSpace, params: TunerParams) -> TuneResult<Self> {
        let evidence = EvidenceStore::for_configurations(search_space.iter());
        let mut tuner = Self {
            params,
            search_space,
            evidence,
            predictions: HashMap::new(),
            active_set: BTreeSet::new(),
            cursor: Cursor::PhaseStart,
            selected: None,
            phase: 1,
            predictor: Box::new(LinearExtrapolation),
        };
        tuner.begin_phase()?;
        Ok(tuner)
    }

    /// Swap the prediction strategy (defaults to linear extrapolation).
    pub fn with_predictor(mut self, predictor: Box<dyn CostPredictor>) -> TuneResult<Self> {
        self.predictor = predictor;
        self.begin_phase()?;
        Ok(self)
    }

    /// The configuration the simulation should execute next.
    ///
    /// Valid whenever the search space is non-empty: at a phase start it
    /// is the first active candidate; after a mid-phase invalidation
    /// exhausted the cursor it falls back to the most recently probed
    /// surviving candidate.
    pub fn current_configuration(&self) -> TuneResult<Configuration> {
        let configuration = match self.cursor {
            Cursor::At(current) => Some(current),
            Cursor::PhaseStart => self.first_active(),
            Cursor::End => self.active_set.iter().next_back().copied(),
        };
        configuration
            .or_else(|| self.search_space.first())
            .ok_or(TuneError::NoValidConfigurations)
    }

    /// Record the measured cost of the current configuration at the
    /// current phase. Negative costs are rejected.
    pub fn add_evidence(&mut self, cost: i64) -> TuneResult<()> {
        if cost < 0 {
            return Err(TuneError::InvalidCost { cost });
        }
        let configuration = self.current_configuration()?;
        self.evidence.record(configuration, self.phase, cost as u64)
    }

    /// Advance the probe.
    ///
    /// Returns `true` while more candidates of the current phase remain
    /// to be measured. Once the candidate set is exhausted the phase
    /// optimum is selected, the phase counter advances by one, the next
    /// phase is entered, and `false` is returned.
    pub fn tune(&mut self) -> TuneResult<bool> {
        if self.search_space.is_trivial() {
            return self.finalize_phase();
        }
        self.cursor = match self.cursor {
            Cursor::PhaseStart => match self.first_active() {
                Some(configuration) => Cursor::At(configuration),
                None => Cursor::End,
            },
            Cursor::At(current) => match self.next_active_after(current) {
                Some(configuration) => Cursor::At(configuration),
                None => Cursor::End,
            },
            Cursor::End => Cursor::End,
        };
        if matches!(self.cursor, Cursor::At(_)) {
            return Ok(true);
        }
        self.finalize_phase()
    }

    /// External invalidation: the force kernel rejected a newton3 mode.
    ///
    /// Deletes every matching configuration from the search space, the
    /// candidate set, the predictions, and the evidence store. A deleted
    /// cursor advances to the next surviving candidate; the phase
    /// continues.
    pub fn remove_newton3_option(&mut self, option: Newton3) -> TuneResult<()> {
        let removed = self.search_space.remove_newton3(option);
        for configuration in &removed {
            self.active_set.remove(configuration);
            self.predictions.remove(configuration);
            self.evidence.remove(configuration);
        }
        if self.search_space.is_empty() {
            return Err(TuneError::EmptyAfterInvalidation { option });
        }
        if let Some(selected) = self.selected {
            if selected.newton3 == option {
                self.selected = None;
            }
        }
        if let Cursor::At(current) = self.cursor {
            if current.newton3 == option {
                self.cursor = match self.next_active_after(current) {
                    Some(configuration) => Cursor::At(configuration),
                    None => Cursor::End,
                };
            }
        }
        Ok(())
    }

    /// Re-enter the current phase from accumulated history: per-phase
    /// state is cleared, the candidate set re-derived, the cursor
    /// repositioned. Idempotent; the phase counter does not move.
    pub fn reset(&mut self) -> TuneResult<()> {
        self.begin_phase()
    }

    pub fn search_space_is_trivial(&self) -> bool {
        self.search_space.is_trivial()
    }

    pub fn search_space_is_empty(&self) -> bool {
        self.search_space.is_empty()
    }

    /// Current tuning phase; advances by exactly one per `tune` call
    /// that returns `false`.
    pub fn phase(&self) -> u64 {
        self.phase
    }

    /// Optimum selected at the most recent phase end, if any.
    pub fn selected_configuration(&self) -> Option<Configuration> {
        self.selected
    }

    /// Containers still represented in the search space.
    pub fn container_options(&self) -> BTreeSet<ContainerKind> {
        self.search_space.container_options()
    }

    /// Candidates of the current phase.
    pub fn active_set(&self) -> &BTreeSet<Configuration> {
        &self.active_set
    }

    /// Projected costs computed at the current phase start.
    pub fn predictions(&self) -> &HashMap<Configuration, u64> {
        &self.predictions
    }

    /// Measurement history of one configuration across phases.
    pub fn history_of(&self, configuration: &Configuration) -> &[Evidence] {
        self.evidence.history_of(configuration)
    }

    /// Enter the current phase: clear the per-phase views, derive the
    /// candidate set, park the cursor before the first candidate.
    fn begin_phase(&mut self) -> TuneResult<()> {
        self.evidence.clear_current_phase();
        self.predictions.clear();
        let plan = derive_active_set(
            &self.search_space,
            &self.evidence,
            self.predictor.as_ref(),
            &self.params,
            self.phase,
        )?;
        tracing::debug!(
            phase = self.phase,
            active = plan.active.len(),
            "tuning phase started"
        );
        self.active_set = plan.active;
        self.predictions = plan.predictions;
        self.cursor = Cursor::PhaseStart;
        Ok(())
    }

    /// Select the phase optimum, advance the phase, enter the next one.
    fn finalize_phase(&mut self) -> TuneResult<bool> {
        let selected = self.select_phase_optimum()?;
        tracing::debug!(
            phase = self.phase,
            configuration = %selected,
            "selected configuration"
        );
        self.selected = Some(selected);
        self.phase += 1;
        self.begin_phase()?;
        Ok(false)
    }

    /// Argmin over the current-phase costs, ties broken by configuration
    /// order. A singleton candidate set needs no measurement to decide.
    fn select_phase_optimum(&self) -> TuneResult<Configuration> {
        if self.active_set.len() == 1 {
            if let Some(&only) = self.active_set.iter().next() {
                return Ok(only);
            }
        }
        let mut best: Option<(Configuration, u64)> = None;
        for configuration in self.search_space.iter() {
            if let Some(cost) = self.evidence.latest_cost(&configuration) {
                let better = match best {
                    Some((_, best_cost)) => cost < best_cost,
                    None => true,
                };
                if better {
                    best = Some((configuration, cost));
                }
            }
        }
        best.map(|(configuration, _)| configuration)
            .ok_or(TuneError::NoMeasurements { phase: self.phase })
    }

    fn first_active(&self) -> Option<Configuration> {
        self.active_set.iter().next().copied()
    }

    fn next_active_after(&self, configuration: Configuration) -> Option<Configuration> {
        self.active_set
            .range((Bound::Excluded(configuration), Bound::Unbounded))
            .next()
            .copied()
    }
}
