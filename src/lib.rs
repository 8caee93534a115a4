//! Predictive auto-tuning of pairwise-interaction traversals.
//!
//! The tuning core of a particle-simulation framework: at runtime it
//! picks, from a combinatorial space of (container, cell-size factor,
//! traversal, data layout, newton3) configurations, the one that
//! minimizes per-step wall-clock cost under a drifting workload. The
//! simulation driver, particle containers, and traversal kernels are
//! external collaborators; this crate only decides what to run next.
//!
//! Design principles:
//! 1. Prune invalid combinations at construction (the controller never
//!    yields a configuration the simulation cannot execute)
//! 2. Deterministic probing order and tie-breaks (lexicographic over the
//!    configuration tuple)
//! 3. Prediction narrows, staleness re-probes (dominated candidates are
//!    skipped but never forgotten)
//! 4. Per-phase state is disposable, history is append-only
//! 5. All failures are fatal and carry the triggering parameter

pub mod configuration;
pub mod error;
pub mod evidence;
pub mod options;
pub mod params;
pub mod prediction;
pub mod search_space;
pub mod tuner;

pub use configuration::{CellSizeFactor, Configuration};
pub use error::{TuneError, TuneResult};
pub use evidence::{Evidence, EvidenceStore};
pub use options::{compatible_traversals, ContainerKind, DataLayout, Newton3, TraversalKind};
pub use params::TunerParams;
pub use prediction::{CostPredictor, LinearExtrapolation};
pub use search_space::{AllowedOptions, SearchSpace};
pub use tuner::PredictiveTuner;
