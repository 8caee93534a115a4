//! Error taxonomy for the tuning core.
//!
//! Every error here is fatal: the core surfaces it immediately and never
//! attempts recovery. Variants carry the triggering parameter so the host
//! driver can log something actionable.

use std::error::Error;
use std::fmt;

use crate::configuration::Configuration;
use crate::options::Newton3;

/// Fatal failures of the tuning core.
#[derive(Debug, Clone, PartialEq)]
pub enum TuneError {
    /// Search-space construction produced no valid configuration.
    NoValidConfigurations,
    /// Evidence was reported for a configuration outside the search space.
    UnknownConfiguration { configuration: Configuration },
    /// Active-set derivation produced an empty candidate set.
    NoCandidates { phase: u64 },
    /// A phase ended without any measurement reported.
    NoMeasurements { phase: u64 },
    /// Removing a newton3 option emptied the search space.
    EmptyAfterInvalidation { option: Newton3 },
    /// A negative cost was reported.
    InvalidCost { cost: i64 },
    /// A construction parameter failed validation.
    InvalidParameter { name: &'static str, detail: String },
}

impl fmt::Display for TuneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuneError::NoValidConfigurations => {
                write!(f, "no valid configurations could be created")
            }
            TuneError::UnknownConfiguration { configuration } => {
                write!(f, "evidence reported for unknown configuration {configuration}")
            }
            TuneError::NoCandidates { phase } => {
                write!(f, "no candidate configurations for phase {phase}")
            }
            TuneError::NoMeasurements { phase } => {
                write!(f, "phase {phase} ended without any measurements")
            }
            TuneError::EmptyAfterInvalidation { option } => {
                write!(
                    f,
                    "removing all configurations with newton3 {option} emptied the search space"
                )
            }
            TuneError::InvalidCost { cost } => {
                write!(f, "measured cost must be non-negative, got {cost}")
            }
            TuneError::InvalidParameter { name, detail } => {
                write!(f, "invalid parameter '{name}': {detail}")
            }
        }
    }
}

impl Error for TuneError {}

/// Result alias used throughout the crate.
pub type TuneResult<T> = std::result::Result<T, TuneError>;
