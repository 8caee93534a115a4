//! Search-space construction from the host's allowed option sets.

use std::collections::BTreeSet;
use std::ops::Bound;

use serde::{Deserialize, Serialize};

use crate::configuration::{CellSizeFactor, Configuration};
use crate::error::{TuneError, TuneResult};
use crate::options::{compatible_traversals, ContainerKind, DataLayout, Newton3, TraversalKind};

/// The option sets the host allows the tuner to choose from.
///
/// Ordered sets so that search-space construction is deterministic:
/// building twice from equal inputs yields identical spaces, order
/// included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowedOptions {
    pub containers: BTreeSet<ContainerKind>,
    pub cell_size_factors: BTreeSet<CellSizeFactor>,
    pub traversals: BTreeSet<TraversalKind>,
    pub data_layouts: BTreeSet<DataLayout>,
    pub newton3_options: BTreeSet<Newton3>,
}

/// The ordered set of configurations eligible for measurement.
///
/// Populated once at construction; thereafter only shrunk by newton3
/// invalidation. Never empty while the tuning session is alive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSpace {
    configurations: BTreeSet<Configuration>,
}

impl SearchSpace {
    /// Build the space as the union over containers of
    /// (allowed ∩ compatible traversals) × cell-size factors × layouts ×
    /// newton3 options.
    pub fn from_options(allowed: &AllowedOptions) -> TuneResult<Self> {
        let mut configurations = BTreeSet::new();
        for &container in &allowed.containers {
            let applicable: Vec<TraversalKind> = compatible_traversals(container)
                .iter()
                .copied()
                .filter(|traversal| allowed.traversals.contains(traversal))
                .collect();
            for &cell_size_factor in &allowed.cell_size_factors {
                for &traversal in &applicable {
                    for &data_layout in &allowed.data_layouts {
                        for &newton3 in &allowed.newton3_options {
                            configurations.insert(Configuration::new(
                                container,
                                cell_size_factor,
                                traversal,
                                data_layout,
                                newton3,
                            ));
                        }
                    }
                }
            }
        }
        if configurations.is_empty() {
            return Err(TuneError::NoValidConfigurations);
        }
        tracing::debug!(size = configurations.len(), "search space constructed");
        Ok(Self { configurations })
    }

    /// Build the space from explicit configurations.
    ///
    /// Assumes only valid configurations are passed; mainly for unit
    /// testing and hosts that precompute their spaces.
    pub fn from_configurations(
        configurations: impl IntoIterator<Item = Configuration>,
    ) -> TuneResult<Self> {
        let configurations: BTreeSet<Configuration> = configurations.into_iter().collect();
        if configurations.is_empty() {
            return Err(TuneError::NoValidConfigurations);
        }
        Ok(Self { configurations })
    }

    pub fn len(&self) -> usize {
        self.configurations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configurations.is_empty()
    }

    /// Exactly one configuration left to choose from.
    pub fn is_trivial(&self) -> bool {
        self.configurations.len() == 1
    }

    pub fn contains(&self, configuration: &Configuration) -> bool {
        self.configurations.contains(configuration)
    }

    pub fn iter(&self) -> impl Iterator<Item = Configuration> + '_ {
        self.configurations.iter().copied()
    }

    pub fn first(&self) -> Option<Configuration> {
        self.configurations.iter().next().copied()
    }

    /// The next configuration after `configuration` in space order.
    pub fn next_after(&self, configuration: Configuration) -> Option<Configuration> {
        self.configurations
            .range((Bound::Excluded(configuration), Bound::Unbounded))
            .next()
            .copied()
    }

    /// Remove every configuration using the given newton3 option and
    /// return the removed ones in space order.
    pub fn remove_newton3(&mut self, option: Newton3) -> Vec<Configuration> {
        let removed: Vec<Configuration> = self
            .configurations
            .iter()
            .filter(|configuration| configuration.newton3 == option)
            .copied()
            .collect();
        for configuration in &removed {
            self.configurations.remove(configuration);
        }
        removed
    }

    /// Containers still represented in the space.
    pub fn container_options(&self) -> BTreeSet<ContainerKind> {
        self.configurations
            .iter()
            .map(|configuration| configuration.container)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed(containers: &[ContainerKind], traversals: &[TraversalKind]) -> AllowedOptions {
        AllowedOptions {
            containers: containers.iter().copied().collect(),
            cell_size_factors: BTreeSet::from([CellSizeFactor::new(1.0).unwrap()]),
            traversals: traversals.iter().copied().collect(),
            data_layouts: BTreeSet::from([DataLayout::Aos, DataLayout::Soa]),
            newton3_options: BTreeSet::from([Newton3::Enabled, Newton3::Disabled]),
        }
    }

    #[test]
    fn test_incompatible_traversals_are_pruned() {
        // c08 does not apply to direct sum, so only the linked-cells
        // combinations survive.
        let space = SearchSpace::from_options(&allowed(
            &[ContainerKind::DirectSum, ContainerKind::LinkedCells],
            &[TraversalKind::C08],
        ))
        .unwrap();
        assert_eq!(space.len(), 4);
        assert!(space
            .iter()
            .all(|c| c.container == ContainerKind::LinkedCells));
    }

    #[test]
    fn test_empty_intersection_is_fatal() {
        let result = SearchSpace::from_options(&allowed(
            &[ContainerKind::DirectSum],
            &[TraversalKind::C08],
        ));
        assert_eq!(result.unwrap_err(), TuneError::NoValidConfigurations);
    }

    #[test]
    fn test_construction_is_deterministic() {
        let options = allowed(
            &[ContainerKind::LinkedCells, ContainerKind::VerletLists],
            &[TraversalKind::C08, TraversalKind::Sliced, TraversalKind::VerletLists],
        );
        let first = SearchSpace::from_options(&options).unwrap();
        let second = SearchSpace::from_options(&options).unwrap();
        assert_eq!(first, second);
        assert!(first.iter().eq(second.iter()));
    }

    #[test]
    fn test_remove_newton3_shrinks_space() {
        let mut space = SearchSpace::from_options(&allowed(
            &[ContainerKind::LinkedCells],
            &[TraversalKind::C08],
        ))
        .unwrap();
        assert_eq!(space.len(), 4);
        let removed = space.remove_newton3(Newton3::Enabled);
        assert_eq!(removed.len(), 2);
        assert_eq!(space.len(), 2);
        assert!(space.iter().all(|c| c.newton3 == Newton3::Disabled));
    }

    #[test]
    fn test_next_after_walks_in_order() {
        let space = SearchSpace::from_options(&allowed(
            &[ContainerKind::LinkedCells],
            &[TraversalKind::C01, TraversalKind::C08],
        ))
        .unwrap();
        let mut walked = Vec::new();
        let mut cursor = space.first();
        while let Some(configuration) = cursor {
            walked.push(configuration);
            cursor = space.next_after(configuration);
        }
        assert_eq!(walked.len(), space.len());
        assert!(walked.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_container_options_tracks_survivors() {
        let mut space = SearchSpace::from_configurations([
            Configuration::new(
                ContainerKind::DirectSum,
                CellSizeFactor::new(1.0).unwrap(),
                TraversalKind::DirectSum,
                DataLayout::Aos,
                Newton3::Enabled,
            ),
            Configuration::new(
                ContainerKind::LinkedCells,
                CellSizeFactor::new(1.0).unwrap(),
                TraversalKind::C08,
                DataLayout::Aos,
                Newton3::Disabled,
            ),
        ])
        .unwrap();
        assert_eq!(space.container_options().len(), 2);
        space.remove_newton3(Newton3::Enabled);
        assert_eq!(
            space.container_options(),
            BTreeSet::from([ContainerKind::LinkedCells])
        );
    }

    #[test]
    fn test_allowed_options_serde_roundtrip() {
        let options = allowed(&[ContainerKind::LinkedCells], &[TraversalKind::C08]);
        let json = serde_json::to_string(&options).unwrap();
        let back: AllowedOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back, options);
    }
}
