//! Closed option enumerations spanned by the search space, plus the
//! capability oracle that knows which traversals a container can run.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Particle container choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    /// All-pairs container without spatial partitioning.
    DirectSum,
    /// Cell-based container with cells sized to the interaction cutoff.
    LinkedCells,
    /// Neighbor lists over the whole domain.
    VerletLists,
    /// Neighbor lists kept per cell.
    VerletListsCells,
    /// Neighbor lists over particle clusters.
    VerletClusterLists,
}

/// Traversal algorithm choices.
///
/// Not every traversal applies to every container; see
/// [`compatible_traversals`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalKind {
    /// Direct pair enumeration for [`ContainerKind::DirectSum`].
    DirectSum,
    /// Cell-based coloring with one color, no newton3 conflicts across cells.
    C01,
    /// Cell-based 8-coloring.
    C08,
    /// Cell-based 18-coloring.
    C18,
    /// Slice-per-thread decomposition along the longest dimension.
    Sliced,
    /// Sliced decomposition with colored slice boundaries.
    ColorSliced,
    /// Plain iteration over whole-domain neighbor lists.
    VerletLists,
    /// One-color traversal of per-cell neighbor lists.
    VerletC01,
    /// 18-coloring traversal of per-cell neighbor lists.
    VerletC18,
    /// Sliced traversal of per-cell neighbor lists.
    VerletSliced,
    /// Cluster-pair traversal for cluster lists.
    VerletClusterCells,
}

/// Particle data layout choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataLayout {
    /// Array of structures.
    Aos,
    /// Structure of arrays.
    Soa,
}

/// Whether the force kernel exploits Newton's third law.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Newton3 {
    Enabled,
    Disabled,
}

/// Traversals a container can physically execute.
///
/// Pure function, queried only during search-space construction. Pruning
/// here guarantees the controller never yields a configuration the
/// simulation cannot run.
pub fn compatible_traversals(container: ContainerKind) -> &'static [TraversalKind] {
    match container {
        ContainerKind::DirectSum => &[TraversalKind::DirectSum],
        ContainerKind::LinkedCells => &[
            TraversalKind::C01,
            TraversalKind::C08,
            TraversalKind::C18,
            TraversalKind::Sliced,
            TraversalKind::ColorSliced,
        ],
        ContainerKind::VerletLists => &[TraversalKind::VerletLists],
        ContainerKind::VerletListsCells => &[
            TraversalKind::VerletC01,
            TraversalKind::VerletC18,
            TraversalKind::VerletSliced,
        ],
        ContainerKind::VerletClusterLists => &[TraversalKind::VerletClusterCells],
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContainerKind::DirectSum => "direct_sum",
            ContainerKind::LinkedCells => "linked_cells",
            ContainerKind::VerletLists => "verlet_lists",
            ContainerKind::VerletListsCells => "verlet_lists_cells",
            ContainerKind::VerletClusterLists => "verlet_cluster_lists",
        };
        f.write_str(name)
    }
}

impl fmt::Display for TraversalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TraversalKind::DirectSum => "direct_sum",
            TraversalKind::C01 => "c01",
            TraversalKind::C08 => "c08",
            TraversalKind::C18 => "c18",
            TraversalKind::Sliced => "sliced",
            TraversalKind::ColorSliced => "color_sliced",
            TraversalKind::VerletLists => "verlet_lists",
            TraversalKind::VerletC01 => "verlet_c01",
            TraversalKind::VerletC18 => "verlet_c18",
            TraversalKind::VerletSliced => "verlet_sliced",
            TraversalKind::VerletClusterCells => "verlet_cluster_cells",
        };
        f.write_str(name)
    }
}

impl fmt::Display for DataLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DataLayout::Aos => "aos",
            DataLayout::Soa => "soa",
        })
    }
}

impl fmt::Display for Newton3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Newton3::Enabled => "enabled",
            Newton3::Disabled => "disabled",
        })
    }
}
