//! Community detection traits.

use crate::error::Result;
use crate::graph::InteractionGraph;
use crate::partition::Partition;

/// Trait for community detection algorithms.
pub trait CommunityDetection {
    /// Detect communities in a graph, assigning every node to exactly one
    /// community.
    fn detect(&self, graph: &InteractionGraph) -> Result<Partition>;

    /// Get the resolution parameter (if applicable).
    fn resolution(&self) -> f64 {
        1.0
    }
}
