//! Louvain algorithm for community detection.
//!
//! Greedy modularity optimization through local node moves and graph
//! aggregation.
//!
//! ## The Algorithm (Blondel et al. 2008)
//!
//! 1. **Phase 1 (Local Moving)**: start with each node in its own
//!    community. Visit nodes in insertion order and move each to the
//!    neighboring community with the highest modularity gain, computed
//!    incrementally from cached community degrees rather than by
//!    re-scoring the whole partition. A pass with no moves ends the phase.
//!
//! 2. **Phase 2 (Aggregation)**: build a meta-graph where each community
//!    becomes one node. Edge weights between communities are summed;
//!    weight internal to a community becomes a self-loop.
//!
//! 3. **Iterate**: repeat both phases on the meta-graph until aggregation
//!    stops merging or modularity stops improving, then expand the final
//!    assignment back through every aggregation level.
//!
//! The result is a local optimum, not a global one. Node visitation order
//! is the node insertion order of the input graph, which makes the
//! algorithm deterministic: the same graph built in the same order always
//! yields the same partition.
//!
//! ## References
//!
//! Blondel et al. (2008). "Fast unfolding of communities in large
//! networks." Journal of Statistical Mechanics, P10008.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use super::traits::CommunityDetection;
use crate::error::{Error, Result};
use crate::graph::InteractionGraph;
use crate::partition::Partition;

/// Louvain community detection.
///
/// Deterministic for a fixed graph construction order; see the module
/// docs.
#[derive(Debug, Clone)]
pub struct Louvain {
    /// Resolution parameter (gamma).
    resolution: f64,
    /// Maximum local-moving passes per level.
    max_iter: usize,
    /// Maximum levels of aggregation.
    max_levels: usize,
    /// Minimum modularity improvement to start another level.
    min_gain: f64,
}

impl Louvain {
    /// Create a new Louvain detector with default settings.
    pub fn new() -> Self {
        Self {
            resolution: 1.0,
            max_iter: 100,
            max_levels: 10,
            min_gain: 1e-7,
        }
    }

    /// Set the resolution parameter.
    ///
    /// Higher values produce smaller communities.
    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    /// Set maximum local-moving passes per level.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set maximum aggregation levels.
    pub fn with_max_levels(mut self, levels: usize) -> Self {
        self.max_levels = levels;
        self
    }

    /// Set the minimum modularity gain required to keep aggregating.
    pub fn with_min_gain(mut self, min_gain: f64) -> Self {
        self.min_gain = min_gain;
        self
    }
}

impl Default for Louvain {
    fn default() -> Self {
        Self::new()
    }
}

/// Working graph for one aggregation level: an edge list plus per-node
/// self-loops carrying the weight folded inside earlier communities.
struct LevelGraph {
    n: usize,
    edges: Vec<(usize, usize, f64)>,
    self_loops: Vec<f64>,
}

impl LevelGraph {
    fn from_graph(graph: &InteractionGraph) -> Self {
        let edges = graph
            .edges()
            .map(|(a, b, attrs)| {
                let (i, j) = (a.index(), b.index());
                let (i, j) = if i < j { (i, j) } else { (j, i) };
                (i, j, f64::from(attrs.weight))
            })
            .collect();
        Self {
            n: graph.node_count(),
            edges,
            self_loops: vec![0.0; graph.node_count()],
        }
    }

    /// Total edge weight, self-loops included (m in the gain formula).
    fn total_weight(&self) -> f64 {
        let edge_w: f64 = self.edges.iter().map(|&(_, _, w)| w).sum();
        edge_w + self.self_loops.iter().sum::<f64>()
    }

    /// Weighted degree per node; a self-loop counts twice.
    fn degrees(&self) -> Vec<f64> {
        let mut degrees = vec![0.0; self.n];
        for &(i, j, w) in &self.edges {
            degrees[i] += w;
            degrees[j] += w;
        }
        for (i, &sl) in self.self_loops.iter().enumerate() {
            degrees[i] += 2.0 * sl;
        }
        degrees
    }

    /// Modularity of a labeling of this level's nodes.
    fn modularity(&self, labels: &[usize], resolution: f64) -> f64 {
        let m = self.total_weight();
        if m == 0.0 {
            return 0.0;
        }
        let degrees = self.degrees();

        let mut q = 0.0;
        for &(i, j, w) in &self.edges {
            if labels[i] == labels[j] {
                q += w - resolution * degrees[i] * degrees[j] / (2.0 * m);
            }
        }
        for (i, &sl) in self.self_loops.iter().enumerate() {
            if sl > 0.0 {
                q += sl - resolution * degrees[i] * degrees[i] / (4.0 * m);
            }
        }
        q / m
    }
}

impl Louvain {
    /// Phase 1: local moving. Returns the labeling and whether any node
    /// moved.
    fn local_moving(&self, level: &LevelGraph) -> (Vec<usize>, bool) {
        let n = level.n;
        let m = level.total_weight();
        if m == 0.0 {
            return ((0..n).collect(), false);
        }

        // Sorted maps throughout the phase: hash-order iteration would
        // randomize gain tie-breaking and float accumulation order across
        // runs, breaking the determinism contract.
        let mut adj: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); n];
        for &(i, j, w) in &level.edges {
            *adj[i].entry(j).or_insert(0.0) += w;
            *adj[j].entry(i).or_insert(0.0) += w;
        }

        let degrees = level.degrees();
        let mut labels: Vec<usize> = (0..n).collect();
        let mut community_degrees = degrees.clone();
        let mut any_moved = false;

        for _pass in 0..self.max_iter {
            let mut moved = false;

            // Insertion order: the determinism contract.
            for node in 0..n {
                let current = labels[node];
                let ki = degrees[node];

                // Weight from this node into each neighboring community,
                // with the node itself lifted out of its own community.
                community_degrees[current] -= ki;
                let mut weight_to: BTreeMap<usize, f64> = BTreeMap::new();
                for (&nbr, &w) in &adj[node] {
                    *weight_to.entry(labels[nbr]).or_insert(0.0) += w;
                }

                // ΔQ of joining a community: k_i,in/m − γ·Σ_tot·k_i/(2m²).
                // Staying alone scores zero, so only positive gains move.
                let mut best = current;
                let mut best_gain = 0.0;
                for (&target, &ki_in) in &weight_to {
                    let sigma_tot = community_degrees[target];
                    let gain =
                        ki_in / m - self.resolution * sigma_tot * ki / (2.0 * m * m);
                    if gain > best_gain {
                        best_gain = gain;
                        best = target;
                    }
                }

                community_degrees[best] += ki;
                if best != current {
                    labels[node] = best;
                    moved = true;
                    any_moved = true;
                }
            }

            if !moved {
                break;
            }
        }

        (labels, any_moved)
    }

    /// Phase 2: contract each community to a single node.
    ///
    /// Returns the next level plus, for each new node, the level-local
    /// nodes it absorbed.
    fn aggregate(level: &LevelGraph, labels: &[usize]) -> (LevelGraph, Vec<Vec<usize>>) {
        let mut communities: Vec<usize> = labels.to_vec();
        communities.sort_unstable();
        communities.dedup();
        let n_next = communities.len();

        let relabel: HashMap<usize, usize> = communities
            .iter()
            .enumerate()
            .map(|(new, &old)| (old, new))
            .collect();

        let mut members: Vec<Vec<usize>> = vec![Vec::new(); n_next];
        for (node, &label) in labels.iter().enumerate() {
            members[relabel[&label]].push(node);
        }

        // Sorted so each level's edge list has a reproducible order.
        let mut merged: BTreeMap<(usize, usize), f64> = BTreeMap::new();
        let mut self_loops = vec![0.0; n_next];

        for (i, &sl) in level.self_loops.iter().enumerate() {
            self_loops[relabel[&labels[i]]] += sl;
        }
        for &(i, j, w) in &level.edges {
            let ci = relabel[&labels[i]];
            let cj = relabel[&labels[j]];
            if ci == cj {
                self_loops[ci] += w;
            } else {
                let key = if ci < cj { (ci, cj) } else { (cj, ci) };
                *merged.entry(key).or_insert(0.0) += w;
            }
        }

        let next = LevelGraph {
            n: n_next,
            edges: merged.into_iter().map(|((i, j), w)| (i, j, w)).collect(),
            self_loops,
        };
        (next, members)
    }

    /// Push an aggregated labeling down one level.
    fn expand(labels: &[usize], members: &[Vec<usize>], n_below: usize) -> Vec<usize> {
        let mut below = vec![0usize; n_below];
        for (agg_node, absorbed) in members.iter().enumerate() {
            for &node in absorbed {
                below[node] = labels[agg_node];
            }
        }
        below
    }
}

impl CommunityDetection for Louvain {
    fn detect(&self, graph: &InteractionGraph) -> Result<Partition> {
        let n = graph.node_count();
        if n == 0 {
            return Err(Error::EmptyGraph);
        }
        if graph.edge_count() == 0 {
            return Ok(Partition::singletons(n));
        }

        let mut level = LevelGraph::from_graph(graph);
        let mut member_stack: Vec<(Vec<Vec<usize>>, usize)> = Vec::new();
        let mut prev_modularity = f64::NEG_INFINITY;

        for level_idx in 0..self.max_levels {
            let (labels, moved) = self.local_moving(&level);
            if !moved {
                break;
            }

            let q = level.modularity(&labels, self.resolution);
            if q - prev_modularity < self.min_gain {
                break;
            }
            prev_modularity = q;

            let n_before = level.n;
            let (next, members) = Self::aggregate(&level, &labels);
            debug!(
                level = level_idx,
                communities = next.n,
                modularity = q,
                "louvain level converged"
            );

            if next.n == n_before {
                break;
            }
            member_stack.push((members, n_before));
            level = next;
        }

        // Identity labeling at the top, expanded down through every level.
        let mut labels: Vec<usize> = (0..level.n).collect();
        while let Some((members, n_below)) = member_stack.pop() {
            labels = Self::expand(&labels, &members, n_below);
        }

        Ok(Partition::from_labels(labels))
    }

    fn resolution(&self) -> f64 {
        self.resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::community::modularity;
    use crate::graph::Interaction;

    fn graph(edges: &[(&str, &str, u32)]) -> InteractionGraph {
        let mut g = InteractionGraph::new();
        for &(a, b, w) in edges {
            g.add_edge(a, b, Interaction::new(w, 1)).unwrap();
        }
        g
    }

    #[test]
    fn test_triangle_one_community() {
        let g = graph(&[("a", "b", 1), ("b", "c", 1), ("a", "c", 1)]);
        let p = Louvain::new().detect(&g).unwrap();
        assert_eq!(p.n_communities(), 1);
    }

    #[test]
    fn test_two_cliques_with_bridge() {
        let g = graph(&[
            ("a0", "a1", 1),
            ("a1", "a2", 1),
            ("a0", "a2", 1),
            ("b0", "b1", 1),
            ("b1", "b2", 1),
            ("b0", "b2", 1),
            ("a2", "b0", 1),
        ]);
        let p = Louvain::new().detect(&g).unwrap();
        let named = p.named(&g);

        assert_eq!(named["a0"], named["a1"]);
        assert_eq!(named["a1"], named["a2"]);
        assert_eq!(named["b0"], named["b1"]);
        assert_eq!(named["b1"], named["b2"]);
        assert_ne!(named["a0"], named["b0"]);
    }

    #[test]
    fn test_improves_on_singletons() {
        let g = graph(&[
            ("a", "b", 3),
            ("b", "c", 1),
            ("c", "d", 3),
            ("d", "a", 1),
        ]);
        let p = Louvain::new().detect(&g).unwrap();
        let q = modularity(&g, &p).unwrap();
        let q0 = modularity(&g, &Partition::singletons(4)).unwrap();
        assert!(q >= q0);
    }

    #[test]
    fn test_weights_drive_grouping() {
        // A 4-cycle with two heavy opposite edges groups the heavy pairs.
        let g = graph(&[
            ("a", "b", 10),
            ("b", "c", 1),
            ("c", "d", 10),
            ("d", "a", 1),
        ]);
        let p = Louvain::new().detect(&g).unwrap();
        let named = p.named(&g);
        assert_eq!(named["a"], named["b"]);
        assert_eq!(named["c"], named["d"]);
        assert_ne!(named["a"], named["c"]);
    }

    #[test]
    fn test_empty_graph_is_error() {
        let g = InteractionGraph::new();
        assert_eq!(Louvain::new().detect(&g).unwrap_err(), Error::EmptyGraph);
    }

    #[test]
    fn test_edgeless_graph_all_singletons() {
        let mut g = InteractionGraph::new();
        let _ = g.add_node("a");
        let _ = g.add_node("b");
        let p = Louvain::new().detect(&g).unwrap();
        assert_eq!(p.n_communities(), 2);
    }

    #[test]
    fn test_deterministic() {
        let build = || {
            graph(&[
                ("a", "b", 2),
                ("b", "c", 1),
                ("a", "c", 2),
                ("c", "d", 1),
                ("d", "e", 2),
                ("e", "f", 1),
                ("d", "f", 2),
            ])
        };
        let p1 = Louvain::new().detect(&build()).unwrap();
        let p2 = Louvain::new().detect(&build()).unwrap();
        assert_eq!(p1, p2);
    }
}
