//! k-core decomposition and its derived views.
//!
//! The core number of a node is the largest `k` such that the node survives
//! iterative peeling of all nodes with degree below `k`. Core numbers are
//! computed once per graph snapshot by [`core_numbers`]; the main core,
//! k-shell, k-crust, and k-corona views are pure functions of the graph and
//! a [`CoreNumbers`] map, each returning an independent subgraph.
//!
//! Peeling uses degree buckets: repeatedly take a node from the lowest
//! non-empty bucket, assign it the bucket's level, and demote its remaining
//! neighbors. A neighbor's tracked degree is never lowered beneath the
//! current level, which makes assigned core numbers non-decreasing over the
//! peeling sequence. Ties inside a bucket resolve in insertion order; the
//! final core numbers are independent of that choice.

use std::collections::BTreeMap;

use petgraph::graph::NodeIndex;

use crate::error::{Error, Result};
use crate::graph::InteractionGraph;

/// Core number of every node, indexed by `NodeIndex`.
///
/// A snapshot: mutating the graph it was computed from invalidates it, and
/// the view functions reject a map whose length no longer matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreNumbers {
    core: Vec<u32>,
}

impl CoreNumbers {
    /// Core number of a node.
    pub fn of(&self, idx: NodeIndex) -> u32 {
        self.core[idx.index()]
    }

    /// Largest core number present (the main core's k). Zero on an empty
    /// graph.
    pub fn max_core(&self) -> u32 {
        self.core.iter().copied().max().unwrap_or(0)
    }

    /// Number of nodes covered.
    pub fn len(&self) -> usize {
        self.core.len()
    }

    /// Whether the map covers no nodes.
    pub fn is_empty(&self) -> bool {
        self.core.is_empty()
    }

    /// Iterate over `(node, core number)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, u32)> + '_ {
        self.core
            .iter()
            .enumerate()
            .map(|(i, &k)| (NodeIndex::new(i), k))
    }

    /// Name-keyed view, for reporting.
    pub fn named<'g>(&self, graph: &'g InteractionGraph) -> BTreeMap<&'g str, u32> {
        self.iter()
            .map(|(idx, k)| (graph.node_name(idx), k))
            .collect()
    }

    fn check(&self, graph: &InteractionGraph) -> Result<()> {
        if self.core.len() != graph.node_count() {
            return Err(Error::NodeCountMismatch {
                expected: graph.node_count(),
                found: self.core.len(),
            });
        }
        Ok(())
    }
}

/// Compute the core number of every node by bucketed min-degree peeling.
///
/// An empty graph yields an empty map; isolated nodes get core number 0.
pub fn core_numbers(graph: &InteractionGraph) -> CoreNumbers {
    let n = graph.node_count();
    if n == 0 {
        return CoreNumbers { core: Vec::new() };
    }

    let mut degree: Vec<usize> = (0..n).map(|i| graph.degree(NodeIndex::new(i))).collect();
    let max_degree = degree.iter().copied().max().unwrap_or(0);

    let mut bucket: Vec<Vec<usize>> = vec![Vec::new(); max_degree + 1];
    for (i, &d) in degree.iter().enumerate() {
        bucket[d].push(i);
    }

    let mut core = vec![0u32; n];
    let mut removed = vec![false; n];
    let mut level = 0usize;

    for _ in 0..n {
        // The lowest non-empty bucket never lies below the current level:
        // demotions are clamped to it, so `level` only moves up.
        while level <= max_degree && bucket[level].is_empty() {
            level += 1;
        }
        if level > max_degree {
            break;
        }

        let v = match bucket[level].pop() {
            Some(v) if !removed[v] => v,
            _ => continue,
        };
        removed[v] = true;
        core[v] = level as u32;

        for nbr in graph.neighbors(NodeIndex::new(v)) {
            let u = nbr.index();
            if removed[u] || degree[u] <= level {
                continue;
            }
            let old = degree[u];
            bucket[old].retain(|&w| w != u);
            degree[u] -= 1;
            bucket[old - 1].push(u);
        }
    }

    CoreNumbers { core }
}

/// Subgraph induced by the nodes whose core number equals the maximum.
pub fn main_core(graph: &InteractionGraph, cores: &CoreNumbers) -> Result<InteractionGraph> {
    core_view(graph, cores, cores.max_core(), |c, k| c >= k)
}

/// Subgraph induced by the nodes whose core number is exactly `k`.
pub fn k_shell(graph: &InteractionGraph, cores: &CoreNumbers, k: u32) -> Result<InteractionGraph> {
    core_view(graph, cores, k, |c, k| c == k)
}

/// Subgraph induced by the nodes whose core number is strictly below `k`
/// (the complement of the k-core).
pub fn k_crust(graph: &InteractionGraph, cores: &CoreNumbers, k: u32) -> Result<InteractionGraph> {
    core_view(graph, cores, k, |c, k| c < k)
}

/// Subgraph induced by the nodes with core number ≥ `k` (the k-core).
pub fn k_core(graph: &InteractionGraph, cores: &CoreNumbers, k: u32) -> Result<InteractionGraph> {
    core_view(graph, cores, k, |c, k| c >= k)
}

/// Subgraph induced by the k-shell nodes that have exactly `k` neighbors
/// inside the k-core (neighbors with core number ≥ `k`).
pub fn k_corona(graph: &InteractionGraph, cores: &CoreNumbers, k: u32) -> Result<InteractionGraph> {
    cores.check(graph)?;
    Ok(graph.subgraph_where(|idx| {
        cores.of(idx) == k
            && graph.neighbors(idx).filter(|&nbr| cores.of(nbr) >= k).count() == k as usize
    }))
}

/// The crust of the main core: nodes with core number below the maximum.
pub fn main_crust(graph: &InteractionGraph, cores: &CoreNumbers) -> Result<InteractionGraph> {
    k_crust(graph, cores, cores.max_core())
}

/// The shell at the maximum core number. Identical node set to the main
/// core.
pub fn main_shell(graph: &InteractionGraph, cores: &CoreNumbers) -> Result<InteractionGraph> {
    k_shell(graph, cores, cores.max_core())
}

/// The corona at the maximum core number.
pub fn main_corona(graph: &InteractionGraph, cores: &CoreNumbers) -> Result<InteractionGraph> {
    k_corona(graph, cores, cores.max_core())
}

fn core_view(
    graph: &InteractionGraph,
    cores: &CoreNumbers,
    k: u32,
    select: fn(u32, u32) -> bool,
) -> Result<InteractionGraph> {
    cores.check(graph)?;
    Ok(graph.subgraph_where(|idx| select(cores.of(idx), k)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Interaction;

    fn graph(edges: &[(&str, &str)]) -> InteractionGraph {
        let mut g = InteractionGraph::new();
        for &(a, b) in edges {
            g.add_edge(a, b, Interaction::new(1, 1)).unwrap();
        }
        g
    }

    /// Triangle with a pendant chain: d hangs off the triangle, e off d.
    fn triangle_with_tail() -> InteractionGraph {
        graph(&[("a", "b"), ("b", "c"), ("a", "c"), ("c", "d"), ("d", "e")])
    }

    #[test]
    fn test_empty_graph() {
        let g = InteractionGraph::new();
        let cores = core_numbers(&g);
        assert!(cores.is_empty());
        assert_eq!(cores.max_core(), 0);
    }

    #[test]
    fn test_isolated_node_core_zero() {
        let mut g = InteractionGraph::new();
        let idx = g.add_node("loner");
        let cores = core_numbers(&g);
        assert_eq!(cores.of(idx), 0);
    }

    #[test]
    fn test_path_all_core_one() {
        let g = graph(&[("a", "b"), ("b", "c")]);
        let cores = core_numbers(&g);
        for idx in g.nodes() {
            assert_eq!(cores.of(idx), 1);
        }
    }

    #[test]
    fn test_triangle_core_two() {
        let g = graph(&[("a", "b"), ("b", "c"), ("a", "c")]);
        let cores = core_numbers(&g);
        for idx in g.nodes() {
            assert_eq!(cores.of(idx), 2);
        }
        assert_eq!(cores.max_core(), 2);
    }

    #[test]
    fn test_triangle_with_tail() {
        let g = triangle_with_tail();
        let cores = core_numbers(&g);
        let named = cores.named(&g);
        assert_eq!(named["a"], 2);
        assert_eq!(named["b"], 2);
        assert_eq!(named["c"], 2);
        assert_eq!(named["d"], 1);
        assert_eq!(named["e"], 1);
    }

    #[test]
    fn test_core_number_bounded_by_degree() {
        let g = triangle_with_tail();
        let cores = core_numbers(&g);
        for idx in g.nodes() {
            assert!(cores.of(idx) as usize <= g.degree(idx));
        }
    }

    #[test]
    fn test_main_core_and_crust() {
        let g = triangle_with_tail();
        let cores = core_numbers(&g);

        let core = main_core(&g, &cores).unwrap();
        assert_eq!(core.node_count(), 3);
        assert_eq!(core.edge_count(), 3);
        assert!(core.contains("a") && core.contains("b") && core.contains("c"));

        let crust = main_crust(&g, &cores).unwrap();
        assert_eq!(crust.node_count(), 2);
        assert_eq!(crust.edge_count(), 1);
        assert!(crust.contains("d") && crust.contains("e"));
    }

    #[test]
    fn test_main_core_nonempty_with_edges() {
        let g = graph(&[("a", "b")]);
        let cores = core_numbers(&g);
        assert!(main_core(&g, &cores).unwrap().node_count() > 0);
    }

    #[test]
    fn test_shells_partition_nodes() {
        let g = triangle_with_tail();
        let cores = core_numbers(&g);
        let mut seen = 0usize;
        for k in 0..=cores.max_core() {
            seen += k_shell(&g, &cores, k).unwrap().node_count();
        }
        assert_eq!(seen, g.node_count());
    }

    #[test]
    fn test_kcore_roundtrip() {
        let g = triangle_with_tail();
        let cores = core_numbers(&g);
        for k in 0..=cores.max_core() {
            let sub = k_core(&g, &cores, k).unwrap();
            for name in sub.node_names() {
                let idx = g.node(name).unwrap();
                assert!(cores.of(idx) >= k);
            }
        }
    }

    #[test]
    fn test_corona() {
        // Triangle: every node has core 2 and exactly 2 neighbors in the
        // 2-core, so the corona at k=2 is the whole triangle.
        let g = graph(&[("a", "b"), ("b", "c"), ("a", "c")]);
        let cores = core_numbers(&g);
        let corona = k_corona(&g, &cores, 2).unwrap();
        assert_eq!(corona.node_count(), 3);

        // With the tail attached, c gains a neighbor of core 1, so it
        // still has exactly two neighbors inside the 2-core.
        let g = triangle_with_tail();
        let cores = core_numbers(&g);
        let corona = main_corona(&g, &cores).unwrap();
        assert_eq!(corona.node_count(), 3);
    }

    #[test]
    fn test_stale_cores_rejected() {
        let g = triangle_with_tail();
        let cores = core_numbers(&g);
        let mut g2 = g.clone();
        let _ = g2.add_node("late");
        let err = main_core(&g2, &cores).unwrap_err();
        assert!(matches!(err, Error::NodeCountMismatch { .. }));
    }

    #[test]
    fn test_disconnected_components() {
        // A triangle and a separate edge: cores stay well-defined.
        let g = graph(&[("a", "b"), ("b", "c"), ("a", "c"), ("x", "y")]);
        let cores = core_numbers(&g);
        let named = cores.named(&g);
        assert_eq!(named["x"], 1);
        assert_eq!(named["y"], 1);
        assert_eq!(named["a"], 2);
    }
}
