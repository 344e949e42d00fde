//! Girvan–Newman divisive community detection.
//!
//! Communities are found by deletion: the edge carrying the most shortest
//! paths (highest edge betweenness) is the most "between" communities, so
//! removing it — repeatedly — peels the graph apart along its natural
//! seams. Every time the removal splits a connected component, the
//! component partition is appended to a [`Dendrogram`], giving the full
//! sequence from one community (on a connected graph) down to singletons.
//!
//! Edge betweenness is computed with Brandes' algorithm: one BFS per
//! source accumulating shortest-path counts (σ) forward and dependencies
//! (δ) backward over the predecessor DAG. Paths are hop-count shortest
//! paths — interaction weights weigh in modularity scoring, not in path
//! length. All edges tied at the maximum are removed in the same step, so
//! the result does not depend on any edge ordering.
//!
//! Each round costs O(V·E) and up to E rounds run, so this is by far the
//! most expensive analysis in the crate. With the `parallel` feature the
//! per-source BFS sweeps run on the rayon thread pool, and a cooperative
//! cancellation flag can abort between rounds.
//!
//! ## References
//!
//! Newman & Girvan (2004). "Finding and evaluating community structure in
//! networks." Brandes (2001). "A faster algorithm for betweenness
//! centrality."

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::modularity::modularity;
use super::traits::CommunityDetection;
use crate::error::{Error, Result};
use crate::graph::InteractionGraph;
use crate::partition::Partition;

/// Girvan–Newman divisive community detection.
#[derive(Debug, Clone, Default)]
pub struct GirvanNewman {
    /// Cap on the number of dendrogram levels to record (0 = unlimited).
    max_levels: usize,
    /// Cooperative cancellation flag, checked once per removal round.
    cancel: Option<Arc<AtomicBool>>,
}

impl GirvanNewman {
    /// Create a new detector producing the full dendrogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop after recording this many dendrogram levels. The initial
    /// component partition counts as a level.
    pub fn with_max_levels(mut self, max_levels: usize) -> Self {
        self.max_levels = max_levels;
        self
    }

    /// Install a cancellation flag. Setting it aborts the computation at
    /// the next removal round with [`Error::Cancelled`].
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Run the divisive splitting to completion, returning the dendrogram.
    ///
    /// Level 0 is the input's component partition; a new level is appended
    /// whenever an edge removal increases the component count, ending at
    /// the all-singleton partition once every edge is gone.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyGraph`] on a graph with no nodes.
    /// - [`Error::Cancelled`] if the cancellation flag trips.
    pub fn dendrogram(&self, graph: &InteractionGraph) -> Result<Dendrogram> {
        if graph.node_count() == 0 {
            return Err(Error::EmptyGraph);
        }

        let mut working = Working::from_graph(graph);
        let mut levels = Vec::new();

        let labels = working.component_labels();
        let mut n_components = count_distinct(&labels);
        levels.push(Partition::from_labels(labels));

        while working.n_alive > 0 && !self.at_level_cap(levels.len()) {
            if let Some(flag) = &self.cancel {
                if flag.load(Ordering::Relaxed) {
                    return Err(Error::Cancelled);
                }
            }

            let scores = working.edge_betweenness();
            let max = working
                .alive_scores(&scores)
                .fold(f64::NEG_INFINITY, f64::max);
            // Remove every edge tied at the maximum in one step; partial
            // removal would make the output depend on edge order.
            let removed = working.remove_where(|id| scores[id] == max);

            let labels = working.component_labels();
            let components = count_distinct(&labels);
            debug!(
                removed,
                components,
                edges_left = working.n_alive,
                "girvan-newman removal round"
            );
            if components > n_components {
                n_components = components;
                levels.push(Partition::from_labels(labels));
            }
        }

        Ok(Dendrogram { levels })
    }

    fn at_level_cap(&self, recorded: usize) -> bool {
        self.max_levels != 0 && recorded >= self.max_levels
    }
}

impl CommunityDetection for GirvanNewman {
    /// Run the full splitting and return the dendrogram level with the
    /// highest modularity. Use [`GirvanNewman::dendrogram`] directly when
    /// the whole split sequence is wanted.
    fn detect(&self, graph: &InteractionGraph) -> Result<Partition> {
        let dendrogram = self.dendrogram(graph)?;
        let (best, _) = dendrogram.best_partition(graph)?;
        Ok(best.clone())
    }
}

/// Ordered sequence of partitions produced by divisive splitting, in
/// split order: level 0 has the fewest communities, the last level one
/// community per node.
#[derive(Debug, Clone)]
pub struct Dendrogram {
    levels: Vec<Partition>,
}

impl Dendrogram {
    /// All recorded levels, in split order.
    pub fn levels(&self) -> &[Partition] {
        &self.levels
    }

    /// Number of recorded levels.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Whether no levels were recorded.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Iterate over the levels in split order.
    pub fn iter(&self) -> impl Iterator<Item = &Partition> {
        self.levels.iter()
    }

    /// The level with maximum modularity, and its score.
    ///
    /// This is the usual selection policy; the dendrogram itself is the
    /// algorithm's output and other policies are equally valid.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyGraph`] on an empty dendrogram.
    /// - Whatever [`modularity`] returns, e.g. [`Error::DegenerateGraph`]
    ///   for a graph with zero total weight.
    pub fn best_partition(&self, graph: &InteractionGraph) -> Result<(&Partition, f64)> {
        let mut best: Option<(&Partition, f64)> = None;
        for level in &self.levels {
            let q = modularity(graph, level)?;
            if best.map_or(true, |(_, best_q)| q > best_q) {
                best = Some((level, q));
            }
        }
        best.ok_or(Error::EmptyGraph)
    }
}

/// Mutable working copy of the graph's structure: a static adjacency with
/// per-edge liveness, so removals never invalidate ids.
struct Working {
    n: usize,
    /// Edge endpoints, indexed by edge id.
    endpoints: Vec<(usize, usize)>,
    /// Liveness per edge id.
    alive: Vec<bool>,
    /// Live + dead incidence: node -> [(neighbor, edge id)].
    adj: Vec<Vec<(usize, usize)>>,
    n_alive: usize,
}

impl Working {
    fn from_graph(graph: &InteractionGraph) -> Self {
        let n = graph.node_count();
        let mut endpoints = Vec::with_capacity(graph.edge_count());
        let mut adj: Vec<Vec<(usize, usize)>> = vec![Vec::new(); n];
        for (a, b, _) in graph.edges() {
            let id = endpoints.len();
            let (i, j) = (a.index(), b.index());
            endpoints.push((i, j));
            adj[i].push((j, id));
            adj[j].push((i, id));
        }
        let n_alive = endpoints.len();
        Self {
            n,
            alive: vec![true; endpoints.len()],
            endpoints,
            adj,
            n_alive,
        }
    }

    fn alive_scores<'a>(&'a self, scores: &'a [f64]) -> impl Iterator<Item = f64> + 'a {
        scores
            .iter()
            .enumerate()
            .filter(|&(id, _)| self.alive[id])
            .map(|(_, &s)| s)
    }

    fn remove_where(&mut self, mut pred: impl FnMut(usize) -> bool) -> usize {
        let mut removed = 0;
        for id in 0..self.alive.len() {
            if self.alive[id] && pred(id) {
                self.alive[id] = false;
                self.n_alive -= 1;
                removed += 1;
            }
        }
        removed
    }

    /// Connected-component label per node, over live edges.
    fn component_labels(&self) -> Vec<usize> {
        let mut labels = vec![usize::MAX; self.n];
        let mut next = 0;
        let mut queue = VecDeque::new();

        for start in 0..self.n {
            if labels[start] != usize::MAX {
                continue;
            }
            labels[start] = next;
            queue.push_back(start);
            while let Some(v) = queue.pop_front() {
                for &(u, id) in &self.adj[v] {
                    if self.alive[id] && labels[u] == usize::MAX {
                        labels[u] = next;
                        queue.push_back(u);
                    }
                }
            }
            next += 1;
        }
        labels
    }

    /// Brandes edge betweenness over live edges, indexed by edge id.
    ///
    /// Unnormalized; every unordered pair contributes twice (once per
    /// direction), uniformly, so the argmax is unaffected. Per-source
    /// contributions are summed in source order even on the thread pool:
    /// a scheduling-dependent association order would perturb floating
    /// sums and with them the tie set at the maximum.
    fn edge_betweenness(&self) -> Vec<f64> {
        #[cfg(feature = "parallel")]
        let per_source: Vec<Vec<f64>> = (0..self.n)
            .into_par_iter()
            .map(|s| self.single_source_dependencies(s))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let per_source: Vec<Vec<f64>> = (0..self.n)
            .map(|s| self.single_source_dependencies(s))
            .collect();

        let mut acc = vec![0.0; self.endpoints.len()];
        for part in per_source {
            for (a, p) in acc.iter_mut().zip(part) {
                *a += p;
            }
        }
        acc
    }

    /// One Brandes sweep: BFS from `source` counting shortest paths, then
    /// back-propagate dependencies over the predecessor DAG, crediting
    /// each predecessor edge.
    fn single_source_dependencies(&self, source: usize) -> Vec<f64> {
        let n = self.n;
        let mut scores = vec![0.0; self.endpoints.len()];

        let mut dist: Vec<i64> = vec![-1; n];
        let mut sigma = vec![0.0f64; n];
        let mut preds: Vec<Vec<(usize, usize)>> = vec![Vec::new(); n];
        let mut order: Vec<usize> = Vec::with_capacity(n);
        let mut queue = VecDeque::new();

        dist[source] = 0;
        sigma[source] = 1.0;
        queue.push_back(source);

        while let Some(v) = queue.pop_front() {
            order.push(v);
            for &(w, id) in &self.adj[v] {
                if !self.alive[id] {
                    continue;
                }
                if dist[w] < 0 {
                    dist[w] = dist[v] + 1;
                    queue.push_back(w);
                }
                if dist[w] == dist[v] + 1 {
                    sigma[w] += sigma[v];
                    preds[w].push((v, id));
                }
            }
        }

        let mut delta = vec![0.0f64; n];
        for &w in order.iter().rev() {
            for &(v, id) in &preds[w] {
                if sigma[w] > 0.0 {
                    let credit = sigma[v] / sigma[w] * (1.0 + delta[w]);
                    scores[id] += credit;
                    delta[v] += credit;
                }
            }
        }
        scores
    }
}

fn count_distinct(labels: &[usize]) -> usize {
    let mut seen: Vec<usize> = labels.to_vec();
    seen.sort_unstable();
    seen.dedup();
    seen.len()
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

    fn two_triangles_with_bridge() -> InteractionGraph {
        graph(&[
            ("a0", "a1"),
            ("a1", "a2"),
            ("a0", "a2"),
            ("b0", "b1"),
            ("b1", "b2"),
            ("b0", "b2"),
            ("a2", "b0"),
        ])
    }

    #[test]
    fn test_first_split_cuts_the_bridge() {
        let g = two_triangles_with_bridge();
        let dendrogram = GirvanNewman::new().dendrogram(&g).unwrap();

        // Level 0: one connected component.
        assert_eq!(dendrogram.levels()[0].n_communities(), 1);

        // Level 1: the bridge has the highest betweenness, so the first
        // split separates the two triangles.
        let split = &dendrogram.levels()[1];
        assert_eq!(split.n_communities(), 2);
        let named = split.named(&g);
        assert_eq!(named["a0"], named["a1"]);
        assert_eq!(named["a1"], named["a2"]);
        assert_eq!(named["b0"], named["b1"]);
        assert_eq!(named["b1"], named["b2"]);
        assert_ne!(named["a0"], named["b0"]);
    }

    #[test]
    fn test_dendrogram_ends_at_singletons() {
        let g = two_triangles_with_bridge();
        let dendrogram = GirvanNewman::new().dendrogram(&g).unwrap();
        let last = dendrogram.levels().last().unwrap();
        assert_eq!(last.n_communities(), g.node_count());
    }

    #[test]
    fn test_levels_strictly_refine() {
        let g = two_triangles_with_bridge();
        let dendrogram = GirvanNewman::new().dendrogram(&g).unwrap();
        let counts: Vec<usize> = dendrogram
            .iter()
            .map(|p| p.n_communities())
            .collect();
        assert!(counts.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_best_partition_is_the_triangles() {
        let g = two_triangles_with_bridge();
        let dendrogram = GirvanNewman::new().dendrogram(&g).unwrap();
        let (best, q) = dendrogram.best_partition(&g).unwrap();
        assert_eq!(best.n_communities(), 2);
        assert!(q > 0.3);
    }

    #[test]
    fn test_trait_detect_returns_best() {
        let g = two_triangles_with_bridge();
        let p = GirvanNewman::new().detect(&g).unwrap();
        assert_eq!(p.n_communities(), 2);
    }

    #[test]
    fn test_disconnected_input() {
        let g = graph(&[("a", "b"), ("x", "y")]);
        let dendrogram = GirvanNewman::new().dendrogram(&g).unwrap();
        assert_eq!(dendrogram.levels()[0].n_communities(), 2);
        let last = dendrogram.levels().last().unwrap();
        assert_eq!(last.n_communities(), 4);
    }

    #[test]
    fn test_empty_graph_is_error() {
        let g = InteractionGraph::new();
        assert_eq!(
            GirvanNewman::new().dendrogram(&g).unwrap_err(),
            Error::EmptyGraph
        );
    }

    #[test]
    fn test_edgeless_graph_single_level() {
        let mut g = InteractionGraph::new();
        let _ = g.add_node("a");
        let _ = g.add_node("b");
        let dendrogram = GirvanNewman::new().dendrogram(&g).unwrap();
        assert_eq!(dendrogram.len(), 1);
        assert_eq!(dendrogram.levels()[0].n_communities(), 2);
    }

    #[test]
    fn test_level_cap() {
        let g = two_triangles_with_bridge();
        let dendrogram = GirvanNewman::new()
            .with_max_levels(1)
            .dendrogram(&g)
            .unwrap();
        assert_eq!(dendrogram.len(), 1);
    }

    #[test]
    fn test_cancellation() {
        let g = two_triangles_with_bridge();
        let flag = Arc::new(AtomicBool::new(true));
        let err = GirvanNewman::new()
            .with_cancel(Arc::clone(&flag))
            .dendrogram(&g)
            .unwrap_err();
        assert_eq!(err, Error::Cancelled);
    }

    #[test]
    fn test_path_removals() {
        // A path keeps splitting until every node stands alone.
        let g = graph(&[("a", "b"), ("b", "c"), ("c", "d")]);
        let dendrogram = GirvanNewman::new().dendrogram(&g).unwrap();
        assert_eq!(
            dendrogram.levels().last().unwrap().n_communities(),
            4
        );
    }
}
