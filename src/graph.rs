//! Weighted, undirected interaction graph.
//!
//! [`InteractionGraph`] is the input to every analysis in this crate. Nodes
//! are string identifiers (character names); edges carry an interaction
//! weight and the season the interaction belongs to. The graph is a static
//! snapshot: analyses never mutate it, and every derived structure (core
//! numbers, partitions, subgraphs) is an independent copy.
//!
//! Parsing edge-list files into this structure is a caller concern; the
//! graph is built programmatically through [`InteractionGraph::add_edge`].

use std::collections::HashMap;

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use crate::error::{Error, Result};

/// Attributes of a single interaction edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interaction {
    /// Interaction strength (co-occurrence count, at least 1).
    pub weight: u32,
    /// Season the interaction was recorded in.
    pub season: u32,
}

impl Interaction {
    /// Create interaction attributes.
    pub fn new(weight: u32, season: u32) -> Self {
        Self { weight, season }
    }
}

/// Summary of the degree distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DegreeStats {
    /// Smallest degree.
    pub min: usize,
    /// Largest degree.
    pub max: usize,
    /// Mean degree.
    pub mean: f64,
}

/// Weighted, undirected social interaction graph.
///
/// Backed by a `petgraph::UnGraph` with a name index for O(1) lookup.
/// Node indices are contiguous (`0..node_count()`) and stable: nodes are
/// never removed, so a `NodeIndex` handed out by this graph stays valid
/// for the graph's lifetime. Algorithms work in index space; names are
/// the boundary currency for callers.
///
/// Self-loops are rejected. At most one edge exists per unordered pair;
/// adding an edge for an existing pair overwrites its attributes, which
/// matches the "last input line wins" behavior of edge-list formats.
#[derive(Debug, Clone, Default)]
pub struct InteractionGraph {
    graph: UnGraph<String, Interaction>,
    index: HashMap<String, NodeIndex>,
}

impl InteractionGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, returning its index. Idempotent: adding an existing
    /// name returns the original index.
    pub fn add_node(&mut self, name: impl Into<String>) -> NodeIndex {
        let name = name.into();
        if let Some(&idx) = self.index.get(&name) {
            return idx;
        }
        let idx = self.graph.add_node(name.clone());
        let _ = self.index.insert(name, idx);
        idx
    }

    /// Add or update the edge between two named nodes.
    ///
    /// Endpoints are inserted on first mention. If the pair already has an
    /// edge, its attributes are overwritten.
    ///
    /// # Errors
    ///
    /// - [`Error::SelfLoop`] if both endpoints are the same name.
    /// - [`Error::InvalidParameter`] if the weight is zero.
    pub fn add_edge(&mut self, a: &str, b: &str, attrs: Interaction) -> Result<()> {
        if a == b {
            return Err(Error::SelfLoop {
                node: a.to_string(),
            });
        }
        if attrs.weight == 0 {
            return Err(Error::InvalidParameter {
                name: "weight",
                message: "interaction weight must be at least 1",
            });
        }
        let ia = self.add_node(a);
        let ib = self.add_node(b);
        let _ = self.graph.update_edge(ia, ib, attrs);
        Ok(())
    }

    /// Look up a node index by name.
    pub fn node(&self, name: &str) -> Option<NodeIndex> {
        self.index.get(name).copied()
    }

    /// Name of a node.
    pub fn node_name(&self, idx: NodeIndex) -> &str {
        &self.graph[idx]
    }

    /// Whether a node with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Iterate over all node indices.
    pub fn nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// Iterate over all node names.
    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.graph.node_weights().map(String::as_str)
    }

    /// Iterate over the neighbors of a node.
    pub fn neighbors(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors(idx)
    }

    /// Iterate over all edges as `(endpoint, endpoint, attributes)`.
    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex, &Interaction)> {
        self.graph
            .edge_references()
            .map(|e| (e.source(), e.target(), e.weight()))
    }

    /// Number of neighbors of a node.
    pub fn degree(&self, idx: NodeIndex) -> usize {
        self.graph.neighbors(idx).count()
    }

    /// Sum of the weights of a node's incident edges.
    pub fn weighted_degree(&self, idx: NodeIndex) -> f64 {
        self.graph
            .edges(idx)
            .map(|e| f64::from(e.weight().weight))
            .sum()
    }

    /// Total edge weight, counting each edge once. This is `m` in the
    /// modularity formula.
    pub fn total_weight(&self) -> f64 {
        self.graph
            .edge_references()
            .map(|e| f64::from(e.weight().weight))
            .sum()
    }

    /// Attributes of the edge between two nodes, if one exists.
    pub fn edge(&self, a: NodeIndex, b: NodeIndex) -> Option<&Interaction> {
        self.graph
            .find_edge(a, b)
            .and_then(|e| self.graph.edge_weight(e))
    }

    /// Summary of the degree distribution, or `None` for an empty graph.
    pub fn degree_stats(&self) -> Option<DegreeStats> {
        if self.node_count() == 0 {
            return None;
        }
        let mut min = usize::MAX;
        let mut max = 0;
        let mut sum = 0usize;
        for idx in self.nodes() {
            let d = self.degree(idx);
            min = min.min(d);
            max = max.max(d);
            sum += d;
        }
        Some(DegreeStats {
            min,
            max,
            mean: sum as f64 / self.node_count() as f64,
        })
    }

    /// Subgraph induced by a set of nodes: the given nodes plus every edge
    /// whose endpoints are both in the set. O(sum of subset degrees).
    ///
    /// # Errors
    ///
    /// [`Error::UnknownNode`] if any index is out of range.
    pub fn induced_subgraph(&self, nodes: &[NodeIndex]) -> Result<InteractionGraph> {
        let n = self.node_count();
        for &idx in nodes {
            if idx.index() >= n {
                return Err(Error::UnknownNode { index: idx.index() });
            }
        }
        let mut keep = vec![false; n];
        for &idx in nodes {
            keep[idx.index()] = true;
        }
        Ok(self.subgraph_where(|idx| keep[idx.index()]))
    }

    /// Subgraph induced by an edge subset: every edge the predicate keeps,
    /// plus the endpoints of those edges (and only those nodes).
    pub fn edge_subgraph<F>(&self, mut keep: F) -> InteractionGraph
    where
        F: FnMut(NodeIndex, NodeIndex, &Interaction) -> bool,
    {
        let mut out = InteractionGraph::new();
        for (a, b, attrs) in self.edges() {
            if keep(a, b, attrs) {
                // Endpoints are distinct and weights nonzero in any graph
                // built through add_edge, so this cannot fail.
                let ia = out.add_node(self.node_name(a));
                let ib = out.add_node(self.node_name(b));
                let _ = out.graph.update_edge(ia, ib, *attrs);
            }
        }
        out
    }

    /// The interaction network as of a season: edges recorded in that
    /// season or earlier, with their endpoints.
    pub fn season_subgraph(&self, season: u32) -> InteractionGraph {
        self.edge_subgraph(|_, _, attrs| attrs.season <= season)
    }

    /// Node-induced subgraph over a predicate, keeping isolated nodes that
    /// match. Infallible; used by the k-core views.
    pub(crate) fn subgraph_where<F>(&self, mut keep: F) -> InteractionGraph
    where
        F: FnMut(NodeIndex) -> bool,
    {
        let mut out = InteractionGraph::new();
        let mut kept = vec![false; self.node_count()];
        for idx in self.nodes() {
            if keep(idx) {
                kept[idx.index()] = true;
                let _ = out.add_node(self.node_name(idx));
            }
        }
        for (a, b, attrs) in self.edges() {
            if kept[a.index()] && kept[b.index()] {
                let ia = out.add_node(self.node_name(a));
                let ib = out.add_node(self.node_name(b));
                let _ = out.graph.update_edge(ia, ib, *attrs);
            }
        }
        out
    }
}
