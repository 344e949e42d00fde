//! Community partitions.
//!
//! A [`Partition`] assigns every node of a graph to exactly one community.
//! Labels are indexed by `NodeIndex` and renumbered to consecutive integers
//! `0..n_communities()` on construction, so two partitions describing the
//! same grouping compare equal regardless of the labels they were built
//! from.

use std::collections::BTreeMap;

use petgraph::graph::NodeIndex;

use crate::graph::InteractionGraph;

/// Assignment of each node to a community.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    labels: Vec<usize>,
    n_communities: usize,
}

impl Partition {
    /// Build a partition from raw labels, one per node in index order.
    /// Labels are renumbered to consecutive integers ordered by their
    /// original value.
    pub fn from_labels(labels: Vec<usize>) -> Self {
        let mut unique: Vec<usize> = labels.clone();
        unique.sort_unstable();
        unique.dedup();

        let remap: BTreeMap<usize, usize> = unique
            .iter()
            .enumerate()
            .map(|(new, &old)| (old, new))
            .collect();

        let labels = labels
            .into_iter()
            .map(|l| remap[&l])
            .collect::<Vec<usize>>();

        Self {
            labels,
            n_communities: unique.len(),
        }
    }

    /// The all-singleton partition of `n` nodes.
    pub fn singletons(n: usize) -> Self {
        Self {
            labels: (0..n).collect(),
            n_communities: n,
        }
    }

    /// Number of nodes covered.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the partition covers no nodes.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Community label of a node.
    pub fn label_of(&self, idx: NodeIndex) -> usize {
        self.labels[idx.index()]
    }

    /// Labels in node index order.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Number of communities.
    pub fn n_communities(&self) -> usize {
        self.n_communities
    }

    /// Size of each community, indexed by community label.
    pub fn community_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0usize; self.n_communities];
        for &l in &self.labels {
            sizes[l] += 1;
        }
        sizes
    }

    /// Size of the largest community, or `None` if empty.
    pub fn largest_community(&self) -> Option<usize> {
        self.community_sizes().into_iter().max()
    }

    /// Size of the smallest community, or `None` if empty.
    pub fn smallest_community(&self) -> Option<usize> {
        self.community_sizes().into_iter().min()
    }

    /// Member nodes of each community, indexed by community label.
    pub fn communities(&self) -> Vec<Vec<NodeIndex>> {
        let mut groups = vec![Vec::new(); self.n_communities];
        for (i, &l) in self.labels.iter().enumerate() {
            groups[l].push(NodeIndex::new(i));
        }
        groups
    }

    /// Iterate over `(node, community)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, usize)> + '_ {
        self.labels
            .iter()
            .enumerate()
            .map(|(i, &l)| (NodeIndex::new(i), l))
    }

    /// Name-keyed view of the partition, for reporting.
    pub fn named<'g>(&self, graph: &'g InteractionGraph) -> BTreeMap<&'g str, usize> {
        self.iter()
            .map(|(idx, label)| (graph.node_name(idx), label))
            .collect()
    }
}
