//! Maximal clique enumeration.
//!
//! A maximal clique is a set of pairwise-adjacent nodes that cannot be
//! extended by any other node. This module enumerates all of them with the
//! Bron–Kerbosch algorithm using pivot selection: at each level a pivot is
//! chosen from the candidate and excluded sets, and only candidates outside
//! the pivot's neighborhood are branched on. Pivoting prunes branches that
//! cannot yield a maximal clique; the pivot choice affects running time but
//! never the set of cliques produced.
//!
//! The enumeration is materialized (the result is a reusable `Vec`), and
//! [`CliqueStats`] folds the summary statistics callers typically want in a
//! single pass without materializing anything.
//!
//! With the `parallel` feature the top-level branches run on the rayon
//! thread pool; branches are independent once their candidate and excluded
//! sets are snapshotted.
//!
//! ## References
//!
//! Bron & Kerbosch (1973). "Algorithm 457: finding all cliques of an
//! undirected graph." Tomita et al. (2006) analyze the pivoting variant.

use std::collections::HashSet;

use petgraph::graph::NodeIndex;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::graph::InteractionGraph;

/// Summary statistics over all maximal cliques of a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CliqueStats {
    /// Total number of maximal cliques.
    pub count: usize,
    /// Size of the largest maximal clique.
    pub max_size: usize,
    /// Number of maximal cliques of the largest size.
    pub n_max: usize,
}

impl CliqueStats {
    /// Compute count, largest size, and number at the largest size in one
    /// enumeration pass.
    pub fn of(graph: &InteractionGraph) -> Self {
        let adj = adjacency(graph);
        let tasks = root_branches(&adj);

        #[cfg(feature = "parallel")]
        let folded = tasks
            .into_par_iter()
            .map(|task| {
                let mut stats = CliqueStats::default();
                run_branch(&adj, task, &mut |clique| stats.record(clique.len()));
                stats
            })
            .reduce(CliqueStats::default, CliqueStats::merge);

        #[cfg(not(feature = "parallel"))]
        let folded = tasks.into_iter().fold(CliqueStats::default(), |acc, task| {
            let mut stats = CliqueStats::default();
            run_branch(&adj, task, &mut |clique| stats.record(clique.len()));
            acc.merge(stats)
        });

        folded
    }

    fn record(&mut self, size: usize) {
        self.count += 1;
        if size > self.max_size {
            self.max_size = size;
            self.n_max = 1;
        } else if size == self.max_size {
            self.n_max += 1;
        }
    }

    fn merge(self, other: CliqueStats) -> CliqueStats {
        if other.count == 0 {
            return self;
        }
        if self.count == 0 {
            return other;
        }
        let (max_size, n_max) = if self.max_size > other.max_size {
            (self.max_size, self.n_max)
        } else if other.max_size > self.max_size {
            (other.max_size, other.n_max)
        } else {
            (self.max_size, self.n_max + other.n_max)
        };
        CliqueStats {
            count: self.count + other.count,
            max_size,
            n_max,
        }
    }
}

/// Enumerate all maximal cliques of the graph.
///
/// Each clique is a set of node indices; every maximal clique appears
/// exactly once, in no particular order. An empty graph yields an empty
/// collection.
pub fn maximal_cliques(graph: &InteractionGraph) -> Vec<Vec<NodeIndex>> {
    let adj = adjacency(graph);
    let tasks = root_branches(&adj);

    #[cfg(feature = "parallel")]
    let raw: Vec<Vec<usize>> = tasks
        .into_par_iter()
        .map(|task| {
            let mut found = Vec::new();
            run_branch(&adj, task, &mut |clique| found.push(clique.to_vec()));
            found
        })
        .reduce(Vec::new, |mut a, mut b| {
            a.append(&mut b);
            a
        });

    #[cfg(not(feature = "parallel"))]
    let raw: Vec<Vec<usize>> = {
        let mut found = Vec::new();
        for task in tasks {
            run_branch(&adj, task, &mut |clique| found.push(clique.to_vec()));
        }
        found
    };

    raw.into_iter()
        .map(|clique| clique.into_iter().map(NodeIndex::new).collect())
        .collect()
}

/// One top-level Bron–Kerbosch branch: the chosen vertex and its candidate
/// and excluded sets, snapshotted so branches are independent.
struct Branch {
    vertex: usize,
    candidates: Vec<usize>,
    excluded: Vec<usize>,
}

fn adjacency(graph: &InteractionGraph) -> Vec<HashSet<usize>> {
    let n = graph.node_count();
    let mut adj: Vec<HashSet<usize>> = vec![HashSet::new(); n];
    for (a, b, _) in graph.edges() {
        let _ = adj[a.index()].insert(b.index());
        let _ = adj[b.index()].insert(a.index());
    }
    adj
}

/// Split the root call into independent branches.
///
/// Mirrors one level of the recursion: pick a pivot over P ∪ X, then for
/// each candidate outside the pivot's neighborhood snapshot (P ∩ N(v),
/// X ∩ N(v)) and move v from P to X. The snapshots make each branch
/// self-contained, which is what allows them to run in parallel.
fn root_branches(adj: &[HashSet<usize>]) -> Vec<Branch> {
    let n = adj.len();
    let mut p: Vec<usize> = (0..n).collect();
    let mut x: Vec<usize> = Vec::new();
    let mut branches = Vec::new();

    for v in branch_vertices(adj, &p, &x) {
        branches.push(Branch {
            vertex: v,
            candidates: p.iter().copied().filter(|&u| adj[v].contains(&u)).collect(),
            excluded: x.iter().copied().filter(|&u| adj[v].contains(&u)).collect(),
        });
        p.retain(|&u| u != v);
        x.push(v);
    }
    branches
}

/// Candidates to branch on: P minus the pivot's neighborhood, where the
/// pivot is the member of P ∪ X with the most neighbors in P.
fn branch_vertices(adj: &[HashSet<usize>], p: &[usize], x: &[usize]) -> Vec<usize> {
    let pivot = p
        .iter()
        .chain(x.iter())
        .copied()
        .max_by_key(|&u| p.iter().filter(|&&w| adj[u].contains(&w)).count());

    match pivot {
        Some(u) => p.iter().copied().filter(|&v| !adj[u].contains(&v)).collect(),
        None => Vec::new(),
    }
}

fn run_branch(adj: &[HashSet<usize>], branch: Branch, visit: &mut dyn FnMut(&[usize])) {
    let mut current = vec![branch.vertex];
    bron_kerbosch(adj, &mut current, branch.candidates, branch.excluded, visit);
}

/// Recursive Bron–Kerbosch with pivoting.
///
/// `current` is the clique under construction, `p` the candidates that
/// extend it, `x` the nodes already explored. A clique is reported exactly
/// when both `p` and `x` are exhausted.
fn bron_kerbosch(
    adj: &[HashSet<usize>],
    current: &mut Vec<usize>,
    mut p: Vec<usize>,
    mut x: Vec<usize>,
    visit: &mut dyn FnMut(&[usize]),
) {
    if p.is_empty() && x.is_empty() {
        visit(current);
        return;
    }

    for v in branch_vertices(adj, &p, &x) {
        let p_next: Vec<usize> = p.iter().copied().filter(|&u| adj[v].contains(&u)).collect();
        let x_next: Vec<usize> = x.iter().copied().filter(|&u| adj[v].contains(&u)).collect();

        current.push(v);
        bron_kerbosch(adj, current, p_next, x_next, visit);
        let _ = current.pop();

        p.retain(|&u| u != v);
        x.push(v);
    }
}
