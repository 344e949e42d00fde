//! Weighted modularity scoring.

use crate::error::{Error, Result};
use crate::graph::InteractionGraph;
use crate::partition::Partition;

/// Weighted modularity of a partition.
///
/// ```text
/// Q = Σ_c [ e_c/m − (d_c / 2m)² ]
/// ```
///
/// with `m` the total edge weight (each edge once), `e_c` the weight of
/// edges internal to community `c`, and `d_c` the summed weighted degree
/// of its nodes. Q typically lands in [-1, 1].
///
/// # Errors
///
/// - [`Error::NodeCountMismatch`] if the partition does not cover exactly
///   the graph's nodes.
/// - [`Error::DegenerateGraph`] if the total edge weight is zero —
///   modularity is undefined there, and an explicit error beats a NaN.
pub fn modularity(graph: &InteractionGraph, partition: &Partition) -> Result<f64> {
    if partition.len() != graph.node_count() {
        return Err(Error::NodeCountMismatch {
            expected: graph.node_count(),
            found: partition.len(),
        });
    }

    let m = graph.total_weight();
    if m == 0.0 {
        return Err(Error::DegenerateGraph);
    }

    let nc = partition.n_communities();
    let mut internal = vec![0.0f64; nc];
    let mut degree = vec![0.0f64; nc];

    for (a, b, attrs) in graph.edges() {
        let ca = partition.label_of(a);
        let cb = partition.label_of(b);
        let w = f64::from(attrs.weight);
        degree[ca] += w;
        degree[cb] += w;
        if ca == cb {
            internal[ca] += w;
        }
    }

    let q = (0..nc)
        .map(|c| internal[c] / m - (degree[c] / (2.0 * m)).powi(2))
        .sum();
    Ok(q)
}
