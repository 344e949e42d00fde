//! Community detection for interaction networks.
//!
//! Given a weighted graph, find groupings where nodes inside a group
//! interact densely and interactions between groups are sparse.
//!
//! ## The Modularity Objective
//!
//! Both detectors here are judged by **modularity** Q, which compares the
//! edge weight observed inside communities to the weight expected in a
//! random graph with the same degree sequence:
//!
//! ```text
//! Q = Σ_c [ e_c/m − (d_c / 2m)² ]
//! ```
//!
//! Where:
//! - m = total edge weight (each edge counted once)
//! - e_c = weight of edges with both endpoints in community c
//! - d_c = sum of weighted degrees of the nodes in c
//!
//! **Intuition**: for each community we add (observed internal weight) −
//! (expected internal weight). A good partition has Q > 0, meaning more
//! internal interaction than chance would give. Modularity is undefined on
//! an edgeless graph; [`modularity`] reports that as an error rather than
//! dividing by zero.
//!
//! ## Algorithms
//!
//! ### Louvain
//!
//! Greedy agglomerative optimization ([Blondel et al. 2008]): repeatedly
//! move nodes to the neighboring community with the largest modularity
//! gain, then contract communities into single nodes and repeat. Fast, and
//! the result is a local optimum — deterministic here because nodes are
//! visited in insertion order.
//!
//! ### Girvan–Newman
//!
//! Divisive splitting ([Newman & Girvan 2004]): repeatedly remove the
//! edge(s) carrying the most shortest paths (edge betweenness, computed
//! with Brandes' algorithm), recording a partition every time a component
//! splits. Produces a full [`Dendrogram`] from one community down to
//! singletons; callers typically keep the level with maximum modularity.
//! Far more expensive than Louvain, but the split sequence itself is often
//! the interesting output.
//!
//! [Blondel et al. 2008]: https://arxiv.org/abs/0803.0476
//! [Newman & Girvan 2004]: https://arxiv.org/abs/cond-mat/0308217

mod girvan_newman;
mod louvain;
mod modularity;
mod traits;

pub use girvan_newman::{Dendrogram, GirvanNewman};
pub use louvain::Louvain;
pub use modularity::modularity;
pub use traits::CommunityDetection;
