//! # kith
//!
//! Analysis of weighted, undirected social interaction networks: maximal
//! cliques, k-core decomposition, and community detection scored by
//! modularity.
//!
//! The crate consumes an already-built [`InteractionGraph`] (parsing edge
//! lists and rendering results are caller concerns) and produces
//! independent snapshots: clique sets, core-number maps, derived
//! subgraphs, and partitions. Every analysis treats the graph as
//! immutable.
//!
//! ```rust
//! use kith::{
//!     core_numbers, main_core, maximal_cliques, modularity,
//!     CommunityDetection, Interaction, InteractionGraph, Louvain,
//! };
//!
//! let mut g = InteractionGraph::new();
//! g.add_edge("arya", "sandor", Interaction::new(12, 4))?;
//! g.add_edge("arya", "jon", Interaction::new(5, 1))?;
//! g.add_edge("jon", "sansa", Interaction::new(8, 6))?;
//!
//! let cliques = maximal_cliques(&g);
//! let cores = core_numbers(&g);
//! let core = main_core(&g, &cores)?;
//!
//! let partition = Louvain::new().detect(&g)?;
//! let q = modularity(&g, &partition)?;
//! assert_eq!(partition.len(), g.node_count());
//! assert!(!cliques.is_empty() && core.node_count() > 0 && q <= 1.0);
//! # Ok::<(), kith::Error>(())
//! ```
//!
//! The `parallel` feature (default) runs clique enumeration and edge
//! betweenness on the rayon thread pool.

pub mod clique;
pub mod community;
/// Error types used across `kith`.
pub mod error;
pub mod graph;
pub mod kcore;
pub mod partition;

pub use clique::{maximal_cliques, CliqueStats};
pub use community::{modularity, CommunityDetection, Dendrogram, GirvanNewman, Louvain};
pub use error::{Error, Result};
pub use graph::{DegreeStats, Interaction, InteractionGraph};
pub use kcore::{
    core_numbers, k_core, k_corona, k_crust, k_shell, main_core, main_corona, main_crust,
    main_shell, CoreNumbers,
};
pub use partition::Partition;
