use core::fmt;

/// Result alias for `kith`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by graph construction and analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An edge connected a node to itself.
    SelfLoop {
        /// The offending node identifier.
        node: String,
    },

    /// A node index referenced a node outside the graph.
    UnknownNode {
        /// The out-of-range index.
        index: usize,
    },

    /// The graph has no nodes where at least one was required.
    EmptyGraph,

    /// Total edge weight is zero, so modularity is undefined.
    DegenerateGraph,

    /// A per-node map did not match the graph's node count.
    NodeCountMismatch {
        /// Node count of the graph.
        expected: usize,
        /// Length of the supplied map.
        found: usize,
    },

    /// Invalid parameter value.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },

    /// A cooperative cancellation flag was tripped mid-analysis.
    Cancelled,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::SelfLoop { node } => {
                write!(f, "self-loop on node '{node}' is not allowed")
            }
            Error::UnknownNode { index } => {
                write!(f, "node index {index} is not in the graph")
            }
            Error::EmptyGraph => write!(f, "graph has no nodes"),
            Error::DegenerateGraph => {
                write!(f, "total edge weight is zero; modularity is undefined")
            }
            Error::NodeCountMismatch { expected, found } => {
                write!(f, "node count mismatch: graph has {expected}, map has {found}")
            }
            Error::InvalidParameter { name, message } => {
                write!(f, "invalid parameter '{name}': {message}")
            }
            Error::Cancelled => write!(f, "analysis cancelled"),
        }
    }
}

impl std::error::Error for Error {}
