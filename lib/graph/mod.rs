//! The mutable diagram model: nodes typed by generator kind, wires typed by
//! connection kind, node labels carrying symbolic phase values.
//!
//! Diagrams are represented as an undirected graph with data attached to both
//! nodes and edges, plus a structural pairing relation between W-input and
//! W-output nodes. Every node and edge is given a unique index for
//! identification purposes; indices are never reused while the node or edge
//! exists.
//!
//! All mutating operations either fully apply or fail before taking effect;
//! the invariants of the calculus (total, symmetric W pairing; W-input arity
//! limits; single ordinary wire per node pair) are enforced here, not by
//! callers.

use thiserror::Error;

/// Errors for fallible operations on diagrams.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Returned when a node does not exist under a given ID.
    #[error("missing node {0}")]
    MissingNode(NodeId),

    /// Returned when an edge does not exist under a given ID.
    #[error("missing edge {0}")]
    MissingEdge(EdgeId),

    /// Returned when attempting to add a self-loop.
    #[error("invalid edge: self-loop on node {0}")]
    InvalidEdgeLoop(NodeId),

    /// Returned when attempting to add a second, differently-kinded wire
    /// between two nodes.
    #[error("invalid edge: nodes {0}, {1} are already joined by a wire of a different kind")]
    InvalidEdgeKindClash(NodeId, NodeId),

    /// Returned when attempting to join a W input directly to its paired W
    /// output, which would duplicate the implicit pairing edge.
    #[error("invalid edge: nodes {0}, {1} are a paired W input/output")]
    InvalidEdgeWPair(NodeId, NodeId),

    /// Returned when attempting to attach a third ordinary wire to a W input.
    #[error("invalid edge: W input {0} already carries two wires")]
    InvalidEdgeWArity(NodeId),

    /// Returned when a removal set contains a W node but not its partner.
    #[error("cannot remove W node {0} without its partner")]
    DanglingWPartner(NodeId),

    /// Returned when attempting to retype or rephase a boundary or W node, or
    /// to set a qubit index on a non-boundary node.
    #[error("operation unsupported for {0} nodes")]
    UnsupportedForKind(NodeKind),

    /// Returned when attempting to create or retype into a lone W node; W
    /// nodes only exist in input/output pairs.
    #[error("W nodes must be created in input/output pairs")]
    UnpairedW,

    /// I/O error when writing a diagram to a file.
    #[error("I/O error: {0}")]
    IOError(#[from] std::io::Error),
}
pub type GraphResult<T> = Result<T, GraphError>;

pub(crate) mod node;
pub use node::*;

pub(crate) mod diagram;
pub use diagram::*;

/// Identifies a node in a diagram.
pub type NodeId = usize;

/// Identifies an edge in a diagram.
pub type EdgeId = usize;
