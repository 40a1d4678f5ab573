//! Graph compilation error.
//!
//! Returned by `StateGraph::compile` when edges reference unknown nodes or
//! the wiring is structurally invalid.

use thiserror::Error;

/// Error when compiling a state graph (e.g. edge references unknown node).
///
/// Validation ensures every id in edges (except START/END) exists in the node
/// map, exactly one edge leaves START, some path reaches END, and no node has
/// both a plain edge and conditional edges.
#[derive(Debug, Error)]
pub enum CompilationError {
    /// A node id in an edge was not registered via `add_node` (and is not START/END).
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// No edge has from_id == START.
    #[error("graph must have exactly one edge from START")]
    MissingStart,

    /// Nothing reaches END, neither by edge nor by conditional path map.
    #[error("graph must have a path to END")]
    MissingEnd,

    /// Edges branch or cycle where a single chain was expected.
    #[error("invalid edge chain: {0}")]
    InvalidChain(String),

    /// A node has both an outgoing edge and conditional edges; it must have exactly one.
    #[error("node has both edge and conditional edges: {0}")]
    NodeHasBothEdgeAndConditional(String),

    /// A value in a conditional path_map is not a valid node id or END.
    #[error("conditional path_map invalid target: {0}")]
    InvalidConditionalPathMap(String),
}
