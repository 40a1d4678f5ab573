//! Next-step result from a graph node: continue linear chain, jump to a node, or end.

/// Next step after running a node.
///
/// - **Continue**: follow the node's registered outgoing edge.
/// - **Node(id)**: jump to the given node.
/// - **End**: stop; return current state as final result.
///
/// **Interaction**: Returned by `Node::run`; consumed by
/// `CompiledStateGraph::invoke`. Ignored when the node has conditional edges.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Next {
    /// Follow the registered outgoing edge; if none, equivalent to End.
    Continue,
    /// Run the node with the given id next.
    Node(String),
    /// Stop and return the current state.
    End,
}
