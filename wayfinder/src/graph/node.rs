//! Graph node trait: one step in a StateGraph.
//!
//! Receives state `S`, returns updated `S` and `Next` (continue, jump, or end).
//! Implemented by the supervisor and the specialist agents.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::error::AgentError;

use super::Next;

/// One step in a graph: state in, (state out, next step).
///
/// Used by `StateGraph` to run a single step. The graph runner uses `Next` to
/// choose the next node (Continue = follow the registered edge, Node(id) =
/// jump, End = stop). For nodes with conditional edges the router decides and
/// the returned `Next` is ignored.
#[async_trait]
pub trait Node<S>: Send + Sync
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Node id (e.g. `"supervisor"`). Must be unique within a graph.
    fn id(&self) -> &str;

    /// One step: state in, (state out, next step).
    async fn run(&self, state: S) -> Result<(S, Next), AgentError>;
}
