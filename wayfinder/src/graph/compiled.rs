//! Compiled state graph: immutable, supports invoke only.
//!
//! Built by `StateGraph::compile`. Holds nodes and the routing map derived
//! from explicit and conditional edges at compile time.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use crate::error::AgentError;

use super::conditional::NextEntry;
use super::logging::{
    log_graph_complete, log_graph_error, log_graph_start, log_node_complete, log_node_start,
    log_node_state,
};
use super::state_graph::END;
use super::{Next, Node};

/// Default upper bound on node executions per invoke.
pub const DEFAULT_MAX_STEPS: u32 = 32;

/// Compiled graph: immutable structure, supports invoke only.
///
/// Created by `StateGraph::compile()`. Runs from the first node; after each
/// node, uses the conditional router (when present) or the node's returned
/// `Next` to choose the next node. Every invoke is bounded by `max_steps`.
#[derive(Clone)]
pub struct CompiledStateGraph<S> {
    pub(super) nodes: HashMap<String, Arc<dyn Node<S>>>,
    /// First node to run (from START).
    pub(super) first_node_id: String,
    /// Map from node id to how to get next: Unconditional(to_id) or Conditional(router).
    pub(super) next_map: HashMap<String, NextEntry<S>>,
    /// Upper bound on node executions per invoke.
    pub(super) max_steps: u32,
}

impl<S> CompiledStateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Runs the graph with the given state. Starts at the first node; after
    /// each node, resolves the next node and repeats until END.
    ///
    /// - Conditional router (when the node has conditional edges): its result
    ///   is the next node id or END. A result that is neither a registered
    ///   node nor END is `AgentError::Config`; no further nodes execute.
    /// - `Next::Continue`: follow the node's registered outgoing edge.
    /// - `Next::Node(id)`: run the node with that id next.
    /// - `Next::End`: stop and return current state.
    ///
    /// Exceeding `max_steps` node executions is
    /// `AgentError::StepBudgetExhausted`.
    pub async fn invoke(&self, state: S) -> Result<S, AgentError> {
        if self.nodes.is_empty() || !self.nodes.contains_key(&self.first_node_id) {
            return Err(AgentError::ExecutionFailed("empty graph".into()));
        }
        let mut state = state;
        let mut current_id = self.first_node_id.clone();
        let mut steps: u32 = 0;

        log_graph_start();

        loop {
            let node = self
                .nodes
                .get(&current_id)
                .ok_or_else(|| {
                    AgentError::Config(format!(
                        "routing target '{current_id}' matches no registered node"
                    ))
                })?
                .clone();

            steps += 1;
            if steps > self.max_steps {
                let err = AgentError::StepBudgetExhausted {
                    limit: self.max_steps,
                };
                log_graph_error(&err);
                return Err(err);
            }

            log_node_start(&current_id);
            log_node_state(&current_id, &state);

            let (new_state, next) = match node.run(state.clone()).await {
                Ok(output) => output,
                Err(e) => {
                    log_graph_error(&e);
                    return Err(e);
                }
            };

            log_node_complete(&current_id, &next);
            state = new_state;

            let next_id: Option<String> =
                if let Some(NextEntry::Conditional(router)) = self.next_map.get(&current_id) {
                    let target = router.resolve_next(&state);
                    tracing::debug!(
                        from = %current_id,
                        to = %target,
                        "conditional routing"
                    );
                    Some(target)
                } else {
                    match next {
                        Next::End => None,
                        Next::Node(id) => Some(id),
                        Next::Continue => self.next_map.get(&current_id).and_then(|e| {
                            if let NextEntry::Unconditional(id) = e {
                                Some(id.clone())
                            } else {
                                None
                            }
                        }),
                    }
                };

            let should_end = next_id.is_none() || next_id.as_deref() == Some(END);
            if should_end {
                log_graph_complete();
                return Ok(state);
            }
            if let Some(id) = next_id {
                if !self.nodes.contains_key(&id) {
                    let err = AgentError::Config(format!(
                        "routing target '{id}' matches no registered node"
                    ));
                    log_graph_error(&err);
                    return Err(err);
                }
                current_id = id;
            }
        }
    }
}
