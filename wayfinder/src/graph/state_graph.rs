//! State graph: nodes + explicit edges (from → to) and optional conditional edges.
//!
//! Add nodes with `add_node`, define the chain with `add_edge(from, to)` using
//! `START` and `END` for graph entry/exit. Use `add_conditional_edges` to route
//! to the next node based on state. Then `compile` to get a
//! `CompiledStateGraph`.
//!
//! # Conditional edges
//!
//! From a source node, a routing function `(state) -> key` is called; the key
//! is used as the next node id, or looked up in an optional path map. A node
//! must have either one outgoing `add_edge` or `add_conditional_edges`, not
//! both.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::sync::Arc;

use crate::graph::compile_error::CompilationError;
use crate::graph::compiled::{CompiledStateGraph, DEFAULT_MAX_STEPS};
use crate::graph::conditional::{ConditionalRouter, ConditionalRouterFn, NextEntry};
use crate::graph::node::Node;

/// Sentinel for graph entry: use as `from_id` in `add_edge(START, first_node_id)`.
pub const START: &str = "__start__";

/// Sentinel for graph exit: use as `to_id` in `add_edge(last_node_id, END)`.
pub const END: &str = "__end__";

/// State graph: nodes plus explicit edges and optional conditional edges.
///
/// Generic over state type `S`. Build with `add_node` / `add_edge(from, to)`
/// (use `START` and `END` for entry/exit), and optionally
/// `add_conditional_edges` for state-based routing. Then `compile()` to obtain
/// an executable graph.
///
/// **Interaction**: Accepts `Arc<dyn Node<S>>`; produces `CompiledStateGraph<S>`.
pub struct StateGraph<S> {
    nodes: HashMap<String, Arc<dyn Node<S>>>,
    /// Edges (from_id, to_id). A node may have one outgoing edge or conditional_edges, not both.
    edges: Vec<(String, String)>,
    /// Conditional edges: source node id -> router. Next node is resolved from state at runtime.
    conditional_edges: HashMap<String, ConditionalRouter<S>>,
    /// Upper bound on node executions per invoke.
    max_steps: u32,
}

impl<S> Default for StateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> StateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Creates an empty graph with the default step budget.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            edges: Vec::new(),
            conditional_edges: HashMap::new(),
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    /// Sets the step budget: the maximum number of node executions per
    /// `invoke`. Exceeding it is `AgentError::StepBudgetExhausted`.
    pub fn with_max_steps(self, max_steps: u32) -> Self {
        Self { max_steps, ..self }
    }

    /// Adds a node; id must be unique. Replaces if same id.
    pub fn add_node(&mut self, id: impl Into<String>, node: Arc<dyn Node<S>>) -> &mut Self {
        self.nodes.insert(id.into(), node);
        self
    }

    /// Adds an edge from `from_id` to `to_id`.
    ///
    /// Use `START` for graph entry and `END` for graph exit. Both ids (except
    /// START/END) must be registered via `add_node` before `compile()`.
    pub fn add_edge(&mut self, from_id: impl Into<String>, to_id: impl Into<String>) -> &mut Self {
        self.edges.push((from_id.into(), to_id.into()));
        self
    }

    /// Adds conditional edges from `source` node: next node is determined by
    /// `path(state)`.
    ///
    /// After the source node runs, `path` is called with the updated state;
    /// its return value is used as the next node id, or looked up in
    /// `path_map` when provided. All path_map values must be valid node ids or
    /// `END` at compile time. A key with no map entry passes through; if it
    /// matches no node at runtime, the run loop stops with a configuration
    /// error.
    pub fn add_conditional_edges(
        &mut self,
        source: impl Into<String>,
        path: ConditionalRouterFn<S>,
        path_map: Option<HashMap<String, String>>,
    ) -> &mut Self {
        self.conditional_edges
            .insert(source.into(), ConditionalRouter::new(path, path_map));
        self
    }

    /// Builds the executable graph: validates that all edge node ids exist,
    /// exactly one edge leaves START, and some path reaches END.
    ///
    /// Returns `CompilationError` if any edge references an unknown node or
    /// the wiring is invalid. On success, the graph is immutable and ready for
    /// `invoke`.
    pub fn compile(self) -> Result<CompiledStateGraph<S>, CompilationError> {
        for (from, to) in &self.edges {
            if from != START && !self.nodes.contains_key(from) {
                return Err(CompilationError::NodeNotFound(from.clone()));
            }
            if to != END && !self.nodes.contains_key(to) {
                return Err(CompilationError::NodeNotFound(to.clone()));
            }
        }
        for (source, router) in &self.conditional_edges {
            if !self.nodes.contains_key(source) {
                return Err(CompilationError::NodeNotFound(source.clone()));
            }
            if let Some(ref path_map) = router.path_map {
                for target in path_map.values() {
                    if target != END && !self.nodes.contains_key(target) {
                        return Err(CompilationError::InvalidConditionalPathMap(target.clone()));
                    }
                }
            }
        }

        let start_edges: Vec<_> = self
            .edges
            .iter()
            .filter(|(f, _)| f == START)
            .map(|(_, t)| t.clone())
            .collect();
        let first = match start_edges.len() {
            0 => return Err(CompilationError::MissingStart),
            1 => start_edges.into_iter().next().ok_or_else(|| {
                CompilationError::InvalidChain("start edge vanished".into())
            })?,
            _ => {
                return Err(CompilationError::InvalidChain(
                    "multiple edges from START (branch)".into(),
                ))
            }
        };

        let has_end = self.edges.iter().any(|(_, t)| t == END)
            || self.conditional_edges.values().any(|r| {
                r.path_map
                    .as_ref()
                    .map_or(true, |m| m.values().any(|v| v == END))
            });
        if !has_end {
            return Err(CompilationError::MissingEnd);
        }

        let edge_froms: HashSet<_> = self
            .edges
            .iter()
            .filter(|(f, _)| f.as_str() != START)
            .map(|(f, _)| f.clone())
            .collect();
        if edge_froms.len()
            != self
                .edges
                .iter()
                .filter(|(f, _)| f.as_str() != START)
                .count()
        {
            return Err(CompilationError::InvalidChain(
                "duplicate from (branch)".into(),
            ));
        }
        for source in self.conditional_edges.keys() {
            if edge_froms.contains(source) {
                return Err(CompilationError::NodeHasBothEdgeAndConditional(
                    source.clone(),
                ));
            }
        }

        let mut next_map: HashMap<String, NextEntry<S>> = self
            .edges
            .iter()
            .filter(|(f, _)| f.as_str() != START)
            .map(|(f, t)| (f.clone(), NextEntry::Unconditional(t.clone())))
            .collect();
        for (source, router) in &self.conditional_edges {
            next_map.insert(source.clone(), NextEntry::Conditional(router.clone()));
        }

        Ok(CompiledStateGraph {
            nodes: self.nodes,
            first_node_id: first,
            next_map,
            max_steps: self.max_steps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;

    use crate::graph::Node;

    #[derive(Clone, Debug)]
    #[allow(dead_code)]
    struct DummyState(i32);

    #[derive(Clone)]
    struct DummyNode(&'static str);

    #[async_trait]
    impl Node<DummyState> for DummyNode {
        fn id(&self) -> &str {
            self.0
        }
        async fn run(
            &self,
            state: DummyState,
        ) -> Result<(DummyState, crate::graph::Next), crate::error::AgentError> {
            Ok((state, crate::graph::Next::Continue))
        }
    }

    /// **Scenario**: Compile fails when an edge references an unregistered node.
    #[test]
    fn compile_fails_on_unknown_edge_target() {
        let mut graph = StateGraph::<DummyState>::new();
        graph.add_node("a", Arc::new(DummyNode("a")));
        graph.add_edge(START, "a");
        graph.add_edge("a", "ghost");
        let result = graph.compile();
        match result {
            Err(CompilationError::NodeNotFound(id)) => assert_eq!(id, "ghost"),
            other => panic!("expected NodeNotFound(ghost), got {:?}", other.err()),
        }
    }

    /// **Scenario**: Compile fails when a node has both an outgoing edge and
    /// conditional edges.
    #[test]
    fn compile_fails_when_node_has_both_edge_and_conditional() {
        let mut graph = StateGraph::<DummyState>::new();
        graph.add_node("a", Arc::new(DummyNode("a")));
        graph.add_node("b", Arc::new(DummyNode("b")));
        graph.add_edge(START, "a");
        graph.add_edge("a", "b");
        graph.add_edge("b", END);
        graph.add_conditional_edges(
            "a",
            Arc::new(|_| "b".to_string()),
            Some([("b".to_string(), "b".to_string())].into_iter().collect()),
        );
        let result = graph.compile();
        match result {
            Err(CompilationError::NodeHasBothEdgeAndConditional(id)) => assert_eq!(id, "a"),
            other => panic!(
                "expected NodeHasBothEdgeAndConditional(a), got {:?}",
                other.err()
            ),
        }
    }

    /// **Scenario**: Compile fails when conditional path_map references a
    /// non-existent node.
    #[test]
    fn compile_fails_when_conditional_path_map_has_invalid_target() {
        let mut graph = StateGraph::<DummyState>::new();
        graph.add_node("a", Arc::new(DummyNode("a")));
        graph.add_edge(START, "a");
        graph.add_conditional_edges(
            "a",
            Arc::new(|_| "x".to_string()),
            Some(
                [("x".to_string(), "nonexistent".to_string())]
                    .into_iter()
                    .collect(),
            ),
        );
        let result = graph.compile();
        match result {
            Err(CompilationError::InvalidConditionalPathMap(id)) => assert_eq!(id, "nonexistent"),
            other => panic!(
                "expected InvalidConditionalPathMap(nonexistent), got {:?}",
                other.err()
            ),
        }
    }

    /// **Scenario**: Compile fails when no edge leaves START.
    #[test]
    fn compile_fails_without_start_edge() {
        let mut graph = StateGraph::<DummyState>::new();
        graph.add_node("a", Arc::new(DummyNode("a")));
        graph.add_edge("a", END);
        assert!(matches!(
            graph.compile(),
            Err(CompilationError::MissingStart)
        ));
    }

    /// **Scenario**: Compile fails when nothing can reach END.
    #[test]
    fn compile_fails_without_end() {
        let mut graph = StateGraph::<DummyState>::new();
        graph.add_node("a", Arc::new(DummyNode("a")));
        graph.add_node("b", Arc::new(DummyNode("b")));
        graph.add_edge(START, "a");
        graph.add_edge("a", "b");
        assert!(matches!(graph.compile(), Err(CompilationError::MissingEnd)));
    }

    /// **Scenario**: A conditional path_map that maps a key to END satisfies
    /// the reach-END validation even with no plain edge to END.
    #[test]
    fn compile_accepts_end_via_conditional_path_map() {
        let mut graph = StateGraph::<DummyState>::new();
        graph.add_node("a", Arc::new(DummyNode("a")));
        graph.add_edge(START, "a");
        graph.add_conditional_edges(
            "a",
            Arc::new(|_| "stop".to_string()),
            Some([("stop".to_string(), END.to_string())].into_iter().collect()),
        );
        assert!(graph.compile().is_ok());
    }
}
