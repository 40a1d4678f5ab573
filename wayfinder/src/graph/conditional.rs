//! Conditional edges: route to the next node based on state.
//!
//! A source node has a routing function that takes the current state and
//! returns a key; the key is either used as the next node id or looked up in
//! an optional path map.
//!
//! **Interaction**: Used by `StateGraph::add_conditional_edges` and the
//! `CompiledStateGraph` run loop to resolve the next node after a node with
//! conditional edges runs.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

/// Router function: takes a reference to state and returns a routing key.
pub type ConditionalRouterFn<S> = Arc<dyn Fn(&S) -> String + Send + Sync>;

/// Conditional edge definition: routing function plus optional path map.
///
/// - When `path_map` is `None`, the router's return value is used directly as
///   the next node id.
/// - When `path_map` is `Some(map)`, the router's return value is used as the
///   key; the next node id is `map[key]` if present, otherwise the key itself.
#[derive(Clone)]
pub struct ConditionalRouter<S> {
    /// Function that returns a routing key from the current state.
    pub(super) path: ConditionalRouterFn<S>,
    /// Optional map from routing key to node id (or END).
    pub(super) path_map: Option<HashMap<String, String>>,
}

impl<S> ConditionalRouter<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Builds a conditional router with an optional path map.
    pub fn new(path: ConditionalRouterFn<S>, path_map: Option<HashMap<String, String>>) -> Self {
        Self { path, path_map }
    }

    /// Resolves the next node id from the current state.
    ///
    /// Returns the node id (or END) to run next. A key with no path_map entry
    /// passes through unchanged; the run loop rejects it as a configuration
    /// error when it names no registered node.
    pub fn resolve_next(&self, state: &S) -> String {
        let key = (self.path)(state);
        self.path_map
            .as_ref()
            .and_then(|m| m.get(&key))
            .cloned()
            .unwrap_or(key)
    }
}

/// How to determine the next node after a given node runs.
#[derive(Clone)]
pub enum NextEntry<S> {
    /// Single fixed next node (or END). Node's `Next` is still respected.
    Unconditional(String),
    /// Next node is decided by the router from state; the node's `Next` is ignored.
    Conditional(ConditionalRouter<S>),
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: a path_map maps keys to node ids; an unmapped key passes
    /// through as itself.
    #[test]
    fn resolve_next_uses_path_map_with_passthrough() {
        let path_map: HashMap<String, String> =
            [("terminate".to_string(), "__end__".to_string())]
                .into_iter()
                .collect();
        let router = ConditionalRouter::<i32>::new(
            Arc::new(|s: &i32| {
                if *s > 0 {
                    "terminate".into()
                } else {
                    "mystery".into()
                }
            }),
            Some(path_map),
        );
        assert_eq!(router.resolve_next(&1), "__end__");
        assert_eq!(router.resolve_next(&0), "mystery");
    }
}
