//! Graph engine: nodes, edges, conditional routing and a bounded run loop.
//!
//! Build a `StateGraph`, wire nodes with `add_edge` / `add_conditional_edges`,
//! then `compile()` into an immutable `CompiledStateGraph` and `invoke` it
//! with an initial state.

mod compile_error;
mod compiled;
mod conditional;
mod logging;
mod next;
mod node;
mod state_graph;

pub use compile_error::CompilationError;
pub use compiled::{CompiledStateGraph, DEFAULT_MAX_STEPS};
pub use conditional::{ConditionalRouter, ConditionalRouterFn, NextEntry};
pub use next::Next;
pub use node::Node;
pub use state_graph::{StateGraph, END, START};
