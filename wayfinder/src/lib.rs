//! Multi-agent travel-planning assistant.
//!
//! A supervisor LLM routes each query between two specialists — navigation
//! and train ticketing — that call external tool servers over MCP. When the
//! supervisor decides the experts are done, the conversation is rendered to a
//! transcript and a second model streams the final answer.
//!
//! The building blocks are reusable on their own:
//! - [`graph`]: a small state graph with conditional edges and a step budget.
//! - [`llm`]: the [`LlmClient`] trait with an OpenAI-compatible client.
//! - [`tool_source`]: MCP tool servers over stdio or Streamable HTTP.
//! - [`workflow`]: the assembled travel graph and [`TravelAgent`] entry point.

pub mod agents;
pub mod config;
pub mod error;
pub mod format;
pub mod graph;
pub mod llm;
pub mod message;
pub mod prompts;
pub mod state;
pub mod tool_source;
pub mod workflow;

pub use config::Settings;
pub use error::AgentError;
pub use format::render_transcript;
pub use graph::{
    CompilationError, CompiledStateGraph, Next, Node, StateGraph, DEFAULT_MAX_STEPS, END, START,
};
pub use llm::{ChatOpenAI, LlmClient, LlmResponse, MessageChunk};
pub use message::{Message, ToolRecord};
pub use state::{RouteDecision, ToolCall, TravelState};
pub use workflow::{stream_final_answer, AnswerStream, TravelAgent};
