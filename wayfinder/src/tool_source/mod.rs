//! Tool source abstraction: list tools and call a tool.
//!
//! The specialists depend on `ToolSource` instead of a concrete registry;
//! implementations are `McpToolSource` (stdio or Streamable HTTP server) and
//! `MockToolSource` (tests). The `loader` module connects a configured
//! integration and returns its catalog.

mod loader;
mod mock;

mod mcp;

pub use loader::{load_integration, LoadedIntegration, McpServerConfig};
pub use mock::MockToolSource;

pub use mcp::McpToolSource;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Tool specification, aligned with MCP `tools/list` result item.
///
/// **Interaction**: Returned by `ToolSource::list_tools()`; injected into
/// specialist prompts and into `ChatOpenAI::with_tools`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ToolSpec {
    /// Tool name (e.g. used in MCP tools/call).
    pub name: String,
    /// Human-readable description for the LLM.
    pub description: Option<String>,
    /// JSON Schema for arguments (MCP inputSchema).
    pub input_schema: Value,
}

/// Result of a single tool call; aligns with MCP `tools/call` content.
#[derive(Debug, Clone)]
pub struct ToolCallContent {
    /// Result text (e.g. from MCP result.content[].text).
    pub text: String,
}

/// Errors from listing or calling tools.
///
/// **Interaction**: Returned by `ToolSource::list_tools()` and `call_tool()`;
/// the specialist records call failures as error-tagged transcript entries,
/// while the loader maps catalog failures to `AgentError::Config`.
#[derive(Debug, Error)]
pub enum ToolSourceError {
    #[error("tool not found: {0}")]
    NotFound(String),
    #[error("MCP/transport error: {0}")]
    Transport(String),
    #[error("JSON-RPC error: {0}")]
    JsonRpc(String),
    #[error("tool failed: {0}")]
    Failed(String),
    #[error("timed out: {0}")]
    Timeout(String),
    #[error("integration '{0}' advertises no tools")]
    EmptyCatalog(String),
}

/// Source of callable tools: a catalog plus an invocation path.
#[async_trait]
pub trait ToolSource: Send + Sync {
    /// Lists the tool catalog.
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError>;

    /// Calls one tool with JSON arguments.
    async fn call_tool(&self, name: &str, arguments: Value)
        -> Result<ToolCallContent, ToolSourceError>;
}

/// Renders a catalog as `name: description` lines for prompt injection.
pub fn summarize_tools(specs: &[ToolSpec]) -> String {
    specs
        .iter()
        .map(|t| {
            format!(
                "- {}: {}",
                t.name,
                t.description.as_deref().unwrap_or("(no description)")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
