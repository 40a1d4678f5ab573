//! MCP ToolSource: connects to an MCP server via stdio or Streamable HTTP,
//! implements ToolSource.
//!
//! Uses `McpSession` (spawned server process, line-delimited JSON-RPC) or
//! `McpHttpSession` (POST per request); maps MCP tools/list and tools/call to
//! `ToolSpec` and `ToolCallContent`.

mod session;
mod session_http;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::tool_source::{ToolCallContent, ToolSource, ToolSourceError, ToolSpec};

pub use session::McpSession;
pub use session_http::McpHttpSession;

/// JSON-RPC response envelope (shared by both transports).
#[derive(Debug, Deserialize)]
pub(crate) struct JsonRpcResponse {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<JsonRpcErrorBody>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JsonRpcErrorBody {
    #[allow(dead_code)]
    #[serde(default)]
    pub code: i64,
    pub message: String,
}

impl JsonRpcResponse {
    /// Extracts the result payload, mapping a JSON-RPC error to `JsonRpc`.
    pub(crate) fn into_result(self) -> Result<Value, ToolSourceError> {
        if let Some(err) = self.error {
            return Err(ToolSourceError::JsonRpc(err.message));
        }
        self.result
            .ok_or_else(|| ToolSourceError::Transport("response has no result".into()))
    }
}

/// Transport kind: stdio (spawned process) or HTTP (POST to URL).
#[derive(Debug)]
enum McpSessionKind {
    Stdio(McpSession),
    Http(McpHttpSession),
}

/// Tool source backed by an MCP server over stdio or HTTP.
///
/// Use `spawn` for stdio servers (command + args + env from the integration
/// config) and `connect_http` for Streamable HTTP servers. Implements
/// `ToolSource` via `tools/list` and `tools/call`.
#[derive(Debug)]
pub struct McpToolSource {
    session: McpSessionKind,
}

impl McpToolSource {
    /// Spawns the MCP server process, runs the initialize handshake, and
    /// returns a ready source. Fails when the command cannot be started or
    /// the handshake does not complete.
    pub async fn spawn(
        command: &str,
        args: &[String],
        env: &[(String, String)],
    ) -> Result<Self, ToolSourceError> {
        let session = McpSession::spawn(command, args, env).await?;
        Ok(Self {
            session: McpSessionKind::Stdio(session),
        })
    }

    /// Connects to an MCP server over Streamable HTTP (no subprocess).
    /// `headers` are sent on every request (e.g. an API key header).
    pub async fn connect_http(
        url: &str,
        headers: &[(String, String)],
    ) -> Result<Self, ToolSourceError> {
        let session = McpHttpSession::connect(url, headers).await?;
        Ok(Self {
            session: McpSessionKind::Http(session),
        })
    }

    async fn request(
        &self,
        id: &str,
        method: &str,
        params: Value,
    ) -> Result<Value, ToolSourceError> {
        match &self.session {
            McpSessionKind::Stdio(s) => s.request(id, method, params).await,
            McpSessionKind::Http(h) => h.request(id, method, params).await,
        }
    }
}

/// Parses a `tools/list` result payload into `Vec<ToolSpec>`.
fn parse_list_tools_result(result: Value) -> Result<Vec<ToolSpec>, ToolSourceError> {
    let tools_value = result
        .get("tools")
        .cloned()
        .ok_or_else(|| ToolSourceError::Transport("no tools in response".into()))?;
    let tools_array = tools_value
        .as_array()
        .ok_or_else(|| ToolSourceError::Transport("tools not an array".into()))?;
    let mut specs = Vec::with_capacity(tools_array.len());
    for t in tools_array {
        let obj = t
            .as_object()
            .ok_or_else(|| ToolSourceError::Transport("tool item not an object".into()))?;
        let name = obj
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();
        let description = obj
            .get("description")
            .and_then(|v| v.as_str())
            .map(String::from);
        let input_schema = obj
            .get("inputSchema")
            .cloned()
            .unwrap_or(Value::Object(serde_json::Map::new()));
        specs.push(ToolSpec {
            name,
            description,
            input_schema,
        });
    }
    Ok(specs)
}

/// Parses a `tools/call` result payload into `ToolCallContent`.
///
/// An `isError: true` result becomes `ToolSourceError::Failed`; callers tag
/// the transcript record instead of sniffing the text.
fn parse_call_tool_result(result: Value) -> Result<ToolCallContent, ToolSourceError> {
    if result
        .get("isError")
        .and_then(|v| v.as_bool())
        .unwrap_or(false)
    {
        let msg = result
            .get("content")
            .and_then(|c| c.as_array())
            .and_then(|a| a.first())
            .and_then(|b| b.get("text").and_then(|t| t.as_str()))
            .unwrap_or("tool returned error")
            .to_string();
        return Err(ToolSourceError::Failed(msg));
    }
    let mut text_parts = Vec::new();
    if let Some(content_array) = result.get("content").and_then(|c| c.as_array()) {
        for block in content_array {
            if block.get("type").and_then(|t| t.as_str()) == Some("text") {
                if let Some(t) = block.get("text").and_then(|v| v.as_str()) {
                    text_parts.push(t);
                }
            }
        }
    }
    let mut text = text_parts.join("\n").trim().to_string();
    if text.is_empty() {
        if let Some(structured) = result.get("structuredContent") {
            text = serde_json::to_string(structured).unwrap_or_default();
        }
    }
    if text.is_empty() {
        return Err(ToolSourceError::Transport(
            "no text or structuredContent in tools/call response".into(),
        ));
    }
    Ok(ToolCallContent { text })
}

#[async_trait]
impl ToolSource for McpToolSource {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError> {
        let result = self
            .request(
                "wayfinder-tools-list",
                "tools/list",
                Value::Object(serde_json::Map::new()),
            )
            .await?;
        parse_list_tools_result(result)
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<ToolCallContent, ToolSourceError> {
        let id = format!("wayfinder-call-{}", name);
        let params = serde_json::json!({ "name": name, "arguments": arguments });
        let result = self.request(&id, "tools/call", params).await?;
        parse_call_tool_result(result)
    }
}
