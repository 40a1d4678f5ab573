//! Streamable HTTP MCP session: one POST per JSON-RPC request.
//!
//! The server may answer with plain JSON or with an SSE body whose final
//! `data:` line carries the JSON-RPC response; both shapes are accepted.

use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::tool_source::ToolSourceError;

use super::JsonRpcResponse;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const PROTOCOL_VERSION: &str = "2024-11-05";

/// One MCP server over Streamable HTTP.
#[derive(Debug)]
pub struct McpHttpSession {
    client: reqwest::Client,
    url: String,
    headers: Vec<(String, String)>,
}

impl McpHttpSession {
    /// Builds the client and runs the initialize handshake against `url`.
    pub async fn connect(
        url: &str,
        headers: &[(String, String)],
    ) -> Result<Self, ToolSourceError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ToolSourceError::Transport(format!("http client build failed: {e}")))?;
        let session = Self {
            client,
            url: url.to_string(),
            headers: headers.to_vec(),
        };

        let params = serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {},
            "clientInfo": {
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
            },
        });
        session.request("wayfinder-init", "initialize", params).await?;
        debug!(url = %url, "MCP http session initialized");
        Ok(session)
    }

    /// Sends one JSON-RPC request as a POST and parses the response body.
    pub async fn request(
        &self,
        id: &str,
        method: &str,
        params: Value,
    ) -> Result<Value, ToolSourceError> {
        let payload = serde_json::json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let mut req = self
            .client
            .post(&self.url)
            .header("Accept", "application/json, text/event-stream")
            .json(&payload);
        for (k, v) in &self.headers {
            req = req.header(k.as_str(), v.as_str());
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                ToolSourceError::Timeout(format!("no response to {method} within 30s"))
            } else {
                ToolSourceError::Transport(format!("http request failed: {e}"))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ToolSourceError::Transport(format!("read body failed: {e}")))?;
        if !status.is_success() {
            return Err(ToolSourceError::Transport(format!(
                "http status {status}: {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        parse_response_body(&body)?.into_result()
    }
}

/// Parses either a plain JSON body or an SSE body (last `data:` line wins).
fn parse_response_body(body: &str) -> Result<JsonRpcResponse, ToolSourceError> {
    let json_text = if body.contains("data:") && !body.trim_start().starts_with('{') {
        body.lines()
            .filter_map(|l| l.strip_prefix("data:"))
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .last()
            .ok_or_else(|| ToolSourceError::Transport("SSE body has no data lines".into()))?
            .to_string()
    } else {
        body.trim().to_string()
    };
    serde_json::from_str(&json_text)
        .map_err(|e| ToolSourceError::Transport(format!("invalid JSON-RPC body: {e}")))
}
