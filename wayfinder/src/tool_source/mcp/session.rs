//! Stdio MCP session: spawned server process, line-delimited JSON-RPC.

use std::process::Stdio;
use std::time::Duration;

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::tool_source::ToolSourceError;

use super::JsonRpcResponse;

/// How long to wait for a single response line before giving up.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const PROTOCOL_VERSION: &str = "2024-11-05";

#[derive(Debug)]
struct SessionInner {
    // Held so the server process is killed when the session drops.
    _child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

/// One MCP server over stdio. Requests are serialized behind a mutex: a
/// single request/response exchange owns the pipe at a time.
#[derive(Debug)]
pub struct McpSession {
    inner: Mutex<SessionInner>,
}

impl McpSession {
    /// Spawns the server process and runs the initialize handshake.
    pub async fn spawn(
        command: &str,
        args: &[String],
        env: &[(String, String)],
    ) -> Result<Self, ToolSourceError> {
        let mut cmd = Command::new(command);
        cmd.args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        for (k, v) in env {
            cmd.env(k, v);
        }

        let mut child = cmd
            .spawn()
            .map_err(|e| ToolSourceError::Transport(format!("spawn '{command}' failed: {e}")))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ToolSourceError::Transport("child stdin unavailable".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ToolSourceError::Transport("child stdout unavailable".into()))?;

        let session = Self {
            inner: Mutex::new(SessionInner {
                _child: child,
                stdin,
                stdout: BufReader::new(stdout),
            }),
        };

        session.initialize().await?;
        debug!(command = %command, "MCP stdio session initialized");
        Ok(session)
    }

    async fn initialize(&self) -> Result<(), ToolSourceError> {
        let params = serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {},
            "clientInfo": {
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
            },
        });
        self.request("wayfinder-init", "initialize", params).await?;

        let notification = serde_json::json!({
            "jsonrpc": "2.0",
            "method": "notifications/initialized",
        });
        let mut inner = self.inner.lock().await;
        Self::write_line(&mut inner.stdin, &notification).await
    }

    /// Sends one JSON-RPC request and waits for the response with a matching
    /// id. Notifications and unrelated responses on the pipe are skipped.
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

        let mut inner = self.inner.lock().await;
        Self::write_line(&mut inner.stdin, &payload).await?;

        loop {
            let mut line = String::new();
            let read = tokio::time::timeout(REQUEST_TIMEOUT, inner.stdout.read_line(&mut line))
                .await
                .map_err(|_| {
                    ToolSourceError::Timeout(format!("no response to {method} within 30s"))
                })?
                .map_err(|e| ToolSourceError::Transport(format!("read failed: {e}")))?;
            if read == 0 {
                return Err(ToolSourceError::Transport(
                    "server closed stdout before responding".into(),
                ));
            }
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let response: JsonRpcResponse = match serde_json::from_str(line) {
                Ok(r) => r,
                Err(e) => {
                    warn!(error = %e, "skipping non-JSON line from MCP server");
                    continue;
                }
            };
            match &response.id {
                Some(Value::String(s)) if s == id => return response.into_result(),
                // Notification or a response to someone else's id.
                _ => continue,
            }
        }
    }

    async fn write_line(stdin: &mut ChildStdin, payload: &Value) -> Result<(), ToolSourceError> {
        let mut line = serde_json::to_string(payload)
            .map_err(|e| ToolSourceError::Transport(format!("serialize failed: {e}")))?;
        line.push('\n');
        stdin
            .write_all(line.as_bytes())
            .await
            .map_err(|e| ToolSourceError::Transport(format!("write failed: {e}")))?;
        stdin
            .flush()
            .await
            .map_err(|e| ToolSourceError::Transport(format!("flush failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: spawning a nonexistent command fails with a Transport
    /// error naming the command.
    #[tokio::test]
    async fn spawn_nonexistent_command_fails() {
        let err = McpSession::spawn("_no_such_mcp_server_binary_", &[], &[])
            .await
            .unwrap_err();
        match err {
            ToolSourceError::Transport(msg) => {
                assert!(msg.contains("_no_such_mcp_server_binary_"), "{}", msg)
            }
            other => panic!("expected Transport, got {:?}", other),
        }
    }

    /// **Scenario**: a spawned process that answers the handshake with a
    /// matching id completes initialize; `cat`-style echo cannot, so a
    /// process that exits immediately surfaces a closed-pipe error.
    #[tokio::test]
    async fn spawn_process_that_exits_reports_closed_pipe() {
        let err = McpSession::spawn("true", &[], &[]).await.unwrap_err();
        match err {
            ToolSourceError::Transport(msg) => assert!(
                msg.contains("closed") || msg.contains("read"),
                "{}",
                msg
            ),
            ToolSourceError::Timeout(_) => {}
            other => panic!("expected Transport or Timeout, got {:?}", other),
        }
    }
}
