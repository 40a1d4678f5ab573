//! Tool registry loader: integration config file → connected tool source.
//!
//! Reads a JSON config keyed by integration name (the usual `mcpServers`
//! shape: command/args/env for stdio servers, url/headers for Streamable
//! HTTP), connects, and lists the catalog once. Any failure — unreachable
//! server, malformed metadata, or an empty catalog — aborts initialization;
//! there is no partial-capability mode.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::error::AgentError;

use super::{summarize_tools, McpToolSource, ToolSource, ToolSourceError, ToolSpec};

/// One server entry in the integration config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum McpServerConfig {
    /// Spawned stdio server.
    Stdio {
        command: String,
        #[serde(default)]
        args: Vec<String>,
        #[serde(default)]
        env: HashMap<String, String>,
    },
    /// Streamable HTTP server.
    Http {
        url: String,
        #[serde(default)]
        headers: HashMap<String, String>,
    },
}

#[derive(Debug, Deserialize)]
struct McpConfigFile {
    #[serde(rename = "mcpServers")]
    mcp_servers: HashMap<String, McpServerConfig>,
}

/// A connected integration: the live source plus its catalog and the
/// rendered tool summary for prompt injection.
#[derive(Debug)]
pub struct LoadedIntegration {
    pub name: String,
    pub source: Arc<McpToolSource>,
    pub specs: Vec<ToolSpec>,
    pub summary: String,
}

/// Reads the named server entry from the config file.
fn read_server_config(config_path: &Path, name: &str) -> Result<McpServerConfig, AgentError> {
    let raw = std::fs::read_to_string(config_path).map_err(|e| {
        AgentError::Config(format!(
            "cannot read integration config {}: {e}",
            config_path.display()
        ))
    })?;
    let file: McpConfigFile = serde_json::from_str(&raw).map_err(|e| {
        AgentError::Config(format!(
            "malformed integration config {}: {e}",
            config_path.display()
        ))
    })?;
    file.mcp_servers.get(name).cloned().ok_or_else(|| {
        AgentError::Config(format!(
            "integration '{name}' not found in {}",
            config_path.display()
        ))
    })
}

/// An empty catalog is a configuration defect, not a degraded mode.
fn ensure_catalog(name: &str, specs: &[ToolSpec]) -> Result<(), ToolSourceError> {
    if specs.is_empty() {
        return Err(ToolSourceError::EmptyCatalog(name.to_string()));
    }
    Ok(())
}

/// Connects the named integration and lists its catalog.
///
/// Fail-fast: an unreachable server, a malformed catalog, or an empty
/// catalog is `AgentError::Config` and aborts the whole initialization.
pub async fn load_integration(
    config_path: &Path,
    name: &str,
) -> Result<LoadedIntegration, AgentError> {
    let server = read_server_config(config_path, name)?;

    let source = match &server {
        McpServerConfig::Stdio { command, args, env } => {
            let env: Vec<(String, String)> =
                env.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
            McpToolSource::spawn(command, args, &env).await
        }
        McpServerConfig::Http { url, headers } => {
            let headers: Vec<(String, String)> =
                headers.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
            McpToolSource::connect_http(url, &headers).await
        }
    }
    .map_err(|e| AgentError::Config(format!("integration '{name}' unreachable: {e}")))?;

    let specs = source
        .list_tools()
        .await
        .map_err(|e| AgentError::Config(format!("integration '{name}' catalog failed: {e}")))?;
    ensure_catalog(name, &specs)
        .map_err(|e| AgentError::Config(e.to_string()))?;

    let summary = summarize_tools(&specs);
    info!(
        integration = %name,
        tool_count = specs.len(),
        "tool integration loaded"
    );

    Ok(LoadedIntegration {
        name: name.to_string(),
        source: Arc::new(source),
        specs,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().expect("temp file");
        f.write_all(contents.as_bytes()).expect("write config");
        f
    }

    /// **Scenario**: stdio and http entries both parse from the mcpServers
    /// shape.
    #[test]
    fn read_server_config_parses_both_transports() {
        let f = write_config(
            r#"{
                "mcpServers": {
                    "amap-maps": {"command": "npx", "args": ["-y", "@amap/amap-maps-mcp-server"], "env": {"AMAP_MAPS_API_KEY": "k"}},
                    "12306-mcp": {"url": "https://example.test/mcp", "headers": {"X-Key": "v"}}
                }
            }"#,
        );
        let stdio = read_server_config(f.path(), "amap-maps").unwrap();
        assert!(matches!(stdio, McpServerConfig::Stdio { ref command, .. } if command == "npx"));
        let http = read_server_config(f.path(), "12306-mcp").unwrap();
        assert!(
            matches!(http, McpServerConfig::Http { ref url, .. } if url == "https://example.test/mcp")
        );
    }

    /// **Scenario**: a missing file, malformed JSON, or unknown integration
    /// name is a configuration error naming the problem.
    #[test]
    fn read_server_config_failure_modes() {
        let missing = read_server_config(Path::new("/nonexistent/mcp.json"), "amap-maps");
        assert!(matches!(missing, Err(AgentError::Config(_))));

        let malformed = write_config("{not json");
        let err = read_server_config(malformed.path(), "amap-maps").unwrap_err();
        assert!(matches!(err, AgentError::Config(ref m) if m.contains("malformed")));

        let valid = write_config(r#"{"mcpServers": {}}"#);
        let err = read_server_config(valid.path(), "amap-maps").unwrap_err();
        assert!(matches!(err, AgentError::Config(ref m) if m.contains("amap-maps")));
    }

    /// **Scenario**: an empty catalog is rejected; a non-empty one passes.
    #[test]
    fn ensure_catalog_rejects_empty() {
        let err = ensure_catalog("amap-maps", &[]).unwrap_err();
        assert!(matches!(err, ToolSourceError::EmptyCatalog(ref n) if n == "amap-maps"));

        let specs = vec![ToolSpec {
            name: "geocode".into(),
            description: None,
            input_schema: serde_json::json!({}),
        }];
        assert!(ensure_catalog("amap-maps", &specs).is_ok());
    }

    /// **Scenario**: loading an integration whose command cannot be spawned
    /// fails the whole initialization with a Config error naming the
    /// integration.
    #[tokio::test]
    async fn load_integration_unreachable_server_is_config_error() {
        let f = write_config(
            r#"{"mcpServers": {"amap-maps": {"command": "_no_such_server_", "args": []}}}"#,
        );
        let err = load_integration(f.path(), "amap-maps").await.unwrap_err();
        assert!(
            matches!(err, AgentError::Config(ref m) if m.contains("amap-maps") && m.contains("unreachable"))
        );
    }
}
