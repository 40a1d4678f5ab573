//! Runtime settings read from the environment at startup.
//!
//! Two model identifiers are required: `MODEL` drives every graph agent,
//! `CHAT_MODEL` drives the final answer generator. A missing or blank value
//! is a startup configuration error, not a silent default.

use std::path::PathBuf;

use crate::error::AgentError;

pub const ENV_MODEL: &str = "MODEL";
pub const ENV_CHAT_MODEL: &str = "CHAT_MODEL";
pub const ENV_MCP_CONFIG: &str = "MCP_CONFIG";

/// Integration config path used when `MCP_CONFIG` is unset.
pub const DEFAULT_MCP_CONFIG: &str = "mcp_servers.json";

/// Resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Model for the supervisor and the specialists.
    pub model: String,
    /// Model for the streamed final answer.
    pub chat_model: String,
    /// Path to the tool-server integration config.
    pub mcp_config: PathBuf,
}

fn require(var: &str) -> Result<String, AgentError> {
    match std::env::var(var) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AgentError::Config(format!(
            "environment variable {var} must be set"
        ))),
    }
}

impl Settings {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self, AgentError> {
        let model = require(ENV_MODEL)?;
        let chat_model = require(ENV_CHAT_MODEL)?;
        let mcp_config = std::env::var(ENV_MCP_CONFIG)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MCP_CONFIG.to_string());
        Ok(Self {
            model,
            chat_model,
            mcp_config: PathBuf::from(mcp_config),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment mutation is process-global, so all cases run in one test.
    /// **Scenario**: both model variables are required, blank counts as
    /// unset, and the integration config path falls back to its default.
    #[test]
    fn settings_from_env_requirements_and_default() {
        std::env::remove_var(ENV_MODEL);
        std::env::remove_var(ENV_CHAT_MODEL);
        std::env::remove_var(ENV_MCP_CONFIG);

        let err = Settings::from_env().unwrap_err();
        assert!(matches!(err, AgentError::Config(ref m) if m.contains(ENV_MODEL)));

        std::env::set_var(ENV_MODEL, "qwen-max");
        let err = Settings::from_env().unwrap_err();
        assert!(matches!(err, AgentError::Config(ref m) if m.contains(ENV_CHAT_MODEL)));

        std::env::set_var(ENV_CHAT_MODEL, "   ");
        let err = Settings::from_env().unwrap_err();
        assert!(matches!(err, AgentError::Config(ref m) if m.contains(ENV_CHAT_MODEL)));

        std::env::set_var(ENV_CHAT_MODEL, "qwen-plus");
        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.model, "qwen-max");
        assert_eq!(settings.chat_model, "qwen-plus");
        assert_eq!(settings.mcp_config, PathBuf::from(DEFAULT_MCP_CONFIG));

        std::env::set_var(ENV_MCP_CONFIG, "config/servers.json");
        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.mcp_config, PathBuf::from("config/servers.json"));

        std::env::remove_var(ENV_MODEL);
        std::env::remove_var(ENV_CHAT_MODEL);
        std::env::remove_var(ENV_MCP_CONFIG);
    }
}
