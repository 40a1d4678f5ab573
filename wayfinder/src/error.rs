//! Runtime error type for the travel workflow.

use thiserror::Error;

use crate::graph::CompilationError;

/// Errors surfaced by graph execution, agents, tool loading and answer
/// generation.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Startup or wiring problem: missing environment variable, bad
    /// integration config, or a routing label that matches no node. Fatal
    /// before any partial output.
    #[error("configuration error: {0}")]
    Config(String),

    /// Graph structure was invalid at build time.
    #[error("graph compilation failed: {0}")]
    Compilation(#[from] CompilationError),

    /// A tool invocation failed and the failure must propagate out of the
    /// agent (instead of being recorded as an error result in the
    /// transcript).
    #[error("tool '{tool}' invocation failed: {message}")]
    ToolInvocation { tool: String, message: String },

    /// The final-answer provider failed; when it happens mid-stream the
    /// answer may be truncated.
    #[error("final answer generation failed: {0}")]
    Generation(String),

    /// A specialist kept requesting tools past its per-turn budget.
    #[error("specialist '{agent}' exhausted its tool budget ({limit} rounds)")]
    ToolBudgetExhausted { agent: String, limit: u32 },

    /// The graph executed more nodes than the configured bound; the
    /// supervisor/specialist loop did not converge.
    #[error("graph exceeded step budget ({limit} node executions)")]
    StepBudgetExhausted { limit: u32 },

    /// Node execution failed (LLM/provider error during the graph run).
    #[error("execution failed: {0}")]
    ExecutionFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Display output names the failing tool and agent so log
    /// lines are actionable without the backtrace.
    #[test]
    fn error_display_carries_identifiers() {
        let e = AgentError::ToolInvocation {
            tool: "search_tickets".into(),
            message: "connection reset".into(),
        };
        let s = e.to_string();
        assert!(s.contains("search_tickets"));
        assert!(s.contains("connection reset"));

        let e = AgentError::ToolBudgetExhausted {
            agent: "ticketing_expert".into(),
            limit: 8,
        };
        let s = e.to_string();
        assert!(s.contains("ticketing_expert"));
        assert!(s.contains('8'));
    }

    /// **Scenario**: CompilationError converts into AgentError via From.
    #[test]
    fn compilation_error_converts() {
        let e: AgentError = CompilationError::MissingStart.into();
        assert!(matches!(e, AgentError::Compilation(_)));
    }
}
